use crate::error::{GameError, Result};
use crate::lifeline::{fifty_fifty_eliminations, Lifeline};
use crate::session::{GameSession, Phase, Snapshot};
use millionaire_core::{generate_public_key, Approval, ApprovalRequest, Question, QuestionCatalog, WalletAuthorizer};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Timing and signing-context knobs for a controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Simulated decrypt delay between authorization and evaluation.
    pub decrypt_delay: Duration,
    /// Delay before the post-reveal automatic transition fires.
    pub advance_delay: Duration,
    pub contract_address: String,
    pub chain_id: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            decrypt_delay: Duration::from_millis(1500),
            advance_delay: Duration::from_millis(3000),
            contract_address: "0x0000000000000000000000000000000000000000".to_string(),
            chain_id: 1,
        }
    }
}

/// Result of lifeline consumption. Only fifty-fifty carries data; the other
/// two aids are rendered entirely by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifelineOutcome {
    /// Option indices the presentation layer should suppress.
    Removed([usize; 2]),
    Consumed,
}

/// What the reveal showed for a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub correct: bool,
    pub correct_answer: usize,
    /// Accrued prize after this reveal.
    pub prize: u64,
}

/// Game progression state machine.
///
/// Each controller owns one session exclusively. The presentation layer
/// dispatches intents (`start`, `select_option`, `submit_answer`,
/// `use_lifeline`) and renders from [`Snapshot`]s; the controller queries
/// the catalog and codec and mutates session state atomically, so a failed
/// transition never leaves partial effects behind.
pub struct GameController {
    catalog: Arc<QuestionCatalog>,
    authorizer: Arc<dyn WalletAuthorizer>,
    session: Arc<Mutex<GameSession>>,
    public_key: String,
    config: ControllerConfig,
}

impl GameController {
    pub fn new(catalog: QuestionCatalog, authorizer: Arc<dyn WalletAuthorizer>) -> Result<Self> {
        Self::with_config(catalog, authorizer, ControllerConfig::default())
    }

    pub fn with_config(
        catalog: QuestionCatalog,
        authorizer: Arc<dyn WalletAuthorizer>,
        config: ControllerConfig,
    ) -> Result<Self> {
        if catalog.is_empty() {
            return Err(GameError::invalid_state("question catalog is empty"));
        }

        Ok(Self {
            catalog: Arc::new(catalog),
            authorizer,
            session: Arc::new(Mutex::new(GameSession::new())),
            public_key: generate_public_key(),
            config,
        })
    }

    /// Begin a fresh playthrough. Valid from any phase; invalidates timers
    /// scheduled for the previous session.
    pub fn start(&self) {
        let mut session = self.session.lock();
        session.restart();
        tracing::info!("Session {} started at question 0", session.id);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.lock().snapshot()
    }

    /// The question the session currently sits on.
    pub fn current_question(&self) -> Result<Question> {
        let index = {
            let session = self.session.lock();
            if session.phase == Phase::NotStarted {
                return Err(GameError::invalid_state("game has not started"));
            }
            session.question_index
        };
        Ok(self.catalog.get(index)?.clone())
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    /// Select an option for the current question. Selection may be changed
    /// freely until the answer is locked in; once the reveal is shown the
    /// call is a silent no-op.
    pub fn select_option(&self, index: usize) -> Result<()> {
        let mut session = self.session.lock();
        if session.pending {
            return Err(GameError::SubmissionPending);
        }

        match session.phase {
            Phase::NotStarted => return Err(GameError::invalid_state("game has not started")),
            // Selection is locked once the answer is revealed.
            Phase::Revealed | Phase::Ended => return Ok(()),
            Phase::AwaitingSelection | Phase::Selected => {}
        }

        let question = self.catalog.get(session.question_index)?;
        if index >= question.options.len() {
            return Err(millionaire_core::CoreError::IndexOutOfRange {
                index,
                len: question.options.len(),
            }
            .into());
        }

        session.selected = Some(index);
        session.phase = Phase::Selected;
        tracing::debug!(
            "Session {} selected option {} for question {}",
            session.id,
            index,
            session.question_index
        );
        Ok(())
    }

    /// Consume a lifeline. Valid only before the reveal and while no
    /// submission is pending.
    pub fn use_lifeline(&self, kind: Lifeline) -> Result<LifelineOutcome> {
        let mut session = self.session.lock();
        if session.pending {
            return Err(GameError::SubmissionPending);
        }
        if !matches!(session.phase, Phase::AwaitingSelection | Phase::Selected) {
            return Err(GameError::invalid_state(
                "lifelines are only usable before the reveal",
            ));
        }

        // Resolve the answer before consuming, so a corrupt token cannot
        // burn the lifeline.
        let outcome = match kind {
            Lifeline::FiftyFifty => {
                let question = self.catalog.get(session.question_index)?;
                let correct = question.correct_answer()?;
                let removed = fifty_fifty_eliminations(question.options.len(), correct);
                session.lifelines.consume(kind)?;
                LifelineOutcome::Removed(removed)
            }
            Lifeline::AskAudience | Lifeline::PhoneAFriend => {
                session.lifelines.consume(kind)?;
                LifelineOutcome::Consumed
            }
        };

        tracing::info!("Session {} used lifeline {}", session.id, kind);
        Ok(outcome)
    }

    /// Lock in the selected answer: request wallet authorization, wait out
    /// the simulated decrypt delay, then reveal the outcome and schedule the
    /// automatic advance.
    ///
    /// Single-flight per session. On authorization rejection or failure the
    /// session returns to `Selected` with the selection intact.
    pub async fn submit_answer(&self) -> Result<SubmitOutcome> {
        let (request, selected, question_index, generation) = {
            let mut session = self.session.lock();
            if session.pending {
                return Err(GameError::SubmissionPending);
            }
            match session.phase {
                Phase::Selected => {}
                Phase::AwaitingSelection => return Err(GameError::NoSelection),
                _ => {
                    return Err(GameError::invalid_state(
                        "answers can only be submitted after selecting an option",
                    ))
                }
            }
            let selected = session.selected.ok_or(GameError::NoSelection)?;

            session.pending = true;
            let request = ApprovalRequest {
                public_key: self.public_key.clone(),
                contract_address: self.config.contract_address.clone(),
                chain_id: self.config.chain_id,
                start_timestamp: session.started_at.timestamp(),
                duration_days: 30,
            };
            (request, selected, session.question_index, session.generation)
        };

        match self.authorizer.request_approval(&request).await {
            Ok(Approval::Approved { .. }) => {}
            Ok(Approval::Rejected) => {
                self.abort_submission(generation);
                tracing::warn!("Submission rejected by wallet, returning to Selected");
                return Err(GameError::AuthorizationRejected);
            }
            Err(e) => {
                self.abort_submission(generation);
                tracing::warn!("Authorization failed: {}", e);
                return Err(GameError::AuthorizationFailed(e.to_string()));
            }
        }

        tokio::time::sleep(self.config.decrypt_delay).await;

        let outcome = {
            let mut session = self.session.lock();
            if session.generation != generation {
                // The session restarted while we were suspended.
                return Err(GameError::invalid_state(
                    "session was reset during submission",
                ));
            }

            let question = match self.catalog.get(question_index) {
                Ok(q) => q,
                Err(e) => {
                    session.pending = false;
                    return Err(e.into());
                }
            };
            let correct_answer = match question.correct_answer() {
                Ok(a) => a,
                Err(e) => {
                    session.pending = false;
                    return Err(e.into());
                }
            };

            let correct = selected == correct_answer;
            session.pending = false;
            session.phase = Phase::Revealed;
            session.correct = Some(correct);
            if correct {
                session.prize = question.prize;
            }

            tracing::info!(
                "Session {} question {} revealed: correct={}, prize={}",
                session.id,
                question_index,
                correct,
                session.prize
            );

            SubmitOutcome {
                correct,
                correct_answer,
                prize: session.prize,
            }
        };

        self.schedule_advance(generation);
        Ok(outcome)
    }

    /// Roll a failed submission back to `Selected`, unless the session was
    /// restarted in the meantime.
    fn abort_submission(&self, generation: u64) {
        let mut session = self.session.lock();
        if session.generation == generation {
            session.pending = false;
        }
    }

    /// Schedule the post-reveal transition: next question on a correct
    /// answer with questions remaining, otherwise game over. The generation
    /// check makes a timer scheduled for an abandoned session a no-op.
    fn schedule_advance(&self, generation: u64) {
        let session = Arc::clone(&self.session);
        let total = self.catalog.len();
        let delay = self.config.advance_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut session = session.lock();
            if session.generation != generation || session.phase != Phase::Revealed {
                tracing::debug!("Dropping stale advance timer (generation {})", generation);
                return;
            }

            if session.correct == Some(true) && session.question_index + 1 < total {
                session.question_index += 1;
                session.selected = None;
                session.correct = None;
                session.phase = Phase::AwaitingSelection;
                tracing::info!(
                    "Session {} advanced to question {}",
                    session.id,
                    session.question_index
                );
            } else {
                session.phase = Phase::Ended;
                tracing::info!(
                    "Session {} ended with prize {}",
                    session.id,
                    session.prize
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use millionaire_core::{CoreError, LocalSigner};
    use std::collections::VecDeque;

    /// Authorizer that replays a script of outcomes, then approves.
    struct ScriptedAuthorizer {
        script: Mutex<VecDeque<millionaire_core::Result<Approval>>>,
    }

    impl ScriptedAuthorizer {
        fn new(script: Vec<millionaire_core::Result<Approval>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
            })
        }
    }

    #[async_trait]
    impl WalletAuthorizer for ScriptedAuthorizer {
        async fn request_approval(
            &self,
            _request: &ApprovalRequest,
        ) -> millionaire_core::Result<Approval> {
            self.script.lock().pop_front().unwrap_or(Ok(Approval::Approved {
                signature: "test".to_string(),
            }))
        }
    }

    fn controller() -> GameController {
        GameController::new(QuestionCatalog::load(), Arc::new(LocalSigner)).unwrap()
    }

    fn controller_with(authorizer: Arc<dyn WalletAuthorizer>) -> GameController {
        GameController::new(QuestionCatalog::load(), authorizer).unwrap()
    }

    /// Let the scheduled post-reveal transition fire (virtual time).
    async fn let_advance_fire(controller: &GameController) {
        tokio::time::sleep(controller.config.advance_delay + Duration::from_millis(10)).await;
    }

    async fn answer_correctly(controller: &GameController) {
        let question = controller.current_question().unwrap();
        controller
            .select_option(question.correct_answer().unwrap())
            .unwrap();
        let outcome = controller.submit_answer().await.unwrap();
        assert!(outcome.correct);
        let_advance_fire(controller).await;
    }

    async fn answer_incorrectly(controller: &GameController) {
        let question = controller.current_question().unwrap();
        let correct = question.correct_answer().unwrap();
        let wrong = (0..question.options.len()).find(|&i| i != correct).unwrap();
        controller.select_option(wrong).unwrap();
        let outcome = controller.submit_answer().await.unwrap();
        assert!(!outcome.correct);
        let_advance_fire(controller).await;
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let result = GameController::new(QuestionCatalog::new(vec![]), Arc::new(LocalSigner));
        assert!(matches!(result, Err(GameError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_start_resets_session() {
        let controller = controller();
        controller.start();

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, Phase::AwaitingSelection);
        assert_eq!(snapshot.question_index, 0);
        assert_eq!(snapshot.prize, 0);
        assert!(snapshot.lifelines.is_available(Lifeline::FiftyFifty));
        assert!(snapshot.lifelines.is_available(Lifeline::AskAudience));
        assert!(snapshot.lifelines.is_available(Lifeline::PhoneAFriend));
    }

    #[tokio::test]
    async fn test_select_before_start_fails() {
        let controller = controller();
        assert!(matches!(
            controller.select_option(0),
            Err(GameError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_select_invalid_index_rejected() {
        let controller = controller();
        controller.start();
        assert!(matches!(
            controller.select_option(4),
            Err(GameError::Core(CoreError::IndexOutOfRange { index: 4, len: 4 }))
        ));
        assert_eq!(controller.snapshot().selected, None);
    }

    #[tokio::test]
    async fn test_selection_can_change_before_submit() {
        let controller = controller();
        controller.start();
        controller.select_option(0).unwrap();
        controller.select_option(3).unwrap();
        assert_eq!(controller.snapshot().selected, Some(3));
        assert_eq!(controller.snapshot().phase, Phase::Selected);
    }

    #[tokio::test]
    async fn test_submit_without_selection_fails() {
        let controller = controller();
        controller.start();
        assert!(matches!(
            controller.submit_answer().await,
            Err(GameError::NoSelection)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_is_noop_while_revealed() {
        let controller = controller();
        controller.start();
        controller.select_option(2).unwrap();
        controller.submit_answer().await.unwrap();

        let before = controller.snapshot();
        assert_eq!(before.phase, Phase::Revealed);
        controller.select_option(0).unwrap();
        let after = controller.snapshot();
        assert_eq!(after.selected, before.selected);
        assert_eq!(after.phase, Phase::Revealed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_is_noop_after_end() {
        let controller = controller();
        controller.start();
        answer_incorrectly(&controller).await;

        assert_eq!(controller.snapshot().phase, Phase::Ended);
        controller.select_option(1).unwrap();
        assert_eq!(controller.snapshot().phase, Phase::Ended);
    }

    #[tokio::test(start_paused = true)]
    async fn test_correct_answer_advances_with_prize() {
        let controller = controller();
        controller.start();
        answer_correctly(&controller).await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, Phase::AwaitingSelection);
        assert_eq!(snapshot.question_index, 1);
        assert_eq!(snapshot.prize, 100);
        assert_eq!(snapshot.selected, None);
        assert_eq!(snapshot.correct, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_incorrect_answer_ends_preserving_prize() {
        let controller = controller();
        controller.start();
        answer_correctly(&controller).await;
        answer_incorrectly(&controller).await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, Phase::Ended);
        assert_eq!(snapshot.prize, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_four_correct_then_wrong_ends_at_500() {
        let controller = controller();
        controller.start();
        for _ in 0..4 {
            answer_correctly(&controller).await;
        }
        answer_incorrectly(&controller).await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, Phase::Ended);
        assert_eq!(snapshot.prize, 500);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_correct_ends_at_grand_prize() {
        let controller = controller();
        controller.start();
        for _ in 0..5 {
            answer_correctly(&controller).await;
        }

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, Phase::Ended);
        assert_eq!(snapshot.prize, 1000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_returns_to_selected() {
        let controller = controller_with(ScriptedAuthorizer::new(vec![Ok(Approval::Rejected)]));
        controller.start();
        controller.select_option(2).unwrap();

        let result = controller.submit_answer().await;
        assert!(matches!(result, Err(GameError::AuthorizationRejected)));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, Phase::Selected);
        assert_eq!(snapshot.selected, Some(2));
        assert_eq!(snapshot.question_index, 0);
        assert!(!snapshot.pending);

        // Retry succeeds against the default approval.
        let outcome = controller.submit_answer().await.unwrap();
        assert!(outcome.correct);
    }

    #[tokio::test(start_paused = true)]
    async fn test_authorizer_error_is_recoverable() {
        let controller = controller_with(ScriptedAuthorizer::new(vec![Err(
            CoreError::authorization("signer offline"),
        )]));
        controller.start();
        controller.select_option(2).unwrap();

        let result = controller.submit_answer().await;
        assert!(matches!(&result, Err(GameError::AuthorizationFailed(_))));
        assert!(result.unwrap_err().is_recoverable());
        assert_eq!(controller.snapshot().phase, Phase::Selected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fifty_fifty_removes_two_wrong_options() {
        let controller = controller();
        controller.start();

        let correct = controller
            .current_question()
            .unwrap()
            .correct_answer()
            .unwrap();
        let outcome = controller.use_lifeline(Lifeline::FiftyFifty).unwrap();
        let LifelineOutcome::Removed([a, b]) = outcome else {
            panic!("fifty-fifty must return removed indices");
        };
        assert_ne!(a, b);
        assert_ne!(a, correct);
        assert_ne!(b, correct);

        assert!(matches!(
            controller.use_lifeline(Lifeline::FiftyFifty),
            Err(GameError::LifelineUnavailable(Lifeline::FiftyFifty))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_lifeline_blocked_after_reveal() {
        let controller = controller();
        controller.start();
        controller.select_option(2).unwrap();
        controller.submit_answer().await.unwrap();

        assert!(matches!(
            controller.use_lifeline(Lifeline::AskAudience),
            Err(GameError::InvalidState(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_during_pending_submission_is_dropped() {
        let controller = Arc::new(controller());
        controller.start();
        controller.select_option(2).unwrap();

        let pending = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.submit_answer().await })
        };
        // Let the submission reach the decrypt delay, then restart under it.
        tokio::task::yield_now().await;
        assert!(controller.snapshot().pending);
        controller.start();

        let_advance_fire(&controller).await;
        let result = pending.await.unwrap();
        assert!(matches!(result, Err(GameError::InvalidState(_))));

        // The stale submission must not have touched the new session.
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, Phase::AwaitingSelection);
        assert_eq!(snapshot.question_index, 0);
        assert_eq!(snapshot.selected, None);
        assert_eq!(snapshot.correct, None);
        assert_eq!(snapshot.prize, 0);
        assert!(!snapshot.pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_advance_timer_is_suppressed() {
        let controller = controller();
        controller.start();
        controller.select_option(2).unwrap();
        controller.submit_answer().await.unwrap();
        assert_eq!(controller.snapshot().phase, Phase::Revealed);

        // Restart before the advance timer fires.
        controller.start();
        let_advance_fire(&controller).await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, Phase::AwaitingSelection);
        assert_eq!(snapshot.question_index, 0);
        assert_eq!(snapshot.prize, 0);
    }
}
