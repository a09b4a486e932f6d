use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};

/// One-shot player aids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifeline {
    FiftyFifty,
    AskAudience,
    PhoneAFriend,
}

impl std::fmt::Display for Lifeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Lifeline::FiftyFifty => "50:50",
            Lifeline::AskAudience => "Ask the Audience",
            Lifeline::PhoneAFriend => "Phone a Friend",
        };
        write!(f, "{}", name)
    }
}

/// Availability of the three lifelines within one session. Each flag flips
/// true to false exactly once; a new session resets all three.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LifelineSet {
    pub fifty_fifty: bool,
    pub ask_audience: bool,
    pub phone_a_friend: bool,
}

impl Default for LifelineSet {
    fn default() -> Self {
        Self {
            fifty_fifty: true,
            ask_audience: true,
            phone_a_friend: true,
        }
    }
}

impl LifelineSet {
    pub fn is_available(&self, kind: Lifeline) -> bool {
        match kind {
            Lifeline::FiftyFifty => self.fifty_fifty,
            Lifeline::AskAudience => self.ask_audience,
            Lifeline::PhoneAFriend => self.phone_a_friend,
        }
    }

    pub fn consume(&mut self, kind: Lifeline) -> Result<()> {
        let flag = match kind {
            Lifeline::FiftyFifty => &mut self.fifty_fifty,
            Lifeline::AskAudience => &mut self.ask_audience,
            Lifeline::PhoneAFriend => &mut self.phone_a_friend,
        };
        if !*flag {
            return Err(GameError::LifelineUnavailable(kind));
        }
        *flag = false;
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Pick the two incorrect option indices the fifty-fifty lifeline removes.
///
/// Deterministic policy: the first two indices in ascending order that are
/// not the correct answer. The caller renders the suppression; this module
/// only decides.
pub fn fifty_fifty_eliminations(option_count: usize, correct: usize) -> [usize; 2] {
    debug_assert!(
        option_count >= 3,
        "fifty-fifty needs at least three options to remove two wrong ones"
    );
    let mut removed = [0usize; 2];
    let mut filled = 0;
    for i in 0..option_count {
        if i != correct && filled < 2 {
            removed[filled] = i;
            filled += 1;
        }
    }
    removed
}
