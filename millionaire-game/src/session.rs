use crate::lifeline::LifelineSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle phase of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    NotStarted,
    AwaitingSelection,
    Selected,
    Revealed,
    Ended,
}

/// Mutable state of one playthrough. Owned exclusively by the controller;
/// the presentation layer observes it through [`Snapshot`].
#[derive(Debug, Clone)]
pub(crate) struct GameSession {
    pub id: Uuid,
    pub phase: Phase,
    pub question_index: usize,
    pub selected: Option<usize>,
    /// Correctness of the revealed answer. Set only while `phase` is
    /// `Revealed` or `Ended` after a reveal.
    pub correct: Option<bool>,
    /// Prize of the furthest correctly answered question, not a running sum.
    pub prize: u64,
    pub lifelines: LifelineSet,
    /// Single-flight guard: true while a submission awaits authorization.
    pub pending: bool,
    /// Bumped on every `start()`; stale timer callbacks compare against it
    /// and drop themselves when it moved on.
    pub generation: u64,
    pub started_at: DateTime<Utc>,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: Phase::NotStarted,
            question_index: 0,
            selected: None,
            correct: None,
            prize: 0,
            lifelines: LifelineSet::default(),
            pending: false,
            generation: 0,
            started_at: Utc::now(),
        }
    }

    /// Begin a fresh playthrough, invalidating any timers scheduled for the
    /// previous one.
    pub fn restart(&mut self) {
        self.id = Uuid::new_v4();
        self.phase = Phase::AwaitingSelection;
        self.question_index = 0;
        self.selected = None;
        self.correct = None;
        self.prize = 0;
        self.lifelines.reset();
        self.pending = false;
        self.generation += 1;
        self.started_at = Utc::now();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            session_id: self.id,
            phase: self.phase,
            question_index: self.question_index,
            selected: self.selected,
            correct: self.correct,
            prize: self.prize,
            lifelines: self.lifelines,
            pending: self.pending,
        }
    }
}

/// Observable session state for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub session_id: Uuid,
    pub phase: Phase,
    pub question_index: usize,
    pub selected: Option<usize>,
    pub correct: Option<bool>,
    pub prize: u64,
    pub lifelines: LifelineSet,
    pub pending: bool,
}
