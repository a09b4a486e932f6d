//! Game progression state machine for FHE Millionaire.
//!
//! One [`GameController`] per playthrough: it sequences the question
//! catalog, gates answer submission behind a wallet signature, consumes
//! lifelines, and accrues prize money at the latest earned tier. The
//! presentation layer drives it with intents and renders from snapshots.

pub mod controller;
pub mod error;
pub mod lifeline;
pub mod session;

pub use controller::{ControllerConfig, GameController, LifelineOutcome, SubmitOutcome};
pub use error::{GameError, Result};
pub use lifeline::{Lifeline, LifelineSet};
pub use session::{Phase, Snapshot};
