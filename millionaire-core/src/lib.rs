//! Core components for the FHE Millionaire trivia game.
//!
//! Provides the answer-token codec, the read-only question catalog, and the
//! narrow seams toward external collaborators (wallet signer, contract
//! probe, leaderboard feed). Game progression itself lives in the
//! `millionaire-game` crate.

pub mod catalog;
pub mod codec;
pub mod contract;
pub mod error;
pub mod leaderboard;
pub mod wallet;

pub use catalog::{Question, QuestionCatalog};
pub use contract::{ContractProbe, StaticProbe};
pub use error::{CoreError, Result};
pub use leaderboard::{LeaderboardSource, PlayerEntry, SampleLeaderboard};
pub use wallet::{generate_public_key, Approval, ApprovalRequest, LocalSigner, WalletAuthorizer};
