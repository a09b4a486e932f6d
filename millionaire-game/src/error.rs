use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Core error: {0}")]
    Core(#[from] millionaire_core::CoreError),

    #[error("Invalid game state: {0}")]
    InvalidState(String),

    #[error("Lifeline already consumed: {0}")]
    LifelineUnavailable(crate::lifeline::Lifeline),

    #[error("No option selected")]
    NoSelection,

    #[error("A submission is already pending for this session")]
    SubmissionPending,

    #[error("Authorization rejected by the wallet")]
    AuthorizationRejected,

    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),
}

impl GameError {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Whether the presentation layer can keep the session going after
    /// surfacing this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidState(_)
                | Self::LifelineUnavailable(_)
                | Self::NoSelection
                | Self::SubmissionPending
                | Self::AuthorizationRejected
                | Self::AuthorizationFailed(_)
        )
    }
}
