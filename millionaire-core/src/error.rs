use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Index out of range: {index} (valid 0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Contract probe failed: {0}")]
    Probe(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn authorization(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }

    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }
}
