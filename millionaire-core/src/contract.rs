use crate::error::Result;
use async_trait::async_trait;

/// Read-only availability probe for the question contract. Failures are
/// reported to the caller, never retried.
#[async_trait]
pub trait ContractProbe: Send + Sync {
    async fn check_available(&self) -> Result<bool>;
}

/// In-memory probe with a fixed answer, used while no chain is wired up.
#[derive(Debug)]
pub struct StaticProbe {
    available: bool,
}

impl StaticProbe {
    pub fn new(available: bool) -> Self {
        Self { available }
    }
}

#[async_trait]
impl ContractProbe for StaticProbe {
    async fn check_available(&self) -> Result<bool> {
        tracing::debug!("Static contract probe: available={}", self.available);
        Ok(self.available)
    }
}
