//! Wallet authorization seam.
//!
//! Answer submission is gated behind a user-mediated signature request. The
//! controller only sees the [`WalletAuthorizer`] trait; real wallets,
//! browser extensions, or test doubles plug in behind it.

use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Signing context for one answer submission.
///
/// `message()` is a compatibility surface: if a backend ever verifies the
/// signature, it reconstructs this exact string. Field order and labels are
/// fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub public_key: String,
    pub contract_address: String,
    pub chain_id: u64,
    pub start_timestamp: i64,
    pub duration_days: u32,
}

impl ApprovalRequest {
    /// Build a request for a session starting now with the default 30-day
    /// duration.
    pub fn new(public_key: String, contract_address: String, chain_id: u64) -> Self {
        Self {
            public_key,
            contract_address,
            chain_id,
            start_timestamp: Utc::now().timestamp(),
            duration_days: 30,
        }
    }

    /// The human-readable payload the wallet is asked to sign.
    pub fn message(&self) -> String {
        format!(
            "publickey:{}\ncontractAddresses:{}\ncontractsChainId:{}\nstartTimestamp:{}\ndurationDays:{}",
            self.public_key,
            self.contract_address,
            self.chain_id,
            self.start_timestamp,
            self.duration_days
        )
    }
}

/// Outcome of a signature request. User cancellation maps to `Rejected`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Approval {
    Approved { signature: String },
    Rejected,
}

/// Asynchronous, user-mediated approval gate. No completion time guarantee.
#[async_trait]
pub trait WalletAuthorizer: Send + Sync {
    async fn request_approval(&self, request: &ApprovalRequest) -> Result<Approval>;
}

/// Local stand-in signer: the "signature" is the hex sha256 digest of the
/// payload. Approves every request.
#[derive(Debug, Default)]
pub struct LocalSigner;

#[async_trait]
impl WalletAuthorizer for LocalSigner {
    async fn request_approval(&self, request: &ApprovalRequest) -> Result<Approval> {
        let mut hasher = Sha256::new();
        hasher.update(request.message().as_bytes());
        let signature = hex::encode(hasher.finalize());

        tracing::debug!("Locally signed approval request: {}", signature);
        Ok(Approval::Approved { signature })
    }
}

/// Generate a public-key-like token: `0x` followed by 2000 hex characters.
pub fn generate_public_key() -> String {
    let mut rng = rand::thread_rng();
    let body: String = (0..2000)
        .map(|_| std::char::from_digit(rng.gen_range(0..16u32), 16).unwrap())
        .collect();
    format!("0x{}", body)
}
