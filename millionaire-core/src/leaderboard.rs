use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One leaderboard row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub address: String,
    pub name: String,
    pub score: u64,
    pub level: u32,
}

impl PlayerEntry {
    /// Abbreviated address for display, `0x123...abc` style.
    pub fn short_address(&self) -> String {
        if self.address.len() <= 10 {
            return self.address.clone();
        }
        format!(
            "{}...{}",
            &self.address[..6],
            &self.address[self.address.len() - 3..]
        )
    }
}

/// Read-only leaderboard feed, refreshed independently of game state.
#[async_trait]
pub trait LeaderboardSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<PlayerEntry>>;
}

/// Built-in sample standings, highest score first.
#[derive(Debug, Default)]
pub struct SampleLeaderboard;

#[async_trait]
impl LeaderboardSource for SampleLeaderboard {
    async fn fetch(&self) -> Result<Vec<PlayerEntry>> {
        Ok(vec![
            PlayerEntry {
                address: "0x123...abc".to_string(),
                name: "CryptoKing".to_string(),
                score: 1_000_000,
                level: 15,
            },
            PlayerEntry {
                address: "0x456...def".to_string(),
                name: "BlockchainQueen".to_string(),
                score: 750_000,
                level: 12,
            },
            PlayerEntry {
                address: "0x789...ghi".to_string(),
                name: "DeFiMaster".to_string(),
                score: 500_000,
                level: 10,
            },
            PlayerEntry {
                address: "0xabc...jkl".to_string(),
                name: "FHEExpert".to_string(),
                score: 250_000,
                level: 8,
            },
            PlayerEntry {
                address: "0xdef...mno".to_string(),
                name: "ZamaFan".to_string(),
                score: 100_000,
                level: 6,
            },
        ])
    }
}
