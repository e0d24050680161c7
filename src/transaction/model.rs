use serde::{Deserialize, Serialize};

use crate::blockchain::{MINING_REWARD, NETWORK_SENDER};

/// A value transfer between two parties. No balances or signatures are
/// attached; once mined into a block it is never changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

impl Transfer {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: f64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    /// The synthetic transfer paying the miner for a block.
    pub fn reward(miner_id: &str) -> Self {
        Self::new(NETWORK_SENDER, miner_id, MINING_REWARD)
    }

    pub fn is_reward(&self) -> bool {
        self.sender == NETWORK_SENDER
    }

    /// Structural checks applied before a transfer enters the pool.
    pub fn check(&self) -> Result<(), &'static str> {
        if self.sender.trim().is_empty() {
            return Err("sender required");
        }
        if self.recipient.trim().is_empty() {
            return Err("recipient required");
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err("amount must be a positive number");
        }
        if self.is_reward() {
            return Err("sender is reserved for mining rewards");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Transfer;

    #[test]
    fn reward_is_recognised() {
        let r = Transfer::reward("miner-1");
        assert!(r.is_reward());
        assert_eq!(r.recipient, "miner-1");
        assert!(!Transfer::new("alice", "bob", 1.0).is_reward());
    }

    #[test]
    fn check_rejects_malformed() {
        assert!(Transfer::new("alice", "bob", 3.0).check().is_ok());
        assert!(Transfer::new(" ", "bob", 3.0).check().is_err());
        assert!(Transfer::new("alice", "", 3.0).check().is_err());
        assert!(Transfer::new("alice", "bob", 0.0).check().is_err());
        assert!(Transfer::new("alice", "bob", -1.0).check().is_err());
        assert!(Transfer::new("alice", "bob", f64::INFINITY).check().is_err());
        assert!(Transfer::reward("me").check().is_err());
    }
}
