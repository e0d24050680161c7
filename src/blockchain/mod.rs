pub mod block;
pub mod chain;
pub mod hash;
pub mod miner;

pub use block::{Block, Payload};
pub use chain::{Blockchain, ChainError, validate};
pub use miner::{CancelToken, MiningError, ProofOfWork, Solution};

/// Default Proof-of-Work difficulty (number of leading zeros).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Length of a hex SHA-256 digest; no search can satisfy more zeros.
pub const MAX_DIFFICULTY: u32 = 64;

/// Sender recorded on mining reward transfers.
pub const NETWORK_SENDER: &str = "network";

/// Amount paid to the miner of each block.
pub const MINING_REWARD: f64 = 1.0;

/// `previous_digest` of the genesis block.
pub const GENESIS_PREVIOUS_DIGEST: &str = "0";
