use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use super::hash;
use crate::transaction::Transfer;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MiningError {
    #[error("search cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },
}

/// Shared flag that aborts an in-flight puzzle search.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Whether both tokens control the same search.
    pub fn same_as(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A qualifying puzzle answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub solution: u64,
    pub digest: String,
}

/// Proof-of-Work engine with a fixed difficulty.
#[derive(Debug, Clone, Copy)]
pub struct ProofOfWork {
    difficulty: u32,
}

impl ProofOfWork {
    pub fn new(difficulty: u32) -> Self {
        Self { difficulty }
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Search for the lowest counter whose puzzle digest meets the difficulty.
    ///
    /// Unbounded: blocks the calling thread until a solution is found.
    pub fn solve(&self, previous_digest: &str, transfers: &[Transfer]) -> Solution {
        let transfers_json = hash::serialize_transfers(transfers);
        let mut counter: u64 = 0;
        loop {
            let digest = hash::proof_digest_raw(previous_digest, &transfers_json, counter);
            if hash::meets_difficulty(&digest, self.difficulty) {
                return Solution {
                    solution: counter,
                    digest,
                };
            }
            counter += 1;
        }
    }

    /// Same search as [`solve`](Self::solve), checking `cancel` before every attempt.
    pub fn solve_until(
        &self,
        previous_digest: &str,
        transfers: &[Transfer],
        cancel: &CancelToken,
    ) -> Result<Solution, MiningError> {
        let transfers_json = hash::serialize_transfers(transfers);
        let mut counter: u64 = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(MiningError::Cancelled { attempts: counter });
            }
            let digest = hash::proof_digest_raw(previous_digest, &transfers_json, counter);
            if hash::meets_difficulty(&digest, self.difficulty) {
                return Ok(Solution {
                    solution: counter,
                    digest,
                });
            }
            counter += 1;
        }
    }

    /// Recompute the puzzle digest and test it against the difficulty.
    pub fn verify(&self, previous_digest: &str, transfers: &[Transfer], solution: u64) -> bool {
        let digest = hash::proof_digest(previous_digest, transfers, solution);
        hash::meets_difficulty(&digest, self.difficulty)
    }
}
