use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::hash;
use crate::transaction::Transfer;

/// What a block carries: the transfers it commits and the puzzle solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub transfers: Vec<Transfer>,
    pub solution: u64,
}

/// A single block in the chain. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix timestamp (UTC)
    pub payload: Payload,
    pub previous_digest: String,
    pub digest: String,
}

/// Hashing view of a block, everything except its own digest.
#[derive(Serialize)]
struct Content<'a> {
    index: u64,
    timestamp: i64,
    payload: &'a Payload,
    previous_digest: &'a str,
}

impl Block {
    /// Create the genesis block. It needs no puzzle solution.
    pub fn genesis() -> Self {
        Self::with_timestamp(
            0,
            Utc::now().timestamp(),
            Payload {
                transfers: Vec::new(),
                solution: 0,
            },
            String::from(super::GENESIS_PREVIOUS_DIGEST),
        )
    }

    /// Create a block stamped with the current time.
    pub fn new(index: u64, payload: Payload, previous_digest: String) -> Self {
        Self::with_timestamp(index, Utc::now().timestamp(), payload, previous_digest)
    }

    pub fn with_timestamp(
        index: u64,
        timestamp: i64,
        payload: Payload,
        previous_digest: String,
    ) -> Self {
        let digest = content_digest(index, timestamp, &payload, &previous_digest);
        Self {
            index,
            timestamp,
            payload,
            previous_digest,
            digest,
        }
    }

    /// Recompute the content digest from the block's fields.
    pub fn compute_digest(&self) -> String {
        content_digest(
            self.index,
            self.timestamp,
            &self.payload,
            &self.previous_digest,
        )
    }

    /// Puzzle digest of this block measured against `previous_digest`.
    pub fn proof_digest(&self, previous_digest: &str) -> String {
        hash::proof_digest(
            previous_digest,
            &self.payload.transfers,
            self.payload.solution,
        )
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}

fn content_digest(index: u64, timestamp: i64, payload: &Payload, previous_digest: &str) -> String {
    let content = Content {
        index,
        timestamp,
        payload,
        previous_digest,
    };
    let bytes = serde_json::to_vec(&content).expect("block content is always serializable");
    hash::digest(&bytes)
}
