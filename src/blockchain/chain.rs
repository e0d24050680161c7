use log::debug;
use thiserror::Error;

use super::{Block, Payload, ProofOfWork};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("block index {got} does not follow tip index {tip}")]
    IndexGap { tip: u64, got: u64 },
    #[error("block does not link to the current tip")]
    BrokenLink,
    #[error("block digest does not match its content")]
    DigestMismatch,
    #[error("puzzle solution does not meet difficulty")]
    BadProof,
}

/// Simple in-memory blockchain with Proof-of-Work.
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
    pow: ProofOfWork,
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block.
    pub fn new(pow: ProofOfWork) -> Self {
        Self {
            chain: vec![Block::genesis()],
            pow,
        }
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    /// Build the successor of the current tip from a solved payload.
    pub fn next_block(&self, payload: Payload) -> Block {
        let tip = self.last_block();
        Block::new(tip.index + 1, payload, tip.digest.clone())
    }

    /// Append a block after checking it against the tip.
    pub fn append(&mut self, block: Block) -> Result<&Block, ChainError> {
        check_successor(self.last_block(), &block, &self.pow)?;
        debug!("chain - appended block #{} ({})", block.index, block.digest);
        self.chain.push(block);
        Ok(self.last_block())
    }

    /// Swap in a whole new chain. Callers validate it first.
    pub fn replace(&mut self, blocks: Vec<Block>) {
        assert!(!blocks.is_empty(), "replacement chain must contain genesis");
        self.chain = blocks;
    }

    /// Validate the local chain (defensive self-check).
    pub fn is_valid_chain(&self) -> bool {
        validate(&self.chain, &self.pow)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }
}

/// Validate any sequence of blocks, local or fetched from a peer.
///
/// The first block is trusted. Every later block must carry the next index,
/// link to its predecessor's digest, hash to its stored digest and hold a
/// puzzle solution meeting the difficulty.
pub fn validate(blocks: &[Block], pow: &ProofOfWork) -> bool {
    let Some(genesis) = blocks.first() else {
        return false;
    };
    if !genesis.is_genesis() {
        return false;
    }
    blocks
        .windows(2)
        .all(|pair| check_successor(&pair[0], &pair[1], pow).is_ok())
}

fn check_successor(prev: &Block, block: &Block, pow: &ProofOfWork) -> Result<(), ChainError> {
    if block.index != prev.index + 1 {
        return Err(ChainError::IndexGap {
            tip: prev.index,
            got: block.index,
        });
    }
    if block.previous_digest != prev.digest {
        return Err(ChainError::BrokenLink);
    }
    if block.digest != block.compute_digest() {
        return Err(ChainError::DigestMismatch);
    }
    if !pow.verify(&prev.digest, &block.payload.transfers, block.payload.solution) {
        return Err(ChainError::BadProof);
    }
    Ok(())
}
