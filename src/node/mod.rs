//! A single ledger node: chain, pending pool and peer set behind explicit locks.
//!
//! Chain and pool share one mutex so appends, drains and consensus
//! replacements never interleave. The puzzle search runs outside that lock and
//! is re-checked against the tip before its block is appended.

pub mod client;
pub mod consensus;
pub mod error;
pub mod peers;

use std::sync::{Mutex, MutexGuard};

use log::{debug, info, warn};

use crate::blockchain::{
    Block, Blockchain, CancelToken, MiningError, Payload, ProofOfWork, Solution,
};
use crate::transaction::{PoolSnapshot, Transfer, TransferPool};

pub use client::{ChainSource, HttpPeerClient};
pub use error::{NodeError, PeerError, Result};
pub use peers::PeerRegistry;

struct Ledger {
    chain: Blockchain,
    pool: TransferPool,
    /// Tokens of searches currently running against this ledger.
    searches: Vec<CancelToken>,
}

impl Ledger {
    fn cancel_searches(&mut self) {
        for token in self.searches.drain(..) {
            token.cancel();
        }
    }
}

/// Everything a puzzle search needs, captured from the tip at start.
#[derive(Debug)]
pub struct MiningJob {
    pub tip_index: u64,
    pub tip_digest: String,
    pub transfers: Vec<Transfer>,
    pub cancel: CancelToken,
    snapshot: PoolSnapshot,
    pow: ProofOfWork,
}

impl MiningJob {
    /// Run the (blocking) search for this job.
    pub fn search(&self) -> std::result::Result<Solution, MiningError> {
        self.pow
            .solve_until(&self.tip_digest, &self.transfers, &self.cancel)
    }
}

pub struct Node {
    id: String,
    pow: ProofOfWork,
    ledger: Mutex<Ledger>,
    peers: Mutex<PeerRegistry>,
}

impl Node {
    pub fn new(id: impl Into<String>, difficulty: u32) -> Self {
        let pow = ProofOfWork::new(difficulty);
        Self {
            id: id.into(),
            pow,
            ledger: Mutex::new(Ledger {
                chain: Blockchain::new(pow),
                pool: TransferPool::new(),
                searches: Vec::new(),
            }),
            peers: Mutex::new(PeerRegistry::new()),
        }
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().expect("mutex poisoned")
    }

    fn peer_registry(&self) -> MutexGuard<'_, PeerRegistry> {
        self.peers.lock().expect("mutex poisoned")
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pow(&self) -> &ProofOfWork {
        &self.pow
    }

    pub fn difficulty(&self) -> u32 {
        self.pow.difficulty()
    }

    /* -------------------- Transfers -------------------- */

    /// Accept a transfer into the pool and return the index of the block it
    /// is expected to land in.
    pub fn submit_transfer(&self, transfer: Transfer) -> Result<u64> {
        transfer.check().map_err(NodeError::InvalidTransfer)?;
        let mut ledger = self.ledger();
        ledger.pool.submit(transfer);
        debug!("POOL - transfer accepted (size now {})", ledger.pool.len());
        Ok(ledger.chain.last_block().index + 1)
    }

    pub fn pending(&self) -> Vec<Transfer> {
        self.ledger().pool.iter().cloned().collect()
    }

    pub fn pending_len(&self) -> usize {
        self.ledger().pool.len()
    }

    /* -------------------- Chain -------------------- */

    pub fn chain(&self) -> Vec<Block> {
        self.ledger().chain.blocks().to_vec()
    }

    pub fn chain_len(&self) -> usize {
        self.ledger().chain.len()
    }

    pub fn last_block(&self) -> Block {
        self.ledger().chain.last_block().clone()
    }

    pub fn is_chain_valid(&self) -> bool {
        self.ledger().chain.is_valid_chain()
    }

    /* -------------------- Mining -------------------- */

    /// Capture the tip and a snapshot of the pool, plus the reward transfer.
    pub fn start_mining(&self) -> MiningJob {
        let mut ledger = self.ledger();
        let tip = ledger.chain.last_block();
        let (tip_index, tip_digest) = (tip.index, tip.digest.clone());
        let snapshot = ledger.pool.snapshot();
        let mut transfers = snapshot.transfers.clone();
        transfers.push(Transfer::reward(&self.id));

        let cancel = CancelToken::new();
        ledger.searches.push(cancel.clone());
        debug!(
            "MINER - job on tip #{} with {} transfers",
            tip_index,
            transfers.len()
        );
        MiningJob {
            tip_index,
            tip_digest,
            transfers,
            cancel,
            snapshot,
            pow: self.pow,
        }
    }

    /// Seal a finished search into a block, if the tip has not moved.
    pub fn finish_mining(
        &self,
        job: MiningJob,
        outcome: std::result::Result<Solution, MiningError>,
    ) -> Result<Block> {
        let mut ledger = self.ledger();
        ledger.searches.retain(|t| !t.same_as(&job.cancel));

        let solution = outcome?;
        if ledger.chain.last_block().digest != job.tip_digest {
            warn!(
                "MINER - tip moved past #{} during the search, discarding",
                job.tip_index
            );
            return Err(NodeError::StaleTip);
        }

        let block = ledger.chain.next_block(Payload {
            transfers: job.transfers,
            solution: solution.solution,
        });
        let block = ledger.chain.append(block)?.clone();
        let drained = ledger.pool.drain(&job.snapshot);
        // anything still searching now targets an old tip
        ledger.cancel_searches();

        info!(
            "MINER - sealed block #{} (digest={}, proof={}, solution={}, drained={})",
            block.index, block.digest, solution.digest, solution.solution, drained
        );
        Ok(block)
    }

    /// Mine one block on the current tip. Blocks the caller for the search.
    pub fn mine(&self) -> Result<Block> {
        let job = self.start_mining();
        let outcome = job.search();
        self.finish_mining(job, outcome)
    }

    /* -------------------- Peers -------------------- */

    /// Register every address or none of them. Returns the full peer set.
    pub fn register_peers(&self, addresses: &[String]) -> Result<Vec<String>> {
        if addresses.is_empty() {
            return Err(NodeError::EmptyPeerList);
        }
        for address in addresses {
            peers::normalize_address(address)?;
        }
        let mut registry = self.peer_registry();
        for address in addresses {
            if registry.register(address)? {
                info!("PEERS - registered {address}");
            }
        }
        Ok(registry.to_vec())
    }

    pub fn peers(&self) -> Vec<String> {
        self.peer_registry().to_vec()
    }

    pub fn peer_count(&self) -> usize {
        self.peer_registry().len()
    }

    /* -------------------- Consensus -------------------- */

    /// Replace the local chain with `candidate` if it is still strictly
    /// longer. The candidate must already be validated.
    pub fn adopt_chain(&self, candidate: Vec<Block>) -> bool {
        let mut ledger = self.ledger();
        if candidate.len() <= ledger.chain.len() {
            debug!(
                "CONSENSUS - candidate of {} no longer beats local {}",
                candidate.len(),
                ledger.chain.len()
            );
            return false;
        }
        let (old, new) = (ledger.chain.len(), candidate.len());
        ledger.chain.replace(candidate);
        ledger.cancel_searches();
        info!("CONSENSUS - local chain replaced ({old} -> {new} blocks)");
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::blockchain::hash;
    use crate::blockchain::chain::tests::TEST_DIFFICULTY;

    pub(crate) fn node(id: &str) -> Node {
        Node::new(id, TEST_DIFFICULTY)
    }

    #[test]
    fn mining_empty_pool_yields_reward_only_block() {
        let n = node("miner-a");
        let genesis = n.last_block();
        let block = n.mine().unwrap();

        assert_eq!(n.chain_len(), 2);
        assert_eq!(block.index, 1);
        assert_eq!(block.previous_digest, genesis.digest);
        assert_eq!(block.payload.transfers, vec![Transfer::reward("miner-a")]);
        let proof = block.proof_digest(&genesis.digest);
        assert!(hash::meets_difficulty(&proof, TEST_DIFFICULTY));
        assert!(n.is_chain_valid());
    }

    #[test]
    fn mining_includes_submitted_transfers_and_drains_pool() {
        let n = node("miner-a");
        let t1 = Transfer::new("alice", "bob", 5.0);
        let t2 = Transfer::new("bob", "carol", 2.0);
        assert_eq!(n.submit_transfer(t1.clone()).unwrap(), 1);
        assert_eq!(n.submit_transfer(t2.clone()).unwrap(), 1);

        let block = n.mine().unwrap();
        assert_eq!(
            block.payload.transfers,
            vec![t1, t2, Transfer::reward("miner-a")]
        );
        assert_eq!(n.pending_len(), 0);

        // drained transfers do not come back
        let next = n.mine().unwrap();
        assert_eq!(next.payload.transfers, vec![Transfer::reward("miner-a")]);
    }

    #[test]
    fn mining_is_monotonic() {
        let n = node("m");
        for expected in 2..5 {
            let tip = n.last_block();
            let block = n.mine().unwrap();
            assert_eq!(n.chain_len(), expected);
            assert_eq!(block.previous_digest, tip.digest);
            assert_eq!(block.index, tip.index + 1);
        }
    }

    #[test]
    fn submissions_during_search_survive() {
        let n = node("m");
        n.submit_transfer(Transfer::new("a", "b", 1.0)).unwrap();
        let job = n.start_mining();
        n.submit_transfer(Transfer::new("late", "b", 9.0)).unwrap();
        let outcome = job.search();
        let block = n.finish_mining(job, outcome).unwrap();

        assert_eq!(block.payload.transfers.len(), 2);
        assert_eq!(n.pending(), vec![Transfer::new("late", "b", 9.0)]);
    }

    #[test]
    fn competing_search_is_cancelled_and_discarded() {
        let n = node("m");
        let job = n.start_mining();
        n.mine().unwrap();
        assert!(job.cancel.is_cancelled());

        let outcome = job.search();
        assert!(matches!(
            n.finish_mining(job, outcome),
            Err(NodeError::Mining(MiningError::Cancelled { .. }))
        ));
        assert_eq!(n.chain_len(), 2);
    }

    #[test]
    fn finished_search_on_stale_tip_is_rejected() {
        let n = node("m");
        n.submit_transfer(Transfer::new("a", "b", 1.0)).unwrap();
        let job = n.start_mining();
        let outcome = job.search();
        n.mine().unwrap();

        assert!(matches!(
            n.finish_mining(job, outcome),
            Err(NodeError::StaleTip)
        ));
        assert_eq!(n.chain_len(), 2);
        assert!(n.is_chain_valid());
    }

    #[test]
    fn invalid_transfer_is_rejected() {
        let n = node("m");
        assert!(matches!(
            n.submit_transfer(Transfer::new("", "b", 1.0)),
            Err(NodeError::InvalidTransfer(_))
        ));
        assert_eq!(n.pending_len(), 0);
    }

    #[test]
    fn register_peers_is_all_or_nothing() {
        let n = node("m");
        assert!(matches!(
            n.register_peers(&[]),
            Err(NodeError::EmptyPeerList)
        ));
        assert!(n
            .register_peers(&["a:5000".to_string(), "http://".to_string()])
            .is_err());
        assert!(n.peers().is_empty());

        let all = n
            .register_peers(&["http://a:5000".to_string(), "b:5001".to_string()])
            .unwrap();
        assert_eq!(all, vec!["a:5000", "b:5001"]);
    }

    #[test]
    fn adopt_chain_cancels_searches() {
        let donor = node("b");
        donor.mine().unwrap();
        donor.mine().unwrap();

        let n = node("a");
        let job = n.start_mining();
        assert!(n.adopt_chain(donor.chain()));
        assert!(job.cancel.is_cancelled());
        assert_eq!(n.chain(), donor.chain());

        // not strictly longer any more
        assert!(!n.adopt_chain(donor.chain()));
    }
}
