//! Longest-valid-chain resolution against the registered peers.

use log::{debug, info, warn};

use super::Node;
use super::client::ChainSource;
use crate::blockchain::{Block, ProofOfWork, validate};

/// Pick the chain to adopt among fetched candidates.
///
/// Only candidates strictly longer than `local_len` that validate are
/// considered. Among equally long survivors the first one seen wins.
pub fn select_candidate(
    local_len: usize,
    candidates: Vec<(String, Vec<Block>)>,
    pow: &ProofOfWork,
) -> Option<(String, Vec<Block>)> {
    let mut best: Option<(String, Vec<Block>)> = None;
    let mut max_len = local_len;

    for (peer, chain) in candidates {
        if chain.len() <= max_len {
            debug!(
                "CONSENSUS - {peer} offers {} blocks, need more than {max_len}",
                chain.len()
            );
            continue;
        }
        if !validate(&chain, pow) {
            warn!(
                "CONSENSUS - {peer} offers a longer chain ({} blocks) that fails validation",
                chain.len()
            );
            continue;
        }
        max_len = chain.len();
        best = Some((peer, chain));
    }
    best
}

/// Query every peer and adopt the longest valid chain strictly longer than
/// ours. Returns whether the local chain was replaced.
pub async fn resolve<S: ChainSource>(node: &Node, source: &S) -> bool {
    let peers = node.peers();
    let local_len = node.chain_len();
    debug!(
        "CONSENSUS - resolving against {} peers (local length {local_len})",
        peers.len()
    );

    let mut candidates = Vec::with_capacity(peers.len());
    for peer in peers {
        match source.fetch_chain(&peer).await {
            Ok(chain) => candidates.push((peer, chain)),
            Err(e) => warn!("CONSENSUS - skipping {peer}: {e}"),
        }
    }

    match select_candidate(local_len, candidates, node.pow()) {
        Some((peer, chain)) => {
            let replaced = node.adopt_chain(chain);
            if replaced {
                info!("CONSENSUS - adopted chain from {peer}");
            }
            replaced
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::blockchain::{Block, Payload};
    use crate::node::PeerError;
    use crate::node::tests::node;

    /// In-memory peers; unknown addresses behave like unreachable hosts.
    #[derive(Default)]
    struct FakePeers {
        chains: HashMap<String, Vec<Block>>,
    }

    impl FakePeers {
        fn with(mut self, peer: &str, chain: Vec<Block>) -> Self {
            self.chains.insert(peer.to_string(), chain);
            self
        }
    }

    impl ChainSource for FakePeers {
        async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>, PeerError> {
            self.chains
                .get(peer)
                .cloned()
                .ok_or(PeerError::Status(503))
        }
    }

    fn node_with_len(id: &str, len: usize) -> Node {
        let n = node(id);
        for _ in 1..len {
            n.mine().unwrap();
        }
        n
    }

    /// Rewrite block `at` with a solution that misses the difficulty while
    /// keeping its stored digest consistent.
    fn tamper_solution(chain: &mut [Block], at: usize, pow: &ProofOfWork) {
        let prev = chain[at - 1].digest.clone();
        let b = chain[at].clone();
        let bad = (b.payload.solution + 1..)
            .find(|s| !pow.verify(&prev, &b.payload.transfers, *s))
            .unwrap();
        chain[at] = Block::with_timestamp(
            b.index,
            b.timestamp,
            Payload {
                transfers: b.payload.transfers,
                solution: bad,
            },
            prev,
        );
    }

    #[actix_web::test]
    async fn adopts_longer_valid_chain() {
        let a = node_with_len("a", 3);
        let b = node_with_len("b", 5);
        a.register_peers(&["b:5000".to_string()]).unwrap();
        let peers = FakePeers::default().with("b:5000", b.chain());

        assert!(resolve(&a, &peers).await);
        assert_eq!(a.chain(), b.chain());
    }

    #[actix_web::test]
    async fn rejects_longer_chain_with_tampered_solution() {
        let a = node_with_len("a", 3);
        let b = node_with_len("b", 5);
        let before = a.chain();

        let mut forged = b.chain();
        tamper_solution(&mut forged, 4, b.pow());
        a.register_peers(&["b:5000".to_string()]).unwrap();
        let peers = FakePeers::default().with("b:5000", forged);

        assert!(!resolve(&a, &peers).await);
        assert_eq!(a.chain(), before);
    }

    #[actix_web::test]
    async fn never_shortens_and_skips_unreachable_peers() {
        let a = node_with_len("a", 4);
        let short = node_with_len("s", 2);
        a.register_peers(&["down:1".to_string(), "s:5000".to_string()])
            .unwrap();
        let peers = FakePeers::default().with("s:5000", short.chain());

        assert!(!resolve(&a, &peers).await);
        assert_eq!(a.chain_len(), 4);
    }

    #[actix_web::test]
    async fn equal_length_keeps_local_chain() {
        let a = node_with_len("a", 3);
        let b = node_with_len("b", 3);
        let before = a.chain();
        a.register_peers(&["b:5000".to_string()]).unwrap();
        let peers = FakePeers::default().with("b:5000", b.chain());

        assert!(!resolve(&a, &peers).await);
        assert_eq!(a.chain(), before);
    }

    #[test]
    fn picks_longest_and_first_seen_on_ties() {
        let pow = ProofOfWork::new(crate::blockchain::chain::tests::TEST_DIFFICULTY);
        let c4 = node_with_len("c", 4).chain();
        let d6 = node_with_len("d", 6).chain();
        let e6 = node_with_len("e", 6).chain();

        let picked = select_candidate(
            2,
            vec![
                ("c".into(), c4),
                ("d".into(), d6.clone()),
                ("e".into(), e6),
            ],
            &pow,
        )
        .unwrap();
        assert_eq!(picked.0, "d");
        assert_eq!(picked.1, d6);
    }

    #[actix_web::test]
    async fn no_peers_means_no_change() {
        let a = node_with_len("a", 2);
        assert!(!resolve(&a, &FakePeers::default()).await);
        assert_eq!(a.chain_len(), 2);
    }
}
