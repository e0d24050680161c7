use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, Payload};
use crate::node::{HttpPeerClient, Node};
use crate::transaction::Transfer;

/// Shared application state: the node plus the client used to reach peers.
pub struct AppState {
    pub node: Node,
    pub peer_client: HttpPeerClient,
}

impl AppState {
    pub fn new(node: Node, peer_client: HttpPeerClient) -> Self {
        Self { node, peer_client }
    }
}

/* ---------- Transfer API Models ---------- */

#[derive(Serialize)]
pub struct NewTransferResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct MempoolResponse {
    pub size: usize,
    pub transactions: Vec<Transfer>,
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize, Deserialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
    pub length: usize,
}

#[derive(Serialize, Deserialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub timestamp: i64,
    pub payload: Payload,
    pub previous_digest: String,
    pub digest: String,
}

impl From<Block> for MineResponse {
    fn from(block: Block) -> Self {
        Self {
            message: "New Block Forged".to_string(),
            index: block.index,
            timestamp: block.timestamp,
            payload: block.payload,
            previous_digest: block.previous_digest,
            digest: block.digest,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
}

/* ---------- Peer API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize)]
pub struct NodesResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ResolveResponse {
    pub message: String,
    pub replaced: bool,
    pub length: usize,
    pub chain: Vec<Block>,
}

/* ---------- Stats ---------- */

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub node_id: String,
    pub height: usize,
    pub difficulty: u32,
    pub mempool_size: usize,
    pub peers: usize,
    pub last_interval_secs: Option<i64>,
}
