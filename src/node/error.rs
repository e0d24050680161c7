use thiserror::Error;

use crate::blockchain::{ChainError, MiningError};

/// Failures talking to, or registering, a peer.
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("invalid peer address: {0:?}")]
    InvalidAddress(String),

    #[error("unsupported peer scheme {0:?}, peers are reached over http")]
    UnsupportedScheme(String),

    #[error("request to peer failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("peer answered with status {0}")]
    Status(u16),

    #[error("peer reported length {reported} but sent {actual} blocks")]
    LengthMismatch { reported: usize, actual: usize },
}

/// Errors surfaced by node operations.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("invalid transfer: {0}")]
    InvalidTransfer(&'static str),

    #[error("please supply a valid list of nodes")]
    EmptyPeerList,

    #[error(transparent)]
    Peer(#[from] PeerError),

    #[error("tip moved during the search, block discarded")]
    StaleTip,

    #[error(transparent)]
    Mining(#[from] MiningError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

pub type Result<T> = std::result::Result<T, NodeError>;
