use std::future::Future;
use std::time::Duration;

use log::debug;
use serde::Deserialize;

use super::error::PeerError;
use crate::blockchain::Block;

/// Path every node serves its full chain on.
pub const CHAIN_PATH: &str = "/api/v1/chain/";

/// Somewhere candidate chains can be fetched from, keyed by peer address.
pub trait ChainSource {
    fn fetch_chain(&self, peer: &str) -> impl Future<Output = Result<Vec<Block>, PeerError>>;
}

/// Wire shape of a peer's `GET /chain/` answer.
#[derive(Debug, Deserialize)]
struct RemoteChain {
    chain: Vec<Block>,
    length: usize,
}

/// Fetches chains from peers over plain HTTP with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpPeerClient {
    client: reqwest::Client,
}

impl HttpPeerClient {
    pub fn new(timeout: Duration) -> Result<Self, PeerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl ChainSource for HttpPeerClient {
    async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>, PeerError> {
        let url = format!("http://{peer}{CHAIN_PATH}");
        debug!("CONSENSUS - fetching {url}");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PeerError::Status(status.as_u16()));
        }
        let remote: RemoteChain = response.json().await?;
        if remote.length != remote.chain.len() {
            return Err(PeerError::LengthMismatch {
                reported: remote.length,
                actual: remote.chain.len(),
            });
        }
        Ok(remote.chain)
    }
}
