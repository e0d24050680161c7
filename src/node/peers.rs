use reqwest::Url;

use super::error::PeerError;

/// Known peers, kept in registration order. Append-only.
#[derive(Debug, Default, Clone)]
pub struct PeerRegistry {
    peers: Vec<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one address. Returns `false` if it was already known.
    pub fn register(&mut self, address: &str) -> Result<bool, PeerError> {
        let peer = normalize_address(address)?;
        if self.peers.contains(&peer) {
            return Ok(false);
        }
        self.peers.push(peer);
        Ok(true)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.peers.clone()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }
}

/// Reduce a peer address to `host:port`.
///
/// Accepts full URLs (`http://10.0.0.5:5000/anything`) and bare
/// `host:port` forms. A missing port falls back to the scheme default.
/// Peers are always fetched over plain HTTP, so other schemes are refused.
pub fn normalize_address(address: &str) -> Result<String, PeerError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(PeerError::InvalidAddress(address.to_string()));
    }
    let url = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("http://{trimmed}"))
    }
    .map_err(|_| PeerError::InvalidAddress(address.to_string()))?;
    if url.scheme() != "http" {
        return Err(PeerError::UnsupportedScheme(url.scheme().to_string()));
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| PeerError::InvalidAddress(address.to_string()))?;
    match url.port_or_known_default() {
        Some(port) => Ok(format!("{host}:{port}")),
        None => Err(PeerError::InvalidAddress(address.to_string())),
    }
}
