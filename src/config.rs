use std::env;
use std::str::FromStr;
use std::time::Duration;

use log::warn;

use crate::blockchain::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY};

/// Node settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    /// Recipient of this node's mining rewards.
    pub node_id: String,
    pub difficulty: u32,
    /// Peers registered at start-up.
    pub peers: Vec<String>,
    pub peer_timeout: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            node_id: random_node_id(),
            difficulty: DEFAULT_DIFFICULTY,
            peers: Vec::new(),
            peer_timeout: Duration::from_secs(5),
        }
    }
}

impl NodeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", &lookup, defaults.port),
            node_id: lookup("NODE_ID")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.node_id),
            difficulty: bounded_difficulty(
                parse_or("DIFFICULTY", &lookup, defaults.difficulty),
                defaults.difficulty,
            ),
            peers: lookup("PEERS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            peer_timeout: Duration::from_secs(parse_or(
                "PEER_TIMEOUT_SECS",
                &lookup,
                defaults.peer_timeout.as_secs(),
            )),
        }
    }
}

fn parse_or<T: FromStr>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("config - ignoring unparseable {key}={raw:?}");
            default
        }),
        None => default,
    }
}

fn bounded_difficulty(difficulty: u32, default: u32) -> u32 {
    if difficulty > MAX_DIFFICULTY {
        warn!("config - DIFFICULTY={difficulty} exceeds {MAX_DIFFICULTY}, using {default}");
        return default;
    }
    difficulty
}

fn random_node_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
