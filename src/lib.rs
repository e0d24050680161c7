//! Proof-of-work ledger node: chain, pending pool, miner, peer registry and
//! longest-valid-chain consensus, served over HTTP.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod node;
pub mod transaction;
