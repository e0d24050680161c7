use sha2::{Digest, Sha256};

use crate::transaction::Transfer;

/// SHA-256 of `bytes`, rendered as 64 lowercase hex characters.
pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Stable serialization of a transfer list.
///
/// `Transfer` is a plain struct, so serde_json emits its fields in declaration
/// order and the output is byte-identical for equal lists on every node.
pub fn serialize_transfers(transfers: &[Transfer]) -> String {
    serde_json::to_string(transfers).expect("transfer list is always serializable")
}

/// Puzzle digest over an already serialized transfer list.
pub fn proof_digest_raw(previous_digest: &str, transfers_json: &str, solution: u64) -> String {
    let preimage = format!("{previous_digest}{transfers_json}{solution}");
    digest(preimage.as_bytes())
}

/// Puzzle digest for `(previous_digest, transfers, solution)`.
pub fn proof_digest(previous_digest: &str, transfers: &[Transfer], solution: u64) -> String {
    proof_digest_raw(previous_digest, &serialize_transfers(transfers), solution)
}

/// Difficulty predicate: `difficulty` leading `'0'` characters.
pub fn meets_difficulty(digest: &str, difficulty: u32) -> bool {
    let n = difficulty as usize;
    digest.len() >= n && digest.bytes().take(n).all(|c| c == b'0')
}
