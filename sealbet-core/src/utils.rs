//! # Utility Functions
//!
//! Common helpers for hashing, nonce generation, and timestamp handling.

use crate::{error::Result, BettingError};
use sha2::{Digest, Sha256};

/// Hash a message using SHA256
pub fn sha256_hash(message: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(message.as_bytes());
    let hash = hasher.finalize();
    hex::encode(hash)
}

/// Generate a random bet nonce.
///
/// Convenience for callers building a commitment off-band; any u64 kept
/// secret until reveal time works just as well.
pub fn generate_nonce() -> u64 {
    use rand::Rng;
    rand::thread_rng().gen()
}

/// Format timestamp as human-readable string
pub fn format_timestamp(timestamp: u64) -> String {
    use chrono::DateTime;
    let dt = DateTime::from_timestamp(timestamp as i64, 0).unwrap_or_default();
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Parse timestamp from string
pub fn parse_timestamp(timestamp_str: &str) -> Result<u64> {
    timestamp_str
        .parse::<u64>()
        .map_err(|_| BettingError::Validation(format!("invalid timestamp: {timestamp_str}")))
}
