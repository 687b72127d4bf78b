//! Error types for sealbet-core

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, BettingError>;

/// Error types for engine operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BettingError {
    /// Bad parameters, rejected before any state change
    #[error("invalid parameter: {0}")]
    Validation(String),

    /// Call made outside its valid time window
    #[error("outside valid window: {0}")]
    OutsideWindow(String),

    /// Caller lacks the rights for this operation
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Operation conflicts with the current lifecycle state
    #[error("state conflict: {0}")]
    StateConflict(String),

    /// Commitment mismatch at reveal time.
    ///
    /// Deliberately carries no detail about which input differed, so a
    /// failed reveal cannot be used to probe another bettor's commitment.
    #[error("invalid reveal")]
    InvalidReveal,

    /// Mutating entry points are blocked while the engine is paused
    #[error("engine is paused")]
    Paused,

    /// No market with this id
    #[error("unknown market: {0}")]
    UnknownMarket(u64),

    /// No bet record at this index
    #[error("unknown bet record {index} in market {market_id}")]
    UnknownBet { market_id: u64, index: usize },

    /// Hex decoding errors
    #[error("hex decoding error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// An outbound value transfer failed
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

/// Failure of a push transfer to a recipient identity.
///
/// Surfaced verbatim through [`BettingError::Transfer`]; the operation that
/// attempted the transfer retains none of its bookkeeping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transfer of {amount} to {recipient} failed: {reason}")]
pub struct TransferError {
    /// Intended recipient identity
    pub recipient: String,
    /// Amount that failed to move
    pub amount: u64,
    /// Implementation-specific cause
    pub reason: String,
}
