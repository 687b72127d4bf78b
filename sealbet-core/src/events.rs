//! Notifications emitted by the engine.
//!
//! Every state transition appends one entry to the engine's event log,
//! decoupled from the mutation itself, so external observers (indexers,
//! front-ends) can reconstruct state without re-querying every call.

use crate::{
    commitment::CommitHash,
    engine::AccountId,
    market::{Side, Winner},
};
use serde::{Deserialize, Serialize};

/// One notification from the engine's observable log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A market was created and is accepting commitments
    MarketCreated {
        market_id: u64,
        creator: AccountId,
        party_a: String,
        party_b: String,
        betting_end_time: u64,
    },

    /// A hidden bet was committed; the choice stays opaque
    BetCommitted {
        market_id: u64,
        bettor: AccountId,
        commit_hash: CommitHash,
        amount: u64,
    },

    /// A commitment was opened and its choice disclosed
    BetRevealed {
        market_id: u64,
        bettor: AccountId,
        choice: Side,
        amount: u64,
    },

    /// A committed bet was withdrawn before the cancellation deadline
    BetCancelled {
        market_id: u64,
        bettor: AccountId,
        amount: u64,
    },

    /// An unrevealed bet was returned after the reveal window closed
    BetRefunded {
        market_id: u64,
        bettor: AccountId,
        amount: u64,
    },

    /// The betting phase ended and the market awaits resolution
    BettingClosed { market_id: u64 },

    /// The oracle fixed the market outcome
    WinnerDeclared { market_id: u64, winner: Winner },

    /// The losing pool was split into fee, party reward, and bonus pool
    RewardsDistributed {
        market_id: u64,
        fee: u64,
        party_reward: u64,
        bonus_pool: u64,
    },

    /// A bettor pulled their aggregate entitlement
    RewardClaimed {
        market_id: u64,
        bettor: AccountId,
        amount: u64,
    },

    /// The market was cancelled; all stakes become refundable at face value
    MarketCancelled { market_id: u64 },

    /// Admin: platform fee percentage changed
    PlatformFeeUpdated { percentage: u8 },

    /// Admin: fee recipient changed
    FeeRecipientUpdated { recipient: AccountId },

    /// Admin: default bet bounds changed
    DefaultBetLimitsUpdated { min: u64, max: u64 },

    /// Admin: oracle identity changed
    OracleUpdated { oracle: AccountId },

    /// Admin: ownership handed over
    OwnershipTransferred { new_owner: AccountId },

    /// Admin: mutating entry points blocked
    EnginePaused,

    /// Admin: mutating entry points reopened
    EngineUnpaused,
}
