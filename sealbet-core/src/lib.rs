//! # Sealbet Core
//!
//! Core Rust library for commit-reveal settlement of binary-outcome wager
//! markets.
//!
//! This library provides the fundamental building blocks for running
//! front-running-resistant betting markets where:
//! - Bets are committed as opaque SHA-256 digests with an escrowed deposit
//! - Choices stay hidden until a time-boxed reveal phase opens them
//! - An oracle fixes the outcome after the reveal phase closes
//! - The losing pool is split between a platform fee, a party reward, and
//!   proportional winner payouts, pulled through individual claims
//!
//! ## Features
//!
//! - **Market Registry**: create binary markets and drive their lifecycle
//! - **Commit-Reveal Ledger**: append-only bet records with commitment
//!   verification, cancellation, and refunds
//! - **Settlement Calculator**: exact integer pool splitting and pull-based
//!   claims with no rounding leakage
//! - **Platform Controller**: fee settings, bet bounds, pause switch, and
//!   O(1) statistics
//!
//! The engine treats caller identity and value transfer as opaque
//! primitives: identities arrive as [`AccountId`] labels and outbound value
//! leaves through the [`Treasury`] trait supplied by the host environment.
//!
//! ## Examples
//!
//! ```rust
//! use sealbet_core::{
//!     commitment_hash, AccountId, BettingEngine, CreateMarketParams, Side, Treasury,
//!     TransferError,
//! };
//!
//! /// Treasury that discards outbound value (a real host moves funds here)
//! struct NullTreasury;
//! impl Treasury for NullTreasury {
//!     fn transfer(&mut self, _to: &AccountId, _amount: u64) -> Result<(), TransferError> {
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<(), sealbet_core::BettingError> {
//! let owner = AccountId::new("owner");
//! let oracle = AccountId::new("oracle");
//! let mut engine = BettingEngine::new(owner.clone(), oracle, NullTreasury);
//!
//! let now = 1_700_000_000;
//! let market_id = engine.create_market(
//!     &owner,
//!     CreateMarketParams {
//!         party_a: "Team A".to_string(),
//!         party_b: "Team B".to_string(),
//!         party_reward_recipient: AccountId::new("organizer"),
//!         betting_duration_secs: 600,
//!         party_reward_percentage: 10,
//!         min_bet_amount: 0,
//!         max_bet_amount: 0,
//!     },
//!     now,
//! )?;
//!
//! // computed off-band, before the deposit ever reaches the engine
//! let bettor = AccountId::new("alice");
//! let hash = commitment_hash(market_id, &bettor, Side::A, 42, 100);
//! engine.commit_bet(&bettor, market_id, hash, 100, now + 1)?;
//! # Ok(())
//! # }
//! ```

pub mod commitment;
pub mod engine;
pub mod error;
pub mod events;
pub mod ledger;
pub mod market;
pub mod platform;
pub mod settlement;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

pub use commitment::{commitment_hash, CommitHash};
pub use engine::{AccountId, BettingEngine, Treasury};
pub use error::{BettingError, Result, TransferError};
pub use events::Event;
pub use ledger::{BetRecord, BetState, UserBetsPage};
pub use market::{
    CreateMarketParams, Market, MarketBettingView, MarketStatus, MarketView, Side, Winner,
};
pub use platform::{MarketStats, PlatformState, PlatformStats};
pub use settlement::Settlement;
pub use utils::*;

/// Reveal phase length past `betting_end_time` (1 hour)
pub const REVEAL_WINDOW_SECS: u64 = 3_600;

/// Cancellation closes this long before `betting_end_time` (30 minutes)
pub const CANCEL_GRACE_SECS: u64 = 1_800;

/// Upper bound on the platform fee percentage
pub const MAX_PLATFORM_FEE_PCT: u8 = 10;

/// Upper bound on a market's party reward percentage
pub const MAX_PARTY_REWARD_PCT: u8 = 20;

/// Platform fee percentage a fresh engine starts with
pub const DEFAULT_PLATFORM_FEE_PCT: u8 = 2;

/// Minimum stake for markets without bounds of their own
pub const DEFAULT_MIN_BET: u64 = 1;

/// Maximum stake for markets without bounds of their own (0 = none)
pub const DEFAULT_MAX_BET: u64 = 0;

/// Hard cap on one page of a bettor's records
pub const MAX_BETS_PER_PAGE: usize = 100;
