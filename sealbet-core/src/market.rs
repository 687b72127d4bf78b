//! # Market Registry
//!
//! Market creation, lookup, and the lifecycle state machine:
//!
//! ```text
//! Active ──close──► BettingClosed ──declare_winner──► Resolved
//!   │                     │
//!   └──────cancel─────────┴──────────► Cancelled
//! ```
//!
//! A market moves to `BettingClosed` once anyone closes it after the reveal
//! window, or straight to `Cancelled` if nobody revealed on either side.
//! `Resolved` and `Cancelled` are terminal.

use crate::{
    engine::{AccountId, BettingEngine, Treasury},
    error::Result,
    events::Event,
    ledger::BetRecord,
    settlement::Settlement,
    BettingError, MAX_PARTY_REWARD_PCT, REVEAL_WINDOW_SECS,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// One of the two outcomes of a market
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Wire tag used in the commitment byte layout (A = 1, B = 2)
    pub const fn tag(self) -> u8 {
        match self {
            Side::A => 1,
            Side::B => 2,
        }
    }

    /// The opposing side
    pub const fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

/// Oracle verdict for a resolved market
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    A,
    B,
    Draw,
}

impl Winner {
    /// The winning side, or `None` for a draw
    pub const fn winning_side(self) -> Option<Side> {
        match self {
            Winner::A => Some(Side::A),
            Winner::B => Some(Side::B),
            Winner::Draw => None,
        }
    }
}

impl From<Side> for Winner {
    fn from(side: Side) -> Self {
        match side {
            Side::A => Winner::A,
            Side::B => Winner::B,
        }
    }
}

/// Lifecycle state of a market
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketStatus {
    /// Accepting commitments, then reveals
    Active,
    /// Windows closed, awaiting oracle resolution
    BettingClosed,
    /// Outcome fixed; settlement and claims may run
    Resolved,
    /// Terminal; all stakes refundable at face value
    Cancelled,
}

/// Parameters for [`BettingEngine::create_market`]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateMarketParams {
    /// Label of outcome A (e.g. "Team A")
    pub party_a: String,
    /// Label of outcome B
    pub party_b: String,
    /// Identity receiving the party cut of the losing pool
    pub party_reward_recipient: AccountId,
    /// Length of the commit phase, in seconds
    pub betting_duration_secs: u64,
    /// Cut of the losing pool paid to the party recipient, 0..=20
    pub party_reward_percentage: u8,
    /// Per-market minimum stake; 0 defers to the platform default
    pub min_bet_amount: u64,
    /// Per-market maximum stake; 0 defers to the platform default
    pub max_bet_amount: u64,
}

/// A binary-outcome wager market.
///
/// Owns its append-only bet ledger; records are only ever transitioned,
/// never deleted, so the full audit history survives settlement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Market {
    /// Sequential identifier, assigned at creation
    pub id: u64,

    /// Label of outcome A
    pub party_a: String,

    /// Label of outcome B
    pub party_b: String,

    /// Identity receiving the party cut of the losing pool
    pub party_reward_recipient: AccountId,

    /// No commitments accepted at or after this time
    pub betting_end_time: u64,

    /// No reveals accepted at or after this time
    pub reveal_end_time: u64,

    /// Cut of the losing pool paid to the party recipient
    pub party_reward_percentage: u8,

    /// Per-market minimum stake (0 = platform default)
    pub min_bet_amount: u64,

    /// Per-market maximum stake (0 = platform default)
    pub max_bet_amount: u64,

    /// Revealed stake on side A
    pub total_pool_a: u64,

    /// Revealed stake on side B
    pub total_pool_b: u64,

    /// Lifecycle state
    pub status: MarketStatus,

    /// Oracle verdict, unset until resolved
    pub winner: Option<Winner>,

    /// Locked settlement snapshot, unset until rewards are distributed
    pub(crate) settlement: Option<Settlement>,

    /// Revealed bet count
    pub(crate) revealed_bets: u64,

    /// Revealed volume
    pub(crate) revealed_volume: u64,

    /// Distinct bettors revealed on side A
    pub(crate) bettors_a: u64,

    /// Distinct bettors revealed on side B
    pub(crate) bettors_b: u64,

    /// Append-only record arena, addressed by stable index
    pub(crate) bets: Vec<BetRecord>,

    /// Arena indices per bettor, in commit order
    pub(crate) bets_by_bettor: HashMap<AccountId, Vec<usize>>,

    /// Bettors already counted toward `bettors_a`
    pub(crate) seen_bettors_a: HashSet<AccountId>,

    /// Bettors already counted toward `bettors_b`
    pub(crate) seen_bettors_b: HashSet<AccountId>,
}

impl Market {
    /// Revealed pool for one side
    pub fn pool_for(&self, side: Side) -> u64 {
        match side {
            Side::A => self.total_pool_a,
            Side::B => self.total_pool_b,
        }
    }

    /// The bet record arena, in commit order
    pub fn bets(&self) -> &[BetRecord] {
        &self.bets
    }

    /// Whether any bet record exists at all, in any state
    pub fn has_bets(&self) -> bool {
        !self.bets.is_empty()
    }

    /// Last moment a committed bet can still be cancelled
    pub fn cancel_deadline(&self) -> u64 {
        self.betting_end_time
            .saturating_sub(crate::CANCEL_GRACE_SECS)
    }

    /// Credit a revealed bet to its side's pool and counters
    pub(crate) fn record_reveal(&mut self, bettor: &AccountId, side: Side, amount: u64) {
        match side {
            Side::A => {
                self.total_pool_a += amount;
                if self.seen_bettors_a.insert(bettor.clone()) {
                    self.bettors_a += 1;
                }
            }
            Side::B => {
                self.total_pool_b += amount;
                if self.seen_bettors_b.insert(bettor.clone()) {
                    self.bettors_b += 1;
                }
            }
        }
        self.revealed_bets += 1;
        self.revealed_volume += amount;
    }
}

/// Basic metadata view of a market
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketView {
    pub id: u64,
    pub party_a: String,
    pub party_b: String,
    pub status: MarketStatus,
    pub winner: Option<Winner>,
    pub betting_end_time: u64,
    pub reveal_end_time: u64,
    pub party_reward_percentage: u8,
}

/// Betting-specific view of a market
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketBettingView {
    pub id: u64,
    pub total_pool_a: u64,
    pub total_pool_b: u64,
    pub min_bet_amount: u64,
    pub max_bet_amount: u64,
    pub betting_end_time: u64,
    pub reveal_end_time: u64,
}

impl<T: Treasury> BettingEngine<T> {
    /// Create a new market.
    ///
    /// Validates labels, reward percentage, duration, and bet bounds before
    /// touching any state; assigns the next sequential id on success and
    /// emits [`Event::MarketCreated`].
    pub fn create_market(
        &mut self,
        caller: &AccountId,
        params: CreateMarketParams,
        now: u64,
    ) -> Result<u64> {
        self.ensure_not_paused()?;

        if params.party_a.trim().is_empty() || params.party_b.trim().is_empty() {
            return Err(BettingError::Validation(
                "party labels must be non-empty".to_string(),
            ));
        }
        if params.party_reward_percentage > MAX_PARTY_REWARD_PCT {
            return Err(BettingError::Validation(format!(
                "party reward percentage exceeds maximum {MAX_PARTY_REWARD_PCT}"
            )));
        }
        if params.betting_duration_secs == 0 {
            return Err(BettingError::Validation(
                "betting duration must be positive".to_string(),
            ));
        }
        if params.min_bet_amount != 0
            && params.max_bet_amount != 0
            && params.min_bet_amount > params.max_bet_amount
        {
            return Err(BettingError::Validation(
                "minimum bet exceeds maximum bet".to_string(),
            ));
        }

        let market_id = self.markets.len() as u64;
        let betting_end_time = now + params.betting_duration_secs;
        let market = Market {
            id: market_id,
            party_a: params.party_a.clone(),
            party_b: params.party_b.clone(),
            party_reward_recipient: params.party_reward_recipient,
            betting_end_time,
            reveal_end_time: betting_end_time + REVEAL_WINDOW_SECS,
            party_reward_percentage: params.party_reward_percentage,
            min_bet_amount: params.min_bet_amount,
            max_bet_amount: params.max_bet_amount,
            total_pool_a: 0,
            total_pool_b: 0,
            status: MarketStatus::Active,
            winner: None,
            settlement: None,
            revealed_bets: 0,
            revealed_volume: 0,
            bettors_a: 0,
            bettors_b: 0,
            bets: Vec::new(),
            bets_by_bettor: HashMap::new(),
            seen_bettors_a: HashSet::new(),
            seen_bettors_b: HashSet::new(),
        };
        self.markets.push(market);
        self.platform.total_markets += 1;
        self.events.push(Event::MarketCreated {
            market_id,
            creator: caller.clone(),
            party_a: params.party_a,
            party_b: params.party_b,
            betting_end_time,
        });

        info!("market {market_id}: created, betting ends at {betting_end_time}");
        Ok(market_id)
    }

    /// Close the betting phase of a market.
    ///
    /// Callable by anyone once the reveal window has passed. Moves to
    /// `BettingClosed`, or directly to `Cancelled` when neither side has a
    /// single revealed bet (a market nobody settled). Returns the resulting
    /// status.
    pub fn close_betting(&mut self, market_id: u64, now: u64) -> Result<MarketStatus> {
        let market = self
            .markets
            .get_mut(market_id as usize)
            .ok_or(BettingError::UnknownMarket(market_id))?;

        if market.status != MarketStatus::Active {
            return Err(BettingError::StateConflict(format!(
                "market is {:?}, not Active",
                market.status
            )));
        }
        if now < market.reveal_end_time {
            return Err(BettingError::OutsideWindow(
                "reveal window is still open".to_string(),
            ));
        }

        let status = if market.total_pool_a == 0 && market.total_pool_b == 0 {
            market.status = MarketStatus::Cancelled;
            self.events.push(Event::MarketCancelled { market_id });
            debug!("market {market_id}: closed with no revealed bets, cancelled");
            MarketStatus::Cancelled
        } else {
            market.status = MarketStatus::BettingClosed;
            self.events.push(Event::BettingClosed { market_id });
            debug!("market {market_id}: betting closed");
            MarketStatus::BettingClosed
        };
        Ok(status)
    }

    /// Fix the market outcome. Oracle only.
    ///
    /// Requires `BettingClosed` and a past reveal window; a second call
    /// finds the market `Resolved` and fails.
    pub fn declare_winner(
        &mut self,
        caller: &AccountId,
        market_id: u64,
        winner: Winner,
        now: u64,
    ) -> Result<()> {
        if *caller != self.platform.oracle {
            return Err(BettingError::Unauthorized(
                "caller is not the oracle".to_string(),
            ));
        }
        let market = self
            .markets
            .get_mut(market_id as usize)
            .ok_or(BettingError::UnknownMarket(market_id))?;

        if now < market.reveal_end_time {
            return Err(BettingError::OutsideWindow(
                "cannot resolve before the reveal window closes".to_string(),
            ));
        }
        if market.status != MarketStatus::BettingClosed {
            return Err(BettingError::StateConflict(format!(
                "market is {:?}, not BettingClosed",
                market.status
            )));
        }

        market.status = MarketStatus::Resolved;
        market.winner = Some(winner);
        self.events.push(Event::WinnerDeclared { market_id, winner });
        info!("market {market_id}: resolved as {winner:?}");
        Ok(())
    }

    /// Emergency cancellation. Owner only.
    ///
    /// Permitted while `Active` with no bets at all, or in `BettingClosed`
    /// when no resolution is possible. Every bettor, revealed or not, can
    /// then retrieve their original stake through the refund and claim
    /// paths, without fee or party reward.
    pub fn cancel_market(&mut self, caller: &AccountId, market_id: u64) -> Result<()> {
        self.ensure_owner(caller)?;
        let market = self
            .markets
            .get_mut(market_id as usize)
            .ok_or(BettingError::UnknownMarket(market_id))?;

        match market.status {
            MarketStatus::Active => {
                if market.has_bets() {
                    return Err(BettingError::StateConflict(
                        "active market with bets cannot be cancelled".to_string(),
                    ));
                }
            }
            MarketStatus::BettingClosed => {}
            status => {
                return Err(BettingError::StateConflict(format!(
                    "market is already {status:?}"
                )));
            }
        }

        market.status = MarketStatus::Cancelled;
        self.events.push(Event::MarketCancelled { market_id });
        info!("market {market_id}: cancelled by owner");
        Ok(())
    }

    /// Basic metadata view
    pub fn market_view(&self, market_id: u64) -> Result<MarketView> {
        let market = self.market(market_id)?;
        Ok(MarketView {
            id: market.id,
            party_a: market.party_a.clone(),
            party_b: market.party_b.clone(),
            status: market.status,
            winner: market.winner,
            betting_end_time: market.betting_end_time,
            reveal_end_time: market.reveal_end_time,
            party_reward_percentage: market.party_reward_percentage,
        })
    }

    /// Betting-specific view: pools, bounds, deadlines
    pub fn market_betting_view(&self, market_id: u64) -> Result<MarketBettingView> {
        let market = self.market(market_id)?;
        Ok(MarketBettingView {
            id: market.id,
            total_pool_a: market.total_pool_a,
            total_pool_b: market.total_pool_b,
            min_bet_amount: market.min_bet_amount,
            max_bet_amount: market.max_bet_amount,
            betting_end_time: market.betting_end_time,
            reveal_end_time: market.reveal_end_time,
        })
    }
}
