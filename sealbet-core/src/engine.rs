//! # Betting Engine
//!
//! The single state store shared by the market registry, the commit-reveal
//! ledger, the settlement calculator, and the platform controller. Every
//! mutating call is synchronous and all-or-nothing: validation happens
//! before any mutation, and a failed outbound transfer rolls the call's own
//! writes back before the error surfaces.
//!
//! The engine authenticates nothing itself. Caller identity arrives as an
//! opaque [`AccountId`] attached to each call, deposits arrive as verified
//! call arguments, and outbound value leaves through the [`Treasury`] seam.

use crate::{
    error::{Result, TransferError},
    events::Event,
    market::Market,
    platform::PlatformState,
    BettingError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque caller identity.
///
/// The engine uses it only for access control and per-bettor indexing; what
/// the label means (a public key, an address, a username) is the calling
/// environment's business.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Wrap an identity label
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The identity label
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

/// Push-transfer primitive for outbound value.
///
/// Deposits are escrowed under the engine by the calling environment; this
/// trait is how escrowed value leaves again (refunds, fee and party-reward
/// payments, winner claims). A failed call MUST leave the implementation
/// without any observable effect: the engine rolls its own bookkeeping back
/// on [`TransferError`] and may retry the whole operation later.
pub trait Treasury {
    /// Push `amount` to `to`.
    fn transfer(&mut self, to: &AccountId, amount: u64) -> std::result::Result<(), TransferError>;
}

/// The betting engine: markets, their bet ledgers, platform state, and the
/// notification log, behind one strictly serialized mutation surface.
///
/// Time never advances on its own in here. Every time-gated operation takes
/// an externally supplied `now` Unix timestamp, read once per call.
#[derive(Debug)]
pub struct BettingEngine<T: Treasury> {
    pub(crate) platform: PlatformState,
    pub(crate) markets: Vec<Market>,
    pub(crate) events: Vec<Event>,
    pub(crate) treasury: T,
}

impl<T: Treasury> BettingEngine<T> {
    /// Create an engine with the given owner and oracle identities.
    ///
    /// The fee recipient starts as the owner and can be reassigned through
    /// [`set_fee_recipient`](BettingEngine::set_fee_recipient).
    pub fn new(owner: AccountId, oracle: AccountId, treasury: T) -> Self {
        Self {
            platform: PlatformState::new(owner, oracle),
            markets: Vec::new(),
            events: Vec::new(),
            treasury,
        }
    }

    /// Borrow a market by id
    pub fn market(&self, market_id: u64) -> Result<&Market> {
        self.markets
            .get(market_id as usize)
            .ok_or(BettingError::UnknownMarket(market_id))
    }

    /// Number of markets ever created
    pub fn market_count(&self) -> u64 {
        self.markets.len() as u64
    }

    /// Borrow the platform state
    pub fn platform(&self) -> &PlatformState {
        &self.platform
    }

    /// Borrow the treasury
    pub fn treasury(&self) -> &T {
        &self.treasury
    }

    /// Mutably borrow the treasury
    pub fn treasury_mut(&mut self) -> &mut T {
        &mut self.treasury
    }

    /// Notifications emitted so far, oldest first
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Take all pending notifications, leaving the log empty
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn ensure_not_paused(&self) -> Result<()> {
        if self.platform.paused {
            return Err(BettingError::Paused);
        }
        Ok(())
    }

    pub(crate) fn ensure_owner(&self, caller: &AccountId) -> Result<()> {
        if *caller != self.platform.owner {
            return Err(BettingError::Unauthorized(
                "caller is not the owner".to_string(),
            ));
        }
        Ok(())
    }
}
