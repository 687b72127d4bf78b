//! Common test utilities for sealbet-core tests.
//!
//! Provides a recording in-memory treasury, deterministic identities, and
//! standard engine/market constructors shared across all modules' tests.

use crate::{
    engine::{AccountId, BettingEngine, Treasury},
    error::TransferError,
    market::CreateMarketParams,
};

/// In-memory treasury that records every outbound credit.
///
/// The next transfer can be forced to fail to exercise rollback paths; a
/// failed call records nothing, matching the [`Treasury`] contract.
#[derive(Debug, Default)]
pub struct LedgerTreasury {
    credits: Vec<(AccountId, u64)>,
    fail_reason: Option<String>,
}

impl LedgerTreasury {
    /// Total value credited to `account` so far
    pub fn balance_of(&self, account: &AccountId) -> u64 {
        self.credits
            .iter()
            .filter(|(to, _)| to == account)
            .map(|(_, amount)| amount)
            .sum()
    }

    /// Every credit in order, for asserting on transfer sequences
    pub fn credits(&self) -> &[(AccountId, u64)] {
        &self.credits
    }

    /// Make the next transfer fail with `reason`
    pub fn fail_next_transfer(&mut self, reason: &str) {
        self.fail_reason = Some(reason.to_string());
    }
}

impl Treasury for LedgerTreasury {
    fn transfer(&mut self, to: &AccountId, amount: u64) -> Result<(), TransferError> {
        if let Some(reason) = self.fail_reason.take() {
            return Err(TransferError {
                recipient: to.to_string(),
                amount,
                reason,
            });
        }
        self.credits.push((to.clone(), amount));
        Ok(())
    }
}

/// Deterministic identity for tests
pub fn acct(label: &str) -> AccountId {
    AccountId::new(label)
}

/// Engine with owner "owner" and oracle "oracle"
pub fn create_test_engine() -> BettingEngine<LedgerTreasury> {
    BettingEngine::new(acct("owner"), acct("oracle"), LedgerTreasury::default())
}

/// Standard market parameters: a 10-minute betting window, a 10% party
/// reward to "party-pot", and platform-default bet bounds.
pub fn test_market_params() -> CreateMarketParams {
    CreateMarketParams {
        party_a: "Team A".to_string(),
        party_b: "Team B".to_string(),
        party_reward_recipient: acct("party-pot"),
        betting_duration_secs: constants::TEST_BETTING_DURATION,
        party_reward_percentage: 10,
        min_bet_amount: 0,
        max_bet_amount: 0,
    }
}

/// Create the standard test market at `now` and return its id
pub fn create_active_market(engine: &mut BettingEngine<LedgerTreasury>, now: u64) -> u64 {
    engine
        .create_market(&acct("creator"), test_market_params(), now)
        .unwrap()
}

/// Create a market whose one-hour betting window comfortably exceeds the
/// cancellation grace period, for exercising the cancel path.
pub fn create_cancellable_market(engine: &mut BettingEngine<LedgerTreasury>, now: u64) -> u64 {
    engine
        .create_market(
            &acct("creator"),
            CreateMarketParams {
                betting_duration_secs: constants::TEST_CANCELLABLE_DURATION,
                ..test_market_params()
            },
            now,
        )
        .unwrap()
}

/// Common test constants
pub mod constants {
    /// Standard start-of-test timestamp (Nov 14, 2023)
    pub const TEST_START: u64 = 1_700_000_000;

    /// Standard betting window (10 minutes)
    pub const TEST_BETTING_DURATION: u64 = 600;

    /// Betting window long enough to cancel inside (1 hour)
    pub const TEST_CANCELLABLE_DURATION: u64 = 3_600;
}
