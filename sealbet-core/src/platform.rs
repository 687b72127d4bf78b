//! # Platform Controller
//!
//! Process-wide admin state: owner, oracle, fee settings, default bet
//! bounds, the pause switch, and running totals. Pausing blocks market
//! creation and new commitments only — reveals, refunds, claims, and
//! cancellations always pass, so escrowed funds stay recoverable.
//!
//! Statistics are served from counters maintained incrementally by the
//! ledger and the settlement calculator, never by rescanning history.

use crate::{
    engine::{AccountId, BettingEngine, Treasury},
    error::Result,
    events::Event,
    BettingError, DEFAULT_MAX_BET, DEFAULT_MIN_BET, DEFAULT_PLATFORM_FEE_PCT,
    MAX_PLATFORM_FEE_PCT,
};
use log::info;
use serde::{Deserialize, Serialize};

/// Global admin state, created once at engine initialization
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlatformState {
    /// Full admin rights
    pub owner: AccountId,

    /// Resolution rights only
    pub oracle: AccountId,

    /// Receives the platform fee cut of each losing pool
    pub fee_recipient: AccountId,

    /// Fee taken from losing pools, 0..=10
    pub platform_fee_percentage: u8,

    /// Minimum stake for markets that set no bound of their own
    pub default_min_bet: u64,

    /// Maximum stake for markets that set no bound of their own (0 = none)
    pub default_max_bet: u64,

    /// Blocks market creation and new commitments
    pub paused: bool,

    /// Markets ever created
    pub total_markets: u64,

    /// Bets ever committed
    pub total_bets: u64,

    /// Revealed volume across all markets
    pub total_volume: u64,

    /// Platform fees collected across all settlements
    pub total_fees_collected: u64,
}

impl PlatformState {
    pub(crate) fn new(owner: AccountId, oracle: AccountId) -> Self {
        Self {
            fee_recipient: owner.clone(),
            owner,
            oracle,
            platform_fee_percentage: DEFAULT_PLATFORM_FEE_PCT,
            default_min_bet: DEFAULT_MIN_BET,
            default_max_bet: DEFAULT_MAX_BET,
            paused: false,
            total_markets: 0,
            total_bets: 0,
            total_volume: 0,
            total_fees_collected: 0,
        }
    }
}

/// Read-only platform-wide totals
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub total_markets: u64,
    pub total_bets: u64,
    pub total_volume: u64,
    pub total_fees_collected: u64,
}

/// Read-only per-market statistics over revealed bets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketStats {
    /// Revealed bet count
    pub total_bets: u64,
    /// Revealed volume
    pub total_volume: u64,
    /// Distinct bettors revealed on side A
    pub bettors_a: u64,
    /// Distinct bettors revealed on side B
    pub bettors_b: u64,
    /// Side A pool divided by its distinct bettors (0 when empty)
    pub average_bet_a: u64,
    /// Side B pool divided by its distinct bettors (0 when empty)
    pub average_bet_b: u64,
}

impl<T: Treasury> BettingEngine<T> {
    /// Set the platform fee percentage. Owner only, capped at
    /// [`MAX_PLATFORM_FEE_PCT`].
    pub fn set_platform_fee(&mut self, caller: &AccountId, percentage: u8) -> Result<()> {
        self.ensure_owner(caller)?;
        if percentage > MAX_PLATFORM_FEE_PCT {
            return Err(BettingError::Validation(format!(
                "fee exceeds maximum {MAX_PLATFORM_FEE_PCT}"
            )));
        }
        self.platform.platform_fee_percentage = percentage;
        self.events.push(Event::PlatformFeeUpdated { percentage });
        info!("platform fee set to {percentage}%");
        Ok(())
    }

    /// Redirect future platform fees. Owner only.
    pub fn set_fee_recipient(&mut self, caller: &AccountId, recipient: AccountId) -> Result<()> {
        self.ensure_owner(caller)?;
        self.platform.fee_recipient = recipient.clone();
        self.events.push(Event::FeeRecipientUpdated { recipient });
        Ok(())
    }

    /// Set the default bet bounds used by markets that declare none.
    /// Owner only; `max` of 0 means unbounded.
    pub fn set_default_bet_limits(&mut self, caller: &AccountId, min: u64, max: u64) -> Result<()> {
        self.ensure_owner(caller)?;
        if max != 0 && min > max {
            return Err(BettingError::Validation(
                "minimum bet exceeds maximum bet".to_string(),
            ));
        }
        self.platform.default_min_bet = min;
        self.platform.default_max_bet = max;
        self.events.push(Event::DefaultBetLimitsUpdated { min, max });
        Ok(())
    }

    /// Reassign resolution rights. Owner only.
    pub fn set_oracle(&mut self, caller: &AccountId, oracle: AccountId) -> Result<()> {
        self.ensure_owner(caller)?;
        self.platform.oracle = oracle.clone();
        self.events.push(Event::OracleUpdated { oracle });
        Ok(())
    }

    /// Hand ownership over. Owner only.
    pub fn transfer_ownership(&mut self, caller: &AccountId, new_owner: AccountId) -> Result<()> {
        self.ensure_owner(caller)?;
        self.platform.owner = new_owner.clone();
        self.events.push(Event::OwnershipTransferred { new_owner });
        Ok(())
    }

    /// Block market creation and new commitments. Owner only.
    pub fn pause(&mut self, caller: &AccountId) -> Result<()> {
        self.ensure_owner(caller)?;
        if self.platform.paused {
            return Err(BettingError::StateConflict("already paused".to_string()));
        }
        self.platform.paused = true;
        self.events.push(Event::EnginePaused);
        info!("engine paused");
        Ok(())
    }

    /// Reopen market creation and commitments. Owner only.
    pub fn unpause(&mut self, caller: &AccountId) -> Result<()> {
        self.ensure_owner(caller)?;
        if !self.platform.paused {
            return Err(BettingError::StateConflict("not paused".to_string()));
        }
        self.platform.paused = false;
        self.events.push(Event::EngineUnpaused);
        info!("engine unpaused");
        Ok(())
    }

    /// Platform-wide running totals
    pub fn platform_stats(&self) -> PlatformStats {
        PlatformStats {
            total_markets: self.platform.total_markets,
            total_bets: self.platform.total_bets,
            total_volume: self.platform.total_volume,
            total_fees_collected: self.platform.total_fees_collected,
        }
    }

    /// Per-market statistics over revealed bets
    pub fn market_stats(&self, market_id: u64) -> Result<MarketStats> {
        let market = self.market(market_id)?;
        let average = |pool: u64, bettors: u64| if bettors == 0 { 0 } else { pool / bettors };
        Ok(MarketStats {
            total_bets: market.revealed_bets,
            total_volume: market.revealed_volume,
            bettors_a: market.bettors_a,
            bettors_b: market.bettors_b,
            average_bet_a: average(market.total_pool_a, market.bettors_a),
            average_bet_b: average(market.total_pool_b, market.bettors_b),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{commitment::commitment_hash, market::Side, test_utils::*};

    #[test]
    fn test_set_platform_fee_validates_and_emits() {
        let mut engine = create_test_engine();
        engine.set_platform_fee(&acct("owner"), 5).unwrap();
        assert_eq!(engine.platform().platform_fee_percentage, 5);
        assert!(engine
            .events()
            .contains(&Event::PlatformFeeUpdated { percentage: 5 }));

        let err = engine.set_platform_fee(&acct("owner"), 11).unwrap_err();
        assert!(matches!(err, BettingError::Validation(_)));
        assert_eq!(engine.platform().platform_fee_percentage, 5);
    }

    #[test]
    fn test_admin_operations_are_owner_only() {
        let mut engine = create_test_engine();
        let mallory = acct("mallory");
        assert!(matches!(
            engine.set_platform_fee(&mallory, 1).unwrap_err(),
            BettingError::Unauthorized(_)
        ));
        assert!(matches!(
            engine.set_fee_recipient(&mallory, mallory.clone()).unwrap_err(),
            BettingError::Unauthorized(_)
        ));
        assert!(matches!(
            engine.set_default_bet_limits(&mallory, 1, 2).unwrap_err(),
            BettingError::Unauthorized(_)
        ));
        assert!(matches!(
            engine.set_oracle(&mallory, mallory.clone()).unwrap_err(),
            BettingError::Unauthorized(_)
        ));
        assert!(matches!(
            engine.pause(&mallory).unwrap_err(),
            BettingError::Unauthorized(_)
        ));
    }

    #[test]
    fn test_ownership_transfer_moves_admin_rights() {
        let mut engine = create_test_engine();
        let heir = acct("heir");
        engine.transfer_ownership(&acct("owner"), heir.clone()).unwrap();

        assert!(matches!(
            engine.set_platform_fee(&acct("owner"), 3).unwrap_err(),
            BettingError::Unauthorized(_)
        ));
        engine.set_platform_fee(&heir, 3).unwrap();
    }

    #[test]
    fn test_pause_blocks_creation_and_commits_only() {
        let mut engine = create_test_engine();
        let id = create_active_market(&mut engine, constants::TEST_START);
        let bettor = acct("bettor");
        let hash = commitment_hash(id, &bettor, Side::A, 1, 100);
        engine
            .commit_bet(&bettor, id, hash, 100, constants::TEST_START + 1)
            .unwrap();
        let unrevealed = acct("unrevealed");
        let hash2 = commitment_hash(id, &unrevealed, Side::B, 2, 100);
        let unrevealed_index = engine
            .commit_bet(&unrevealed, id, hash2, 100, constants::TEST_START + 1)
            .unwrap();

        engine.pause(&acct("owner")).unwrap();

        // blocked while paused
        assert_eq!(
            engine
                .create_market(&acct("creator"), test_market_params(), constants::TEST_START)
                .unwrap_err(),
            BettingError::Paused
        );
        let hash3 = commitment_hash(id, &bettor, Side::A, 3, 100);
        assert_eq!(
            engine
                .commit_bet(&bettor, id, hash3, 100, constants::TEST_START + 2)
                .unwrap_err(),
            BettingError::Paused
        );

        // never blocked: reveals, refunds, claims, cancellations
        let betting_end = engine.market(id).unwrap().betting_end_time;
        engine.reveal_bet(&bettor, id, Side::A, 1, betting_end).unwrap();
        let reveal_end = engine.market(id).unwrap().reveal_end_time;
        engine
            .refund_unrevealed_bet(&unrevealed, id, unrevealed_index, reveal_end)
            .unwrap();

        engine.unpause(&acct("owner")).unwrap();
        engine
            .create_market(&acct("creator"), test_market_params(), constants::TEST_START)
            .unwrap();
    }

    #[test]
    fn test_pause_toggle_conflicts() {
        let mut engine = create_test_engine();
        let owner = acct("owner");
        assert!(matches!(
            engine.unpause(&owner).unwrap_err(),
            BettingError::StateConflict(_)
        ));
        engine.pause(&owner).unwrap();
        assert!(matches!(
            engine.pause(&owner).unwrap_err(),
            BettingError::StateConflict(_)
        ));
    }

    #[test]
    fn test_default_limits_apply_to_unbounded_markets() {
        let mut engine = create_test_engine();
        engine.set_default_bet_limits(&acct("owner"), 50, 500).unwrap();
        let id = create_active_market(&mut engine, constants::TEST_START);
        let bettor = acct("bettor");
        let now = constants::TEST_START + 1;

        let hash = commitment_hash(id, &bettor, Side::A, 1, 49);
        assert_eq!(
            engine.commit_bet(&bettor, id, hash, 49, now).unwrap_err(),
            BettingError::Validation("bet below minimum".to_string())
        );
        let hash = commitment_hash(id, &bettor, Side::A, 2, 501);
        assert_eq!(
            engine.commit_bet(&bettor, id, hash, 501, now).unwrap_err(),
            BettingError::Validation("bet above maximum".to_string())
        );
        let hash = commitment_hash(id, &bettor, Side::A, 3, 500);
        engine.commit_bet(&bettor, id, hash, 500, now).unwrap();
    }

    #[test]
    fn test_market_stats_from_incremental_counters() {
        // three revealed bets: 200 + 100 on A from two bettors, 150 on B
        // from one bettor
        let mut engine = create_test_engine();
        let id = create_active_market(&mut engine, constants::TEST_START);
        let now = constants::TEST_START + 1;
        let bets = [
            (acct("b1"), Side::A, 100u64, 200u64),
            (acct("b2"), Side::A, 200, 100),
            (acct("b3"), Side::B, 300, 150),
        ];
        for (bettor, side, nonce, amount) in &bets {
            let hash = commitment_hash(id, bettor, *side, *nonce, *amount);
            engine.commit_bet(bettor, id, hash, *amount, now).unwrap();
        }
        let betting_end = engine.market(id).unwrap().betting_end_time;
        for (bettor, side, nonce, _) in &bets {
            engine.reveal_bet(bettor, id, *side, *nonce, betting_end).unwrap();
        }

        let stats = engine.market_stats(id).unwrap();
        assert_eq!(stats.total_bets, 3);
        assert_eq!(stats.total_volume, 450);
        assert_eq!(stats.bettors_a, 2);
        assert_eq!(stats.bettors_b, 1);
        assert_eq!(stats.average_bet_a, 150);
        assert_eq!(stats.average_bet_b, 150);
    }

    #[test]
    fn test_platform_stats_running_totals() {
        let mut engine = create_test_engine();
        let id = create_active_market(&mut engine, constants::TEST_START);
        let bettor = acct("bettor");
        let hash = commitment_hash(id, &bettor, Side::A, 1, 100);
        engine
            .commit_bet(&bettor, id, hash, 100, constants::TEST_START + 1)
            .unwrap();

        let stats = engine.platform_stats();
        assert_eq!(stats.total_markets, 1);
        assert_eq!(stats.total_bets, 1);
        // volume counts revealed bets only
        assert_eq!(stats.total_volume, 0);

        let betting_end = engine.market(id).unwrap().betting_end_time;
        engine.reveal_bet(&bettor, id, Side::A, 1, betting_end).unwrap();
        assert_eq!(engine.platform_stats().total_volume, 100);
    }
}
