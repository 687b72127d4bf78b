//! # Settlement Calculator
//!
//! Splits a resolved market's losing pool into the platform fee, the party
//! reward, and a bonus pool for winners, then serves pull-based claims
//! against the locked snapshot. Fee and party reward are pushed inside the
//! single distribution call; winner payouts are only computed there and
//! pulled later through [`BettingEngine::claim_reward`].
//!
//! All ratio arithmetic is integer-only with u128 intermediates. Claims
//! drain the snapshot record by record, so aggregate payouts equal the
//! bonus pool exactly: truncation dust flows to later claimants instead of
//! getting stranded.

use crate::{
    engine::{AccountId, BettingEngine, Treasury},
    error::Result,
    events::Event,
    ledger::BetState,
    market::{MarketStatus, Winner},
    BettingError,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Integer percentage of an amount, truncating
fn pct_of(amount: u64, percentage: u8) -> u64 {
    ((amount as u128 * percentage as u128) / 100) as u64
}

/// Locked settlement snapshot of a resolved market.
///
/// Written exactly once by [`BettingEngine::distribute_rewards`]; the
/// draining counters shrink as claims are served.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Platform fee taken from the losing pool
    pub fee: u64,

    /// Party reward taken from the losing pool
    pub party_reward: u64,

    /// Losing pool minus fee and party reward, owed to winners
    pub bonus_pool: u64,

    /// Bonus value not yet claimed
    pub(crate) bonus_remaining: u64,

    /// Winning stake not yet claimed
    pub(crate) win_pool_unclaimed: u64,

    /// Draw or one-sided market: every revealed record reclaims its own
    /// stake and no bonus exists
    pub(crate) stake_reclaim: bool,
}

impl Settlement {
    fn stake_reclaim() -> Self {
        Self {
            fee: 0,
            party_reward: 0,
            bonus_pool: 0,
            bonus_remaining: 0,
            win_pool_unclaimed: 0,
            stake_reclaim: true,
        }
    }
}

impl<T: Treasury> BettingEngine<T> {
    /// Settle a resolved market, once.
    ///
    /// Pushes the platform fee and the party reward immediately and locks
    /// the bonus pool for winner claims. A draw (or a market where nobody
    /// revealed on the winning side) charges nothing: every revealed record
    /// becomes reclaimable at face value. A second invocation fails, which
    /// is what guards against double fee and party-reward payment.
    pub fn distribute_rewards(&mut self, market_id: u64) -> Result<()> {
        let fee_percentage = self.platform.platform_fee_percentage;
        let fee_recipient = self.platform.fee_recipient.clone();
        let market = self
            .markets
            .get_mut(market_id as usize)
            .ok_or(BettingError::UnknownMarket(market_id))?;

        if market.status != MarketStatus::Resolved {
            return Err(BettingError::StateConflict(format!(
                "market is {:?}, not Resolved",
                market.status
            )));
        }
        if market.settlement.is_some() {
            return Err(BettingError::StateConflict(
                "rewards already distributed".to_string(),
            ));
        }
        let Some(winner) = market.winner else {
            return Err(BettingError::StateConflict(
                "resolved market has no winner".to_string(),
            ));
        };

        let party_recipient = market.party_reward_recipient.clone();
        let settlement = match winner.winning_side() {
            None => Settlement::stake_reclaim(),
            Some(side) => {
                let win_pool = market.pool_for(side);
                let lose_pool = market.pool_for(side.other());
                if win_pool == 0 {
                    Settlement::stake_reclaim()
                } else {
                    let fee = pct_of(lose_pool, fee_percentage);
                    let party_reward = pct_of(lose_pool, market.party_reward_percentage);
                    let bonus_pool = lose_pool - fee - party_reward;
                    Settlement {
                        fee,
                        party_reward,
                        bonus_pool,
                        bonus_remaining: bonus_pool,
                        win_pool_unclaimed: win_pool,
                        stake_reclaim: false,
                    }
                }
            }
        };

        market.settlement = Some(settlement);
        self.platform.total_fees_collected += settlement.fee;

        if settlement.fee > 0 {
            if let Err(err) = self.treasury.transfer(&fee_recipient, settlement.fee) {
                self.markets[market_id as usize].settlement = None;
                self.platform.total_fees_collected -= settlement.fee;
                return Err(err.into());
            }
        }
        if settlement.party_reward > 0 {
            if let Err(err) = self.treasury.transfer(&party_recipient, settlement.party_reward) {
                self.markets[market_id as usize].settlement = None;
                self.platform.total_fees_collected -= settlement.fee;
                return Err(err.into());
            }
        }

        self.events.push(Event::RewardsDistributed {
            market_id,
            fee: settlement.fee,
            party_reward: settlement.party_reward,
            bonus_pool: settlement.bonus_pool,
        });
        info!(
            "market {market_id}: distributed, fee {} party {} bonus {}",
            settlement.fee, settlement.party_reward, settlement.bonus_pool
        );
        Ok(())
    }

    /// Pull the caller's aggregate entitlement.
    ///
    /// On a resolved, distributed market: every unclaimed winning-side
    /// revealed record pays its stake plus a proportional slice of the
    /// bonus pool. On a draw, a one-sided market, or a cancelled market:
    /// every unclaimed revealed record pays back exactly its stake.
    /// Qualifying records are marked claimed strictly before the outbound
    /// push; if the push fails the marks are rolled back and the error
    /// surfaces.
    ///
    /// Returns the amount paid.
    pub fn claim_reward(&mut self, caller: &AccountId, market_id: u64) -> Result<u64> {
        let market = self
            .markets
            .get_mut(market_id as usize)
            .ok_or(BettingError::UnknownMarket(market_id))?;

        let stake_only = match market.status {
            MarketStatus::Cancelled => true,
            MarketStatus::Resolved => match market.settlement {
                Some(settlement) => settlement.stake_reclaim,
                None => {
                    return Err(BettingError::StateConflict(
                        "rewards not yet distributed".to_string(),
                    ));
                }
            },
            status => {
                return Err(BettingError::StateConflict(format!(
                    "market is {status:?}, not Resolved or Cancelled"
                )));
            }
        };
        let winning_side = if stake_only {
            None
        } else {
            // non-draw by construction when a bonus settlement exists
            market.winner.and_then(Winner::winning_side)
        };

        let indices = market.bets_by_bettor.get(caller).cloned().unwrap_or_default();
        let snapshot = market.settlement;
        let mut payout: u64 = 0;
        let mut claimed_indices = Vec::new();

        for &index in &indices {
            let record = &market.bets[index];
            if record.state != BetState::Revealed || record.claimed {
                continue;
            }
            if let Some(side) = winning_side {
                if record.revealed_choice != Some(side) {
                    continue;
                }
            }

            let stake = record.amount;
            let mut amount = stake;
            if !stake_only {
                // drain the snapshot so truncation dust reaches the final
                // claimant instead of getting stranded
                if let Some(settlement) = market.settlement.as_mut() {
                    let share = (stake as u128 * settlement.bonus_remaining as u128
                        / settlement.win_pool_unclaimed as u128) as u64;
                    settlement.bonus_remaining -= share;
                    settlement.win_pool_unclaimed -= stake;
                    amount += share;
                }
            }
            market.bets[index].claimed = true;
            payout += amount;
            claimed_indices.push(index);
        }

        if claimed_indices.is_empty() {
            return Err(BettingError::StateConflict(
                "no unclaimed rewards for caller".to_string(),
            ));
        }

        if let Err(err) = self.treasury.transfer(caller, payout) {
            let market = &mut self.markets[market_id as usize];
            for &index in &claimed_indices {
                market.bets[index].claimed = false;
            }
            market.settlement = snapshot;
            return Err(err.into());
        }

        self.events.push(Event::RewardClaimed {
            market_id,
            bettor: caller.clone(),
            amount: payout,
        });
        debug!("market {market_id}: {caller} claimed {payout}");
        Ok(payout)
    }
}
