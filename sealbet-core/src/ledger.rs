//! # Commit-Reveal Ledger
//!
//! Append-only bet records per market. A bet is committed as an opaque
//! SHA-256 digest plus an escrowed deposit; the choice behind it stays
//! hidden until the bettor opens the commitment during the reveal window.
//! Records move one way through
//! `Committed → {Revealed, Cancelled, Refunded}` and are never deleted.

use crate::{
    commitment::{commitment_hash, CommitHash},
    engine::{AccountId, BettingEngine, Treasury},
    error::Result,
    events::Event,
    market::{MarketStatus, Side},
    BettingError, MAX_BETS_PER_PAGE,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a single bet record.
///
/// At most one of the three terminal states is ever reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetState {
    /// Deposit escrowed, choice hidden behind the commitment
    Committed,
    /// Commitment opened; the stake counts toward its side's pool
    Revealed,
    /// Withdrawn before the cancellation deadline, deposit returned
    Cancelled,
    /// Never revealed; deposit returned after the reveal window
    Refunded,
}

/// One bet in a market's append-only arena
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BetRecord {
    /// Who placed the bet
    pub bettor: AccountId,

    /// Commitment over (market id, bettor, choice, nonce, amount)
    pub commit_hash: CommitHash,

    /// Deposit escrowed at commit time, immutable thereafter
    pub amount: u64,

    /// Disclosed choice, unset until revealed
    pub revealed_choice: Option<Side>,

    /// One-way lifecycle state
    pub state: BetState,

    /// Whether the claim path already paid this record out
    pub claimed: bool,
}

/// One page of a bettor's records, plus their invariant total count
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBetsPage {
    /// Stake of each record in the page
    pub amounts: Vec<u64>,
    /// State of each record in the page
    pub states: Vec<BetState>,
    /// Disclosed choice of each record, where revealed
    pub choices: Vec<Option<Side>>,
    /// The bettor's total record count in this market
    pub total_bets: u64,
}

impl<T: Treasury> BettingEngine<T> {
    /// Commit a hidden bet with an escrowed deposit.
    ///
    /// The deposit is the value attached to the call, already verified by
    /// the calling environment. Valid only while the market is `Active`,
    /// before `betting_end_time`, with the engine unpaused and the deposit
    /// inside the effective bounds. Returns the record's stable index.
    pub fn commit_bet(
        &mut self,
        caller: &AccountId,
        market_id: u64,
        commit_hash: CommitHash,
        deposit: u64,
        now: u64,
    ) -> Result<usize> {
        self.ensure_not_paused()?;
        let default_min = self.platform.default_min_bet;
        let default_max = self.platform.default_max_bet;
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
        if now >= market.betting_end_time {
            return Err(BettingError::OutsideWindow(
                "betting period has ended".to_string(),
            ));
        }
        if deposit == 0 {
            return Err(BettingError::Validation(
                "deposit must be non-zero".to_string(),
            ));
        }
        let min = if market.min_bet_amount == 0 {
            default_min
        } else {
            market.min_bet_amount
        };
        let max = if market.max_bet_amount == 0 {
            default_max
        } else {
            market.max_bet_amount
        };
        if deposit < min {
            return Err(BettingError::Validation("bet below minimum".to_string()));
        }
        if max != 0 && deposit > max {
            return Err(BettingError::Validation("bet above maximum".to_string()));
        }

        let index = market.bets.len();
        market.bets.push(BetRecord {
            bettor: caller.clone(),
            commit_hash,
            amount: deposit,
            revealed_choice: None,
            state: BetState::Committed,
            claimed: false,
        });
        market
            .bets_by_bettor
            .entry(caller.clone())
            .or_default()
            .push(index);
        self.platform.total_bets += 1;
        self.events.push(Event::BetCommitted {
            market_id,
            bettor: caller.clone(),
            commit_hash,
            amount: deposit,
        });

        debug!("market {market_id}: bet {index} committed for {deposit}");
        Ok(index)
    }

    /// Open a commitment during the reveal window.
    ///
    /// Scans the caller's committed records for one whose stored hash
    /// matches the commitment recomputed from `(market_id, caller, choice,
    /// nonce, record amount)`. A miss fails with
    /// [`BettingError::InvalidReveal`] and changes nothing. Returns the
    /// revealed record's index.
    pub fn reveal_bet(
        &mut self,
        caller: &AccountId,
        market_id: u64,
        choice: Side,
        nonce: u64,
        now: u64,
    ) -> Result<usize> {
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
        if now < market.betting_end_time {
            return Err(BettingError::OutsideWindow(
                "betting period is still open".to_string(),
            ));
        }
        if now >= market.reveal_end_time {
            return Err(BettingError::OutsideWindow(
                "reveal period has ended".to_string(),
            ));
        }

        let indices = market.bets_by_bettor.get(caller).cloned().unwrap_or_default();
        let matched = indices.into_iter().find(|&i| {
            let record = &market.bets[i];
            record.state == BetState::Committed
                && record.commit_hash
                    == commitment_hash(market_id, caller, choice, nonce, record.amount)
        });
        let Some(index) = matched else {
            warn!("market {market_id}: failed reveal attempt by {caller}");
            return Err(BettingError::InvalidReveal);
        };

        let amount = market.bets[index].amount;
        market.bets[index].state = BetState::Revealed;
        market.bets[index].revealed_choice = Some(choice);
        market.record_reveal(caller, choice, amount);
        self.platform.total_volume += amount;
        self.events.push(Event::BetRevealed {
            market_id,
            bettor: caller.clone(),
            choice,
            amount,
        });

        debug!("market {market_id}: bet {index} revealed on side {choice}");
        Ok(index)
    }

    /// Withdraw a still-hidden bet before the cancellation deadline.
    ///
    /// The deadline sits one grace window before `betting_end_time`, so a
    /// bet cannot be pulled once its secrecy is about to stop mattering.
    /// Returns the full deposit to the caller.
    pub fn cancel_bet(
        &mut self,
        caller: &AccountId,
        market_id: u64,
        bet_index: usize,
        now: u64,
    ) -> Result<()> {
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
        if now >= market.cancel_deadline() {
            return Err(BettingError::OutsideWindow(
                "cancellation deadline passed".to_string(),
            ));
        }
        let record = market
            .bets
            .get_mut(bet_index)
            .ok_or(BettingError::UnknownBet { market_id, index: bet_index })?;
        if record.bettor != *caller {
            return Err(BettingError::Unauthorized(
                "caller does not own this bet".to_string(),
            ));
        }
        if record.state != BetState::Committed {
            return Err(BettingError::StateConflict(format!(
                "bet is {:?}, not Committed",
                record.state
            )));
        }

        let amount = record.amount;
        record.state = BetState::Cancelled;
        if let Err(err) = self.treasury.transfer(caller, amount) {
            self.markets[market_id as usize].bets[bet_index].state = BetState::Committed;
            return Err(err.into());
        }
        self.events.push(Event::BetCancelled {
            market_id,
            bettor: caller.clone(),
            amount,
        });

        debug!("market {market_id}: bet {bet_index} cancelled, {amount} returned");
        Ok(())
    }

    /// Return the deposit of a bet that was never revealed.
    ///
    /// Valid once the reveal window has closed, or at any time on a
    /// cancelled market. No penalty: a bettor's capital is never at risk
    /// for failing to reveal, only their chance to win.
    pub fn refund_unrevealed_bet(
        &mut self,
        caller: &AccountId,
        market_id: u64,
        bet_index: usize,
        now: u64,
    ) -> Result<()> {
        let market = self
            .markets
            .get_mut(market_id as usize)
            .ok_or(BettingError::UnknownMarket(market_id))?;

        if market.status != MarketStatus::Cancelled && now < market.reveal_end_time {
            return Err(BettingError::OutsideWindow(
                "reveal period is still open".to_string(),
            ));
        }
        let record = market
            .bets
            .get_mut(bet_index)
            .ok_or(BettingError::UnknownBet { market_id, index: bet_index })?;
        if record.bettor != *caller {
            return Err(BettingError::Unauthorized(
                "caller does not own this bet".to_string(),
            ));
        }
        if record.state != BetState::Committed {
            return Err(BettingError::StateConflict(format!(
                "bet is {:?}, not Committed",
                record.state
            )));
        }

        let amount = record.amount;
        record.state = BetState::Refunded;
        if let Err(err) = self.treasury.transfer(caller, amount) {
            self.markets[market_id as usize].bets[bet_index].state = BetState::Committed;
            return Err(err.into());
        }
        self.events.push(Event::BetRefunded {
            market_id,
            bettor: caller.clone(),
            amount,
        });

        debug!("market {market_id}: bet {bet_index} refunded, {amount} returned");
        Ok(())
    }

    /// Bounded page of one bettor's records.
    ///
    /// `limit` is capped at [`MAX_BETS_PER_PAGE`], so reading an unbounded
    /// history stays cheap no matter how many bets one identity placed.
    pub fn user_bets_paginated(
        &self,
        market_id: u64,
        bettor: &AccountId,
        offset: usize,
        limit: usize,
    ) -> Result<UserBetsPage> {
        let market = self.market(market_id)?;
        let indices: &[usize] = market
            .bets_by_bettor
            .get(bettor)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let total_bets = indices.len() as u64;
        let start = offset.min(indices.len());
        let end = start + limit.min(MAX_BETS_PER_PAGE).min(indices.len() - start);

        let mut page = UserBetsPage {
            amounts: Vec::with_capacity(end - start),
            states: Vec::with_capacity(end - start),
            choices: Vec::with_capacity(end - start),
            total_bets,
        };
        for &i in &indices[start..end] {
            let record = &market.bets[i];
            page.amounts.push(record.amount);
            page.states.push(record.state);
            page.choices.push(record.revealed_choice);
        }
        Ok(page)
    }
}
