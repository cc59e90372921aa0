use anchor_lang::prelude::*;

use super::{BidPosition, OracleKey, Phase, Side};
use crate::constants::{HALF_UNIT, SEED_MARKET, UNIT};
use crate::errors::BinaryOptionError;
use crate::events::PricesUpdated;
use crate::utils::fixed_math::{add, divide_decimal, divide_round, multiply_round, sub};

/// ─── Market Account ───────────────────────────────────────────────
///
/// Custody address: PDA seeds = [b"market", creator.key, market_id.to_le_bytes()]
///
/// Stores all state for a single binary option market. Held in the
/// manager's arena rather than loaded as its own account.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct Market {
    /// Index in the manager's arena.
    pub market_id: u64,

    /// Ledger account holding this market's deposits.
    pub address: Pubkey,

    /// Account that opened the market and receives the creator fee.
    pub creator: Pubkey,

    /// Price feed the market settles against.
    pub oracle_key: OracleKey,

    /// Long wins if the final price is at or above this.
    pub strike_price: u128,

    pub refunds_enabled: bool,

    pub times: Times,

    /// Snapshotted from the manager at creation.
    pub fees: Fees,

    /// Floor on the creator's own stake while bidding.
    pub creator_limits: CreatorLimits,

    // ─── Pool accounting ───
    pub long: BidPosition,

    pub short: BidPosition,

    /// Cached side prices, recomputed on every bid and refund.
    pub prices: Prices,

    /// Value held for this market: bids, minus refunds paid, minus fees
    /// remitted and payouts made.
    pub deposited: u128,

    /// Refund fees kept in the pool; part of `deposited`.
    pub retained_refund_fees: u128,

    pub resolution: Resolution,

    /// Set once the manager has swept the market after expiry.
    pub destroyed: bool,
}

impl Market {
    pub fn address_for(creator: &Pubkey, market_id: u64) -> Pubkey {
        Pubkey::find_program_address(
            &[SEED_MARKET, creator.as_ref(), &market_id.to_le_bytes()],
            &crate::ID,
        )
        .0
    }

    pub fn phase(&self, now: i64) -> Phase {
        if now >= self.times.expiry {
            Phase::Expired
        } else if self.resolution.resolved {
            Phase::Resolved
        } else if now >= self.times.maturity {
            Phase::Resolving
        } else if now >= self.times.bidding_end {
            Phase::Trading
        } else {
            Phase::Bidding
        }
    }

    /// Winning side for the recorded (or, before resolution, zero) final price.
    pub fn result(&self) -> Side {
        self.winning_side(self.resolution.final_price)
    }

    pub fn winning_side(&self, final_price: u128) -> Side {
        if final_price >= self.strike_price {
            Side::Long
        } else {
            Side::Short
        }
    }

    pub fn position(&self, side: Side) -> &BidPosition {
        match side {
            Side::Long => &self.long,
            Side::Short => &self.short,
        }
    }

    pub(crate) fn position_mut(&mut self, side: Side) -> &mut BidPosition {
        match side {
            Side::Long => &mut self.long,
            Side::Short => &mut self.short,
        }
    }

    /// `(long, short)` totals of outstanding bids.
    pub fn total_bids(&self) -> (u128, u128) {
        (self.long.total_bids, self.short.total_bids)
    }

    pub fn bids_of(&self, account: &Pubkey) -> (u128, u128) {
        (self.long.bid_of(account), self.short.bid_of(account))
    }

    pub fn balances_of(&self, account: &Pubkey) -> (u128, u128) {
        (self.long.balance_of(account), self.short.balance_of(account))
    }

    pub fn total_supplies(&self) -> (u128, u128) {
        (self.long.total_supply, self.short.total_supply)
    }

    /// Deposits backing the options. Before resolution the pool and creator
    /// fees are still inside `deposited`, so they are netted out here.
    pub fn exercisable_deposits(&self) -> Result<u128> {
        if self.resolution.resolved {
            Ok(self.deposited)
        } else {
            multiply_round(self.deposited, self.fees.fee_multiplier()?)
        }
    }

    /// Sides whose bids `claim` may still convert.
    pub fn claims_side(&self, side: Side) -> bool {
        !self.resolution.resolved || self.result() == side
    }

    /// Options the account would receive on `side`, or `None` if there is no
    /// unclaimed bid there.
    pub(crate) fn pending_claim(&self, side: Side, account: &Pubkey) -> Result<Option<u128>> {
        let position = self.position(side);
        if !self.claims_side(side) || position.has_claimed(account) || position.bid_of(account) == 0 {
            return Ok(None);
        }

        let options = position.claimable(account, self.prices.get(side), self.exercisable_deposits()?)?;
        Ok(Some(options))
    }

    pub fn claimable_by(&self, account: &Pubkey) -> Result<(u128, u128)> {
        Ok((
            self.pending_claim(Side::Long, account)?.unwrap_or(0),
            self.pending_claim(Side::Short, account)?.unwrap_or(0),
        ))
    }

    /// Options still to be minted per side once every bid is claimed.
    pub fn total_claimable(&self) -> Result<(u128, u128)> {
        let exercisable = self.exercisable_deposits()?;
        let remaining = |side: Side| {
            let position = self.position(side);
            if !self.claims_side(side) || position.total_bids == 0 {
                0
            } else {
                exercisable.saturating_sub(position.total_supply)
            }
        };
        Ok((remaining(Side::Long), remaining(Side::Short)))
    }

    pub(crate) fn require_live(&self) -> Result<()> {
        require!(!self.destroyed, BinaryOptionError::MarketDestroyed);
        Ok(())
    }

    /// Recomputes and caches prices from the given totals.
    pub fn update_prices(&mut self, long_total: u128, short_total: u128, total_debt: u128) -> Result<()> {
        let prices = Prices::compute(long_total, short_total, total_debt, &self.fees)?;
        self.set_prices(prices);
        Ok(())
    }

    pub(crate) fn set_prices(&mut self, prices: Prices) {
        self.prices = prices;
        emit!(PricesUpdated {
            market: self.address,
            market_id: self.market_id,
            long_price: prices.long,
            short_price: prices.short,
        });
    }
}

/// ─── Times ────────────────────────────────────────────────────────
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Times {
    /// Bids and refunds are accepted strictly before this.
    pub bidding_end: i64,

    /// Resolution is allowed from this instant.
    pub maturity: i64,

    /// The manager may destroy the market from this instant.
    pub expiry: i64,
}

impl Times {
    pub fn validate(&self) -> Result<()> {
        require!(
            self.bidding_end < self.maturity && self.maturity < self.expiry,
            BinaryOptionError::InvalidDates
        );
        Ok(())
    }
}

/// ─── Fees ─────────────────────────────────────────────────────────
///
/// Fixed-point fractions of deposits.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fees {
    /// Remitted to the manager's fee recipient at resolution.
    pub pool_fee: u128,

    /// Remitted to the creator at resolution.
    pub creator_fee: u128,

    /// Kept by the pool out of every refund.
    pub refund_fee: u128,
}

impl Fees {
    pub fn validate(&self) -> Result<()> {
        require!(
            add(self.pool_fee, self.creator_fee)? < UNIT,
            BinaryOptionError::FeeTooHigh
        );
        require!(self.refund_fee < UNIT, BinaryOptionError::FeeTooHigh);
        Ok(())
    }

    /// 1 − pool fee − creator fee.
    pub fn fee_multiplier(&self) -> Result<u128> {
        sub(UNIT, add(self.pool_fee, self.creator_fee)?)
    }
}

/// ─── Creator Limits ───────────────────────────────────────────────
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CreatorLimits {
    /// Minimum combined long + short stake of the creator.
    pub capital_requirement: u128,

    /// Minimum fraction of the creator's stake on each side.
    pub skew_limit: u128,
}

impl CreatorLimits {
    pub fn check(&self, long_bid: u128, short_bid: u128) -> Result<()> {
        let total_bid = add(long_bid, short_bid)?;
        require!(
            total_bid > 0 && self.capital_requirement <= total_bid,
            BinaryOptionError::InsufficientCapital
        );

        require!(
            self.skew_limit <= divide_decimal(long_bid, total_bid)?
                && self.skew_limit <= divide_decimal(short_bid, total_bid)?,
            BinaryOptionError::BidsTooSkewed
        );
        Ok(())
    }
}

/// ─── Prices ───────────────────────────────────────────────────────
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prices {
    pub long: u128,
    pub short: u128,
}

impl Default for Prices {
    /// Neutral split used while there is no debt to price against.
    fn default() -> Self {
        Self {
            long: HALF_UNIT,
            short: HALF_UNIT,
        }
    }
}

impl Prices {
    /// price_side = side_total / (total_debt × (1 − pool fee − creator fee))
    ///
    /// Zero debt yields the neutral 0.5 / 0.5 split. Otherwise both prices
    /// must lie strictly inside (0, 1).
    pub fn compute(long_total: u128, short_total: u128, total_debt: u128, fees: &Fees) -> Result<Self> {
        if total_debt == 0 {
            return Ok(Self::default());
        }

        let total_options = multiply_round(total_debt, fees.fee_multiplier()?)?;
        let long = divide_round(long_total, total_options)?;
        let short = divide_round(short_total, total_options)?;

        require!(
            0 < long && long < UNIT && 0 < short && short < UNIT,
            BinaryOptionError::PriceOutOfRange
        );
        Ok(Self { long, short })
    }

    pub fn get(&self, side: Side) -> u128 {
        match side {
            Side::Long => self.long,
            Side::Short => self.short,
        }
    }
}

/// ─── Resolution ───────────────────────────────────────────────────
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub final_price: u128,

    /// Oracle timestamp of `final_price`.
    pub updated_at: i64,

    pub resolved: bool,
}
