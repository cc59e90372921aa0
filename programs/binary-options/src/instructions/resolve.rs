use anchor_lang::prelude::*;

use crate::errors::BinaryOptionError;
use crate::events::MarketResolved;
use crate::state::*;
use crate::utils::fixed_math::{add, multiply_round, sub};
use crate::utils::ledger::Ledger;
use crate::utils::price_feed::{PriceData, PriceFeed};

/// What a successful `resolve` would record and remit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolutionPlan {
    pub price: PriceData,
    pub pool_fees: u128,
    pub creator_fees: u128,
    /// `deposited` once both fees are remitted.
    pub deposited: u128,
}

impl Market {
    /// Every check `resolve` performs, without mutating anything.
    pub fn plan_resolution(
        &self,
        feed: &impl PriceFeed,
        ledger: &impl Ledger,
        max_price_age: i64,
        now: i64,
    ) -> Result<ResolutionPlan> {
        self.require_live()?;
        require!(
            !self.resolution.resolved,
            BinaryOptionError::AlreadyResolved
        );
        require!(
            now >= self.times.maturity,
            BinaryOptionError::MarketNotYetMatured
        );

        let price = feed.latest_price(&self.oracle_key)?;
        let oldest_fresh = self
            .times
            .maturity
            .checked_sub(max_price_age)
            .ok_or(BinaryOptionError::ArithmeticUnderflow)?;
        require!(
            price.updated_at >= oldest_fresh,
            BinaryOptionError::StalePrice
        );

        // pool_fee + creator_fee < 1, so custody always covers both
        let pool_fees = multiply_round(self.deposited, self.fees.pool_fee)?;
        let creator_fees = multiply_round(self.deposited, self.fees.creator_fee)?;
        let remitted = add(pool_fees, creator_fees)?;
        let deposited = sub(self.deposited, remitted)?;
        require!(
            ledger.balance_of(&self.address) >= remitted,
            BinaryOptionError::InsufficientBalance
        );

        Ok(ResolutionPlan {
            price,
            pool_fees,
            creator_fees,
            deposited,
        })
    }

    /// Records the oracle price as final, freezing the winning side, and
    /// remits the pool and creator fees. Returns the total remitted.
    pub fn resolve(
        &mut self,
        feed: &impl PriceFeed,
        ledger: &mut impl Ledger,
        fee_recipient: &Pubkey,
        max_price_age: i64,
        now: i64,
    ) -> Result<u128> {
        let plan = self.plan_resolution(feed, &*ledger, max_price_age, now)?;

        if plan.pool_fees > 0 {
            ledger.transfer(&self.address, fee_recipient, plan.pool_fees)?;
        }
        if plan.creator_fees > 0 {
            ledger.transfer(&self.address, &self.creator, plan.creator_fees)?;
        }

        self.deposited = plan.deposited;
        self.resolution = Resolution {
            final_price: plan.price.price,
            updated_at: plan.price.updated_at,
            resolved: true,
        };

        let result = self.result();
        emit!(MarketResolved {
            market: self.address,
            market_id: self.market_id,
            result,
            oracle_price: plan.price.price,
            oracle_updated_at: plan.price.updated_at,
            deposited: self.deposited,
            pool_fees: plan.pool_fees,
            creator_fees: plan.creator_fees,
        });

        msg!(
            "Market #{} resolved: result={:?}, price={}, strike={}, deposited={}, pool_fees={}, creator_fees={}",
            self.market_id,
            result,
            plan.price.price,
            self.strike_price,
            self.deposited,
            plan.pool_fees,
            plan.creator_fees,
        );

        add(plan.pool_fees, plan.creator_fees)
    }
}

impl MarketManager {
    /// Resolves one active market and moves it to the matured set.
    pub fn resolve_market(
        &mut self,
        market_id: MarketId,
        feed: &impl PriceFeed,
        ledger: &mut impl Ledger,
        now: i64,
    ) -> Result<()> {
        self.require_not_paused()?;

        let fee_recipient = self.config.fee_recipient;
        let max_price_age = self.config.max_oracle_price_age;
        let remitted = self
            .active_market_mut(market_id)?
            .resolve(feed, ledger, &fee_recipient, max_price_age, now)?;

        self.total_deposited = sub(self.total_deposited, remitted)?;
        self.set_membership(market_id, Membership::Matured)
    }
}
