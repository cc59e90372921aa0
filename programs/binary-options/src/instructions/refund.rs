use anchor_lang::prelude::*;

use crate::errors::BinaryOptionError;
use crate::events::Refunded;
use crate::state::*;
use crate::utils::fixed_math::{add, sub};
use crate::utils::ledger::Ledger;

impl Market {
    /// Withdraw part or all of a bid during bidding.
    ///
    /// The refund fee stays in the pool. Returns the amount paid back.
    pub fn refund(
        &mut self,
        side: Side,
        account: Pubkey,
        amount: u128,
        ledger: &mut impl Ledger,
        now: i64,
    ) -> Result<u128> {
        self.require_live()?;
        require!(
            self.phase(now) == Phase::Bidding,
            BinaryOptionError::BiddingClosed
        );
        require!(self.refunds_enabled, BinaryOptionError::RefundsDisabled);
        if amount == 0 {
            return Ok(0);
        }

        let (long_bid, short_bid) = self.bids_of(&account);
        let bid = match side {
            Side::Long => long_bid,
            Side::Short => short_bid,
        };
        require!(amount <= bid, BinaryOptionError::InsufficientBid);

        // The creator must keep enough capital in the market.
        if account == self.creator {
            match side {
                Side::Long => self.creator_limits.check(long_bid - amount, short_bid)?,
                Side::Short => self.creator_limits.check(long_bid, short_bid - amount)?,
            }
        }

        let refund_fee = self.fees.refund_fee;
        let (refund, fee) = BidPosition::refund_split(amount, refund_fee)?;
        let deposited = sub(self.deposited, refund)?;
        let (mut long_total, mut short_total) = self.total_bids();
        match side {
            Side::Long => long_total = sub(long_total, amount)?,
            Side::Short => short_total = sub(short_total, amount)?,
        }
        let prices = Prices::compute(long_total, short_total, deposited, &self.fees)?;
        let retained_refund_fees = add(self.retained_refund_fees, fee)?;

        ledger.transfer(&self.address, &account, refund)?;

        self.position_mut(side).refund(account, amount, refund_fee)?;
        self.deposited = deposited;
        self.retained_refund_fees = retained_refund_fees;

        emit!(Refunded {
            market: self.address,
            market_id: self.market_id,
            side,
            account,
            refund,
            fee,
            deposited,
        });
        self.set_prices(prices);

        msg!(
            "Refund: {} returned to {} ({} fee retained) for {:?} on market #{}",
            refund,
            account,
            fee,
            side,
            self.market_id,
        );

        Ok(refund)
    }
}

impl MarketManager {
    pub fn refund(
        &mut self,
        market_id: MarketId,
        side: Side,
        account: Pubkey,
        amount: u128,
        ledger: &mut impl Ledger,
        now: i64,
    ) -> Result<u128> {
        self.require_not_paused()?;

        let refund = self
            .active_market_mut(market_id)?
            .refund(side, account, amount, ledger, now)?;
        self.total_deposited = sub(self.total_deposited, refund)?;
        Ok(refund)
    }
}
