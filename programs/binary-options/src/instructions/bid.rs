use anchor_lang::prelude::*;

use crate::errors::BinaryOptionError;
use crate::events::BidPlaced;
use crate::state::*;
use crate::utils::fixed_math::add;
use crate::utils::ledger::Ledger;

impl Market {
    /// Place a bid on `side` during bidding.
    ///
    /// Pulls `amount` from the bidder into the market's custody account and
    /// reprices both sides.
    pub fn bid(
        &mut self,
        side: Side,
        account: Pubkey,
        amount: u128,
        ledger: &mut impl Ledger,
        now: i64,
    ) -> Result<()> {
        self.require_live()?;
        require!(
            self.phase(now) == Phase::Bidding,
            BinaryOptionError::BiddingClosed
        );
        if amount == 0 {
            return Ok(());
        }

        let deposited = add(self.deposited, amount)?;
        let (mut long_total, mut short_total) = self.total_bids();
        match side {
            Side::Long => long_total = add(long_total, amount)?,
            Side::Short => short_total = add(short_total, amount)?,
        }
        let prices = Prices::compute(long_total, short_total, deposited, &self.fees)?;

        ledger.transfer_from(&self.address, &account, &self.address, amount)?;

        self.position_mut(side).bid(account, amount)?;
        self.deposited = deposited;

        emit!(BidPlaced {
            market: self.address,
            market_id: self.market_id,
            side,
            account,
            amount,
            deposited,
        });
        self.set_prices(prices);

        msg!(
            "Bid placed: {} on {:?} by {} for market #{}",
            amount,
            side,
            account,
            self.market_id,
        );

        Ok(())
    }
}

impl MarketManager {
    pub fn bid(
        &mut self,
        market_id: MarketId,
        side: Side,
        account: Pubkey,
        amount: u128,
        ledger: &mut impl Ledger,
        now: i64,
    ) -> Result<()> {
        self.require_not_paused()?;

        let total_deposited = add(self.total_deposited, amount)?;
        self.active_market_mut(market_id)?
            .bid(side, account, amount, ledger, now)?;
        self.total_deposited = total_deposited;
        Ok(())
    }
}
