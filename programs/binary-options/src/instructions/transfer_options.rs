use anchor_lang::prelude::*;

use crate::errors::BinaryOptionError;
use crate::events::OptionsTransferred;
use crate::state::*;

impl Market {
    /// Move claimed options on `side` between accounts.
    pub fn transfer_options(
        &mut self,
        side: Side,
        from: Pubkey,
        to: Pubkey,
        amount: u128,
        now: i64,
    ) -> Result<()> {
        self.require_live()?;
        require!(
            now >= self.times.bidding_end,
            BinaryOptionError::BiddingOpen
        );

        self.position_mut(side).transfer(from, to, amount)?;

        emit!(OptionsTransferred {
            market: self.address,
            market_id: self.market_id,
            side,
            from,
            to,
            amount,
        });

        msg!(
            "Options transferred: {} {:?} from {} to {} on market #{}",
            amount,
            side,
            from,
            to,
            self.market_id,
        );

        Ok(())
    }
}

impl MarketManager {
    pub fn transfer_options(
        &mut self,
        market_id: MarketId,
        side: Side,
        from: Pubkey,
        to: Pubkey,
        amount: u128,
        now: i64,
    ) -> Result<()> {
        self.require_not_paused()?;
        self.entry_mut(market_id)?
            .market
            .transfer_options(side, from, to, amount, now)
    }
}
