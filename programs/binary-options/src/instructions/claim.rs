use anchor_lang::prelude::*;

use crate::errors::BinaryOptionError;
use crate::events::OptionsClaimed;
use crate::state::*;

impl Market {
    /// Convert the account's bids into options once bidding has ended.
    ///
    /// Before resolution both sides convert; afterwards only the winning
    /// side does. Returns `(long_options, short_options)`.
    pub fn claim(&mut self, account: Pubkey, now: i64) -> Result<(u128, u128)> {
        self.require_live()?;
        require!(
            now >= self.times.bidding_end,
            BinaryOptionError::BiddingOpen
        );

        let long = self.pending_claim(Side::Long, &account)?;
        let short = self.pending_claim(Side::Short, &account)?;
        if long.is_none() && short.is_none() {
            let claimed = [Side::Long, Side::Short]
                .into_iter()
                .any(|side| self.claims_side(side) && self.position(side).has_claimed(&account));
            if claimed {
                return err!(BinaryOptionError::AlreadyClaimed);
            }
            return err!(BinaryOptionError::NothingToClaim);
        }

        let exercisable = self.exercisable_deposits()?;
        let mut options = [0u128; 2];
        for (slot, (side, pending)) in options
            .iter_mut()
            .zip([(Side::Long, long), (Side::Short, short)])
        {
            if pending.is_some() {
                let price = self.prices.get(side);
                *slot = self.position_mut(side).claim(account, price, exercisable)?;
            }
        }
        let [long_options, short_options] = options;

        emit!(OptionsClaimed {
            market: self.address,
            market_id: self.market_id,
            account,
            long_options,
            short_options,
        });

        msg!(
            "Options claimed: {} long / {} short by {} on market #{}",
            long_options,
            short_options,
            account,
            self.market_id,
        );

        Ok((long_options, short_options))
    }
}

impl MarketManager {
    pub fn claim(&mut self, market_id: MarketId, account: Pubkey, now: i64) -> Result<(u128, u128)> {
        self.require_not_paused()?;
        self.entry_mut(market_id)?.market.claim(account, now)
    }
}
