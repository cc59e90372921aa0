use anchor_lang::prelude::*;

use crate::errors::BinaryOptionError;
use crate::events::{OptionsClaimed, OptionsExercised};
use crate::state::*;
use crate::utils::fixed_math::{add, sub};
use crate::utils::ledger::Ledger;
use crate::utils::price_feed::PriceFeed;

impl Market {
    /// Redeem the account's options after resolution.
    ///
    /// Any unclaimed winning bid is claimed first. Winning options pay out
    /// 1:1 from the remaining deposits; both sides are burned. Returns the
    /// payout.
    pub fn exercise(&mut self, account: Pubkey, ledger: &mut impl Ledger) -> Result<u128> {
        self.require_live()?;
        require!(self.resolution.resolved, BinaryOptionError::NotResolved);

        let winner = self.result();
        let pending = self.pending_claim(winner, &account)?;
        let (long_balance, short_balance) = self.balances_of(&account);
        let (winning_balance, losing_balance) = match winner {
            Side::Long => (long_balance, short_balance),
            Side::Short => (short_balance, long_balance),
        };
        let winning_balance = add(winning_balance, pending.unwrap_or(0))?;
        require!(
            winning_balance > 0 || losing_balance > 0,
            BinaryOptionError::NothingToExercise
        );

        let payout = winning_balance.min(self.deposited);
        let deposited = sub(self.deposited, payout)?;
        require!(
            ledger.balance_of(&self.address) >= payout,
            BinaryOptionError::InsufficientBalance
        );

        if payout > 0 {
            ledger.transfer(&self.address, &account, payout)?;
        }

        if pending.is_some() {
            let price = self.prices.get(winner);
            let exercisable = self.exercisable_deposits()?;
            let options = self.position_mut(winner).claim(account, price, exercisable)?;
            let (long_options, short_options) = match winner {
                Side::Long => (options, 0),
                Side::Short => (0, options),
            };
            emit!(OptionsClaimed {
                market: self.address,
                market_id: self.market_id,
                account,
                long_options,
                short_options,
            });
        }

        let long_burned = self.long.exercise(&account)?;
        let short_burned = self.short.exercise(&account)?;
        self.deposited = deposited;

        emit!(OptionsExercised {
            market: self.address,
            market_id: self.market_id,
            account,
            payout,
            long_burned,
            short_burned,
        });

        msg!(
            "Exercised: {} paid to {} (burned {} long / {} short), market #{}",
            payout,
            account,
            long_burned,
            short_burned,
            self.market_id,
        );

        Ok(payout)
    }
}

impl MarketManager {
    /// Exercise on behalf of `account`, resolving the market first if it has
    /// matured but nobody has resolved it yet.
    pub fn exercise(
        &mut self,
        market_id: MarketId,
        account: Pubkey,
        feed: &impl PriceFeed,
        ledger: &mut impl Ledger,
        now: i64,
    ) -> Result<u128> {
        self.require_not_paused()?;

        let max_price_age = self.config.max_oracle_price_age;
        let market = self.market(market_id)?;
        let needs_resolution = self.membership(market_id)? == Membership::Active
            && !market.resolution.resolved
            && now >= market.times.maturity;
        if needs_resolution {
            // Nothing must change unless the exercise itself will go through.
            let plan = market.plan_resolution(feed, &*ledger, max_price_age, now)?;
            let winner = market.winning_side(plan.price.price);
            let (long_balance, short_balance) = market.balances_of(&account);
            require!(
                long_balance > 0 || short_balance > 0 || market.position(winner).bid_of(&account) > 0,
                BinaryOptionError::NothingToExercise
            );
            self.resolve_market(market_id, feed, ledger, now)?;
        }

        let payout = self.entry_mut(market_id)?.market.exercise(account, ledger)?;
        self.total_deposited = sub(self.total_deposited, payout)?;
        Ok(payout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::UNIT;
    use crate::test_utils::{assert_error, fixture, MATURITY};

    #[test]
    fn exercise_requires_resolution() {
        let mut f = fixture(UNIT, 3 * UNIT);
        let creator = f.creator;
        assert_error(
            f.market.exercise(creator, &mut f.ledger),
            BinaryOptionError::NotResolved,
        );
    }

    #[test]
    fn winners_drain_the_pool_exactly() {
        let mut f = fixture(UNIT, 3 * UNIT);
        let alice = f.funded_account(UNIT);
        f.market.bid(Side::Long, alice, UNIT, &mut f.ledger, 0).unwrap();
        f.set_final_price(UNIT, MATURITY);
        f.resolve().unwrap();
        let creator = f.creator;
        let creator_fees = f.ledger.balance_of(&creator);

        let alice_payout = f.market.exercise(alice, &mut f.ledger).unwrap();
        let creator_payout = f.market.exercise(creator, &mut f.ledger).unwrap();

        assert_eq!(alice_payout, 2_475_000_000_000_000_002);
        assert_eq!(creator_payout, 2_474_999_999_999_999_998);
        assert_eq!(f.ledger.balance_of(&alice), alice_payout);
        assert_eq!(f.ledger.balance_of(&creator), creator_fees + creator_payout);
        assert_eq!(f.market.deposited, 0);
        assert_eq!(f.ledger.balance_of(&f.market.address), 0);
        assert_eq!(f.market.total_supplies(), (0, 0));
    }

    #[test]
    fn second_exercise_has_nothing_left() {
        let mut f = fixture(2 * UNIT, 3 * UNIT);
        f.set_final_price(UNIT, MATURITY);
        f.resolve().unwrap();
        let creator = f.creator;

        f.market.claim(creator, MATURITY).unwrap();
        assert!(f.market.exercise(creator, &mut f.ledger).unwrap() > 0);
        assert_error(
            f.market.exercise(creator, &mut f.ledger),
            BinaryOptionError::NothingToExercise,
        );
    }

    #[test]
    fn losing_options_burn_for_nothing() {
        let mut f = fixture(UNIT, 3 * UNIT);
        let bob = f.funded_account(UNIT);
        f.market.bid(Side::Short, bob, UNIT, &mut f.ledger, 0).unwrap();
        // claimed before resolution, so bob holds short options
        f.market.claim(bob, MATURITY - 1).unwrap();
        f.set_final_price(2 * UNIT, MATURITY);
        f.resolve().unwrap();
        let deposited = f.market.deposited;

        assert_eq!(f.market.exercise(bob, &mut f.ledger).unwrap(), 0);
        assert_eq!(f.market.balances_of(&bob), (0, 0));
        assert_eq!(f.market.deposited, deposited);
        assert_error(
            f.market.exercise(bob, &mut f.ledger),
            BinaryOptionError::NothingToExercise,
        );
    }

    #[test]
    fn stranger_cannot_exercise() {
        let mut f = fixture(UNIT, 3 * UNIT);
        f.set_final_price(UNIT, MATURITY);
        f.resolve().unwrap();
        assert_error(
            f.market.exercise(Pubkey::new_unique(), &mut f.ledger),
            BinaryOptionError::NothingToExercise,
        );
    }
}
