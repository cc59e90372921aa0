use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::constants::UNIT;
use crate::errors::BinaryOptionError;
use crate::utils::fixed_math::{add, divide_round, multiply_round, sub};

/// ─── Bid Position ─────────────────────────────────────────────────
///
/// One side (long or short) of a market: open bids during bidding, then
/// the options those bids convert into. Custody of the underlying funds
/// lives on the ledger; this is bookkeeping only.
///
/// # Invariants
/// - `total_bids` equals the sum of `bids`.
/// - `total_supply` equals the sum of `balances` and never exceeds the
///   exercisable deposits it was claimed against.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BidPosition {
    /// Outstanding bid per account. Removed once claimed or fully refunded.
    pub bids: BTreeMap<Pubkey, u128>,

    pub total_bids: u128,

    /// Options granted per account at claim time. Presence marks the claim.
    pub claimed: BTreeMap<Pubkey, u128>,

    /// Current option holdings (claims, transfers, minus exercises).
    pub balances: BTreeMap<Pubkey, u128>,

    pub total_supply: u128,
}

impl BidPosition {
    pub fn bid_of(&self, account: &Pubkey) -> u128 {
        self.bids.get(account).copied().unwrap_or(0)
    }

    pub fn balance_of(&self, account: &Pubkey) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn has_claimed(&self, account: &Pubkey) -> bool {
        self.claimed.contains_key(account)
    }

    pub fn bid(&mut self, account: Pubkey, amount: u128) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }

        let total_bids = add(self.total_bids, amount)?;
        let bid = add(self.bid_of(&account), amount)?;

        self.total_bids = total_bids;
        self.bids.insert(account, bid);
        Ok(())
    }

    /// Splits a refund into `(paid back, retained fee)`.
    pub fn refund_split(amount: u128, refund_fee: u128) -> Result<(u128, u128)> {
        let refund_minus_fee = multiply_round(amount, sub(UNIT, refund_fee)?)?;
        let fee = sub(amount, refund_minus_fee)?;
        Ok((refund_minus_fee, fee))
    }

    /// Withdraws `amount` of the account's bid and returns the fee the pool keeps.
    pub fn refund(&mut self, account: Pubkey, amount: u128, refund_fee: u128) -> Result<u128> {
        let bid = self.bid_of(&account);
        require!(amount <= bid, BinaryOptionError::InsufficientBid);

        let (_, fee) = Self::refund_split(amount, refund_fee)?;
        let total_bids = sub(self.total_bids, amount)?;

        self.total_bids = total_bids;
        if bid == amount {
            self.bids.remove(&account);
        } else {
            self.bids.insert(account, bid - amount);
        }
        Ok(fee)
    }

    /// Options the account's bid converts into at `price`, without claiming.
    ///
    /// The last outstanding bid receives whatever supply is left so rounding
    /// dust never strands deposits.
    pub fn claimable(&self, account: &Pubkey, price: u128, exercisable_deposits: u128) -> Result<u128> {
        require!(
            !self.has_claimed(account),
            BinaryOptionError::AlreadyClaimed
        );

        let bid = self.bid_of(account);
        if bid == 0 {
            return Ok(0);
        }

        let remaining_supply = exercisable_deposits.saturating_sub(self.total_supply);
        if bid == self.total_bids {
            return Ok(remaining_supply);
        }

        Ok(divide_round(bid, price)?.min(remaining_supply))
    }

    /// Converts the account's bid into options exactly once.
    pub fn claim(&mut self, account: Pubkey, price: u128, exercisable_deposits: u128) -> Result<u128> {
        let options = self.claimable(&account, price, exercisable_deposits)?;
        let bid = self.bid_of(&account);
        if bid == 0 {
            return Ok(0);
        }

        let total_bids = sub(self.total_bids, bid)?;
        let total_supply = add(self.total_supply, options)?;
        let balance = add(self.balance_of(&account), options)?;

        self.total_bids = total_bids;
        self.total_supply = total_supply;
        self.bids.remove(&account);
        self.balances.insert(account, balance);
        self.claimed.insert(account, options);
        Ok(options)
    }

    pub fn transfer(&mut self, from: Pubkey, to: Pubkey, amount: u128) -> Result<()> {
        let from_balance = self.balance_of(&from);
        require!(
            amount <= from_balance,
            BinaryOptionError::InsufficientBalance
        );
        if from == to || amount == 0 {
            return Ok(());
        }

        let to_balance = add(self.balance_of(&to), amount)?;
        if from_balance == amount {
            self.balances.remove(&from);
        } else {
            self.balances.insert(from, from_balance - amount);
        }
        self.balances.insert(to, to_balance);
        Ok(())
    }

    /// Burns the account's whole option balance and returns it.
    pub fn exercise(&mut self, account: &Pubkey) -> Result<u128> {
        let balance = self.balance_of(account);
        if balance == 0 {
            return Ok(0);
        }

        self.total_supply = sub(self.total_supply, balance)?;
        self.balances.remove(account);
        Ok(balance)
    }
}
