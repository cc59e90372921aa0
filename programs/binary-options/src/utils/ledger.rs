use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::errors::BinaryOptionError;
use crate::utils::fixed_math::{add, sub};

/// Token custody. Bids move user → market, refunds and payouts move
/// market → user, fee remittance moves market → fee recipient / creator.
///
/// A failed transfer must leave balances untouched.
pub trait Ledger {
    fn balance_of(&self, account: &Pubkey) -> u128;

    fn allowance(&self, owner: &Pubkey, spender: &Pubkey) -> u128;

    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<()>;

    /// Move `amount` out of `from` on behalf of `spender`, consuming allowance.
    fn transfer_from(
        &mut self,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u128,
    ) -> Result<()>;
}

/// Fails unless `spender` may pull `amount` from `owner` in one or more transfers.
pub fn ensure_can_debit<L: Ledger + ?Sized>(
    ledger: &L,
    spender: &Pubkey,
    owner: &Pubkey,
    amount: u128,
) -> Result<()> {
    require!(
        ledger.balance_of(owner) >= amount,
        BinaryOptionError::InsufficientBalance
    );
    require!(
        ledger.allowance(owner, spender) >= amount,
        BinaryOptionError::InsufficientAllowance
    );
    Ok(())
}

/// In-memory ledger with ERC-20 style allowances.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    balances: BTreeMap<Pubkey, u128>,
    allowances: BTreeMap<(Pubkey, Pubkey), u128>,
    total_supply: u128,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self, account: &Pubkey, amount: u128) -> Result<()> {
        let supply = add(self.total_supply, amount)?;
        let balance = add(self.balance_of(account), amount)?;
        self.total_supply = supply;
        self.balances.insert(*account, balance);
        Ok(())
    }

    pub fn approve(&mut self, owner: &Pubkey, spender: &Pubkey, amount: u128) {
        self.allowances.insert((*owner, *spender), amount);
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    fn move_balance(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<()> {
        let from_balance = self.balance_of(from);
        require!(
            from_balance >= amount,
            BinaryOptionError::InsufficientBalance
        );
        if from == to || amount == 0 {
            return Ok(());
        }

        let to_balance = add(self.balance_of(to), amount)?;
        self.balances.insert(*from, from_balance - amount);
        self.balances.insert(*to, to_balance);
        Ok(())
    }
}

impl Ledger for MemoryLedger {
    fn balance_of(&self, account: &Pubkey) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Pubkey, spender: &Pubkey) -> u128 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<()> {
        self.move_balance(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u128,
    ) -> Result<()> {
        let allowance = self.allowance(from, spender);
        require!(
            allowance >= amount,
            BinaryOptionError::InsufficientAllowance
        );
        self.move_balance(from, to, amount)?;
        self.allowances
            .insert((*from, *spender), sub(allowance, amount)?);
        Ok(())
    }
}
