use anchor_lang::prelude::*;

use crate::errors::BinaryOptionError;
use crate::events::{MarketDestroyed, MarketsExpired};
use crate::state::*;
use crate::utils::fixed_math::sub;
use crate::utils::ledger::Ledger;

impl Market {
    /// Sweep everything left in custody to `beneficiary` and make the market
    /// permanently inert. Returns the `deposited` value written off.
    pub fn destroy(&mut self, beneficiary: &Pubkey, ledger: &mut impl Ledger, now: i64) -> Result<u128> {
        self.require_live()?;
        require!(now >= self.times.expiry, BinaryOptionError::MarketNotExpired);
        require!(self.resolution.resolved, BinaryOptionError::NotResolved);

        let residual = self.deposited;
        // Includes anything sent to the custody account directly.
        let swept = ledger.balance_of(&self.address);
        if swept > 0 {
            ledger.transfer(&self.address, beneficiary, swept)?;
        }

        self.deposited = 0;
        self.destroyed = true;

        emit!(MarketDestroyed {
            market: self.address,
            market_id: self.market_id,
            beneficiary: *beneficiary,
            residual,
            swept,
        });

        msg!(
            "Market #{} destroyed: residual={}, swept {} to {}",
            self.market_id,
            residual,
            swept,
            beneficiary,
        );

        Ok(residual)
    }
}

impl MarketManager {
    /// Destroy up to `batch` expired matured markets, sweeping their
    /// custody balances to the owner.
    pub fn expire_markets(
        &mut self,
        batch: usize,
        ledger: &mut impl Ledger,
        now: i64,
    ) -> Result<Vec<MarketId>> {
        let due: Vec<MarketId> = self
            .matured
            .iter()
            .copied()
            .filter(|id| {
                self.market(*id)
                    .map(|market| market.times.expiry <= now)
                    .unwrap_or(false)
            })
            .take(batch)
            .collect();

        let beneficiary = self.owner;
        for market_id in &due {
            let residual = self
                .entry_mut(*market_id)?
                .market
                .destroy(&beneficiary, ledger, now)?;
            self.total_deposited = sub(self.total_deposited, residual)?;
            self.set_membership(*market_id, Membership::Destroyed)?;
        }

        if !due.is_empty() {
            emit!(MarketsExpired {
                market_ids: due.clone(),
                remaining_matured: self.matured.len() as u64,
            });
            msg!(
                "Expired {} markets, {} still matured",
                due.len(),
                self.matured.len(),
            );
        }

        Ok(due)
    }
}
