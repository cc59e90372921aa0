use anchor_lang::prelude::*;

use crate::events::MarketsTransitioned;
use crate::state::*;
use crate::utils::ledger::Ledger;
use crate::utils::price_feed::PriceFeed;

impl MarketManager {
    /// Resolve up to `batch` matured active markets and move them to the
    /// matured set, oldest first.
    ///
    /// The whole batch is checked before anything is resolved, so one market
    /// with a stale feed fails the call without touching the others. Callers
    /// repeat until the returned list is empty.
    pub fn transition_matured_markets(
        &mut self,
        batch: usize,
        feed: &impl PriceFeed,
        ledger: &mut impl Ledger,
        now: i64,
    ) -> Result<Vec<MarketId>> {
        self.require_not_paused()?;

        let due = self.due_for_transition(batch, now);
        let max_price_age = self.config.max_oracle_price_age;
        for market_id in &due {
            self.market(*market_id)?
                .plan_resolution(feed, &*ledger, max_price_age, now)?;
        }

        for market_id in &due {
            self.resolve_market(*market_id, feed, ledger, now)?;
        }

        if !due.is_empty() {
            emit!(MarketsTransitioned {
                market_ids: due.clone(),
                remaining_active: self.active.len() as u64,
            });
            msg!(
                "Transitioned {} matured markets, {} still active",
                due.len(),
                self.active.len(),
            );
        }

        Ok(due)
    }

    fn due_for_transition(&self, batch: usize, now: i64) -> Vec<MarketId> {
        self.active
            .iter()
            .copied()
            .filter(|id| {
                self.market(*id)
                    .map(|market| market.times.maturity <= now)
                    .unwrap_or(false)
            })
            .take(batch)
            .collect()
    }
}
