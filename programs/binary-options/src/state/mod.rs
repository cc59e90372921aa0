pub mod bid_position;
pub mod manager;
pub mod market;

pub use bid_position::*;
pub use manager::*;
pub use market::*;

use std::fmt;

use anchor_lang::prelude::*;

use crate::constants::QUOTE_CURRENCY_KEY;

/// Index of a market in the manager's arena.
pub type MarketId = u64;

/// ─── Oracle Key ───────────────────────────────────────────────────
///
/// Currency key of a price feed, e.g. `sETH`, zero-padded to 32 bytes.
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub struct OracleKey(pub [u8; 32]);

impl OracleKey {
    /// Symbols longer than 32 bytes are truncated.
    pub fn from_symbol(symbol: &str) -> Self {
        let mut bytes = [0u8; 32];
        let len = symbol.len().min(32);
        bytes[..len].copy_from_slice(&symbol.as_bytes()[..len]);
        Self(bytes)
    }

    pub fn symbol(&self) -> String {
        let end = self.0.iter().position(|b| *b == 0).unwrap_or(32);
        String::from_utf8_lossy(&self.0[..end]).into_owned()
    }

    pub fn is_quote_currency(&self) -> bool {
        *self == Self::from_symbol(QUOTE_CURRENCY_KEY)
    }
}

impl fmt::Display for OracleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol())
    }
}

impl fmt::Debug for OracleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OracleKey({})", self.symbol())
    }
}

/// ─── Side ─────────────────────────────────────────────────────────
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Pays out if the final price is at or above the strike.
    Long,
    /// Pays out if the final price is below the strike.
    Short,
}

/// ─── Phase ────────────────────────────────────────────────────────
///
/// Derived from the clock and the resolution flag; never stored.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Accepting bids and refunds.
    Bidding,

    /// Bidding closed, maturity not reached. Options can be claimed.
    Trading,

    /// Maturity reached, awaiting `resolve`.
    Resolving,

    /// Final price recorded; winning options can be exercised.
    Resolved,

    /// Past expiry; the manager may destroy the market.
    Expired,
}
