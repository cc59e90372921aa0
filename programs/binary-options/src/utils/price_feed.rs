use std::collections::{BTreeMap, BTreeSet};

use anchor_lang::prelude::*;

use crate::errors::BinaryOptionError;
use crate::state::OracleKey;

/// Latest oracle observation for a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceData {
    /// Price in the quote currency, 18-decimal fixed point.
    pub price: u128,
    /// Unix timestamp of the update.
    pub updated_at: i64,
}

/// Read-only price source. Markets and the manager treat it as authoritative.
pub trait PriceFeed {
    fn latest_price(&self, key: &OracleKey) -> Result<PriceData>;

    fn is_valid_key(&self, key: &OracleKey) -> bool;

    fn is_inverse_pricing(&self, key: &OracleKey) -> bool;
}

/// In-memory price feed keyed by oracle key.
#[derive(Clone, Debug, Default)]
pub struct MemoryPriceFeed {
    prices: BTreeMap<OracleKey, PriceData>,
    inverse: BTreeSet<OracleKey>,
}

impl MemoryPriceFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_price(&mut self, key: OracleKey, price: u128, updated_at: i64) {
        self.prices.insert(key, PriceData { price, updated_at });
    }

    pub fn remove_price(&mut self, key: &OracleKey) {
        self.prices.remove(key);
    }

    pub fn set_inverse_pricing(&mut self, key: OracleKey, inverse: bool) {
        if inverse {
            self.inverse.insert(key);
        } else {
            self.inverse.remove(&key);
        }
    }
}

impl PriceFeed for MemoryPriceFeed {
    fn latest_price(&self, key: &OracleKey) -> Result<PriceData> {
        Ok(*self
            .prices
            .get(key)
            .ok_or(BinaryOptionError::InvalidKey)?)
    }

    /// A key is live once it carries a non-zero price.
    fn is_valid_key(&self, key: &OracleKey) -> bool {
        self.prices.get(key).map_or(false, |data| data.price != 0)
    }

    fn is_inverse_pricing(&self, key: &OracleKey) -> bool {
        self.inverse.contains(key)
    }
}
