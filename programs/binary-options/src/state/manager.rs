use anchor_lang::prelude::*;

use super::{CreatorLimits, Fees, Market, MarketId, OracleKey};
use crate::constants::*;
use crate::errors::BinaryOptionError;
use crate::instructions::MarketTemplate;
use crate::utils::fixed_math::add;
use crate::utils::price_feed::PriceFeed;

/// ─── Manager Config ───────────────────────────────────────────────
///
/// Owner-settable parameters, read when markets are created and resolved.
/// Amounts and fees are 18-decimal fixed point; durations are seconds.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Charged to the creator on top of the opening bids.
    pub creation_fee: u128,

    /// Minimum opening bid per side.
    pub min_bid: u128,

    /// Maximum opening bid per side.
    pub max_bid: u128,

    pub capital_requirement: u128,

    pub skew_limit: u128,

    pub min_time_to_maturity: i64,

    pub max_time_to_maturity: i64,

    /// expiry = maturity + expiry_duration
    pub expiry_duration: i64,

    /// Oldest acceptable oracle update, measured back from maturity.
    pub max_oracle_price_age: i64,

    pub pool_fee: u128,

    pub creator_fee: u128,

    pub refund_fee: u128,

    /// Receives creation fees and pool fees.
    pub fee_recipient: Pubkey,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            creation_fee: DEFAULT_CREATION_FEE,
            min_bid: DEFAULT_MIN_BID,
            max_bid: DEFAULT_MAX_BID,
            capital_requirement: DEFAULT_CAPITAL_REQUIREMENT,
            skew_limit: DEFAULT_SKEW_LIMIT,
            min_time_to_maturity: DEFAULT_MIN_TIME_TO_MATURITY,
            max_time_to_maturity: DEFAULT_MAX_TIME_TO_MATURITY,
            expiry_duration: DEFAULT_EXPIRY_DURATION,
            max_oracle_price_age: DEFAULT_MAX_ORACLE_PRICE_AGE,
            pool_fee: DEFAULT_POOL_FEE,
            creator_fee: DEFAULT_CREATOR_FEE,
            refund_fee: DEFAULT_REFUND_FEE,
            fee_recipient: Pubkey::default(),
        }
    }
}

impl ManagerConfig {
    pub fn validate(&self) -> Result<()> {
        self.fees().validate()?;
        require!(self.min_bid <= self.max_bid, BinaryOptionError::InvalidConfig);
        require!(self.skew_limit <= HALF_UNIT, BinaryOptionError::InvalidConfig);
        require!(
            0 <= self.min_time_to_maturity && self.min_time_to_maturity <= self.max_time_to_maturity,
            BinaryOptionError::InvalidConfig
        );
        require!(self.expiry_duration > 0, BinaryOptionError::InvalidConfig);
        require!(self.max_oracle_price_age >= 0, BinaryOptionError::InvalidConfig);
        Ok(())
    }

    pub fn fees(&self) -> Fees {
        Fees {
            pool_fee: self.pool_fee,
            creator_fee: self.creator_fee,
            refund_fee: self.refund_fee,
        }
    }

    /// Shared parameters every new market is instantiated from.
    pub fn market_template(&self) -> MarketTemplate {
        MarketTemplate {
            fees: self.fees(),
            creator_limits: CreatorLimits {
                capital_requirement: self.capital_requirement,
                skew_limit: self.skew_limit,
            },
        }
    }
}

/// ─── Membership ───────────────────────────────────────────────────
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Membership {
    /// Not yet matured and processed.
    Active,

    /// Resolved, waiting for expiry.
    Matured,

    /// Swept after expiry. The record stays in the arena.
    Destroyed,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct MarketEntry {
    pub(crate) market: Market,
    pub(crate) membership: Membership,
}

/// ─── Market Manager ───────────────────────────────────────────────
///
/// PDA: seeds = [b"manager"]
///
/// Factory and registry. Markets live in an arena indexed by `MarketId`;
/// `active` and `matured` keep insertion order for pagination.
///
/// # Invariant
/// `total_deposited` equals the sum of `deposited` over the arena.
/// Destroyed markets hold zero. Every mutation goes through a manager
/// method, so arena entries are only reachable by shared reference:
///
/// ```compile_fail
/// use binary_options::{ManagerConfig, MarketManager};
///
/// let mut manager = MarketManager::new(Default::default(), ManagerConfig::default()).unwrap();
/// manager.total_deposited = 1;
/// ```
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct MarketManager {
    /// Operator allowed to change configuration.
    pub(crate) owner: Pubkey,

    pub(crate) nominated_owner: Option<Pubkey>,

    /// Spender identity used to pull opening bids and creation fees.
    pub(crate) address: Pubkey,

    pub(crate) config: ManagerConfig,

    pub(crate) paused: bool,

    pub(crate) market_creation_enabled: bool,

    pub(crate) total_deposited: u128,

    pub(crate) markets: Vec<MarketEntry>,

    pub(crate) active: Vec<MarketId>,

    pub(crate) matured: Vec<MarketId>,
}

impl MarketManager {
    pub fn new(owner: Pubkey, config: ManagerConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            owner,
            nominated_owner: None,
            address: Self::manager_address(),
            config,
            paused: false,
            market_creation_enabled: true,
            total_deposited: 0,
            markets: Vec::new(),
            active: Vec::new(),
            matured: Vec::new(),
        })
    }

    pub fn manager_address() -> Pubkey {
        Pubkey::find_program_address(&[SEED_MANAGER], &crate::ID).0
    }

    pub fn owner(&self) -> Pubkey {
        self.owner
    }

    pub fn nominated_owner(&self) -> Option<Pubkey> {
        self.nominated_owner
    }

    /// Spender that market creators approve on the ledger.
    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn market_creation_enabled(&self) -> bool {
        self.market_creation_enabled
    }

    pub fn total_deposited(&self) -> u128 {
        self.total_deposited
    }

    pub fn market(&self, market_id: MarketId) -> Result<&Market> {
        Ok(&self.entry(market_id)?.market)
    }

    pub fn membership(&self, market_id: MarketId) -> Result<Membership> {
        Ok(self.entry(market_id)?.membership)
    }

    pub fn markets_len(&self) -> usize {
        self.markets.len()
    }

    pub fn num_active_markets(&self) -> usize {
        self.active.len()
    }

    pub fn num_matured_markets(&self) -> usize {
        self.matured.len()
    }

    /// Up to `count` active market ids starting at `index`.
    pub fn active_markets(&self, index: usize, count: usize) -> Vec<MarketId> {
        page(&self.active, index, count)
    }

    /// Up to `count` matured market ids starting at `index`.
    pub fn matured_markets(&self, index: usize, count: usize) -> Vec<MarketId> {
        page(&self.matured, index, count)
    }

    /// Recomputes total deposits from the arena and compares.
    pub fn check_total_deposited(&self) -> Result<u128> {
        let sum = self
            .markets
            .iter()
            .try_fold(0u128, |sum, entry| add(sum, entry.market.deposited))?;

        require!(
            sum == self.total_deposited,
            BinaryOptionError::TotalDepositedMismatch
        );
        Ok(sum)
    }

    pub fn is_valid_key(&self, feed: &impl PriceFeed, key: &OracleKey) -> bool {
        !key.is_quote_currency() && feed.is_valid_key(key) && !feed.is_inverse_pricing(key)
    }

    pub(crate) fn require_not_paused(&self) -> Result<()> {
        require!(!self.paused, BinaryOptionError::ManagerPaused);
        Ok(())
    }

    fn entry(&self, market_id: MarketId) -> Result<&MarketEntry> {
        Ok(self
            .markets
            .get(market_id as usize)
            .ok_or(BinaryOptionError::UnknownMarket)?)
    }

    pub(crate) fn entry_mut(&mut self, market_id: MarketId) -> Result<&mut MarketEntry> {
        Ok(self
            .markets
            .get_mut(market_id as usize)
            .ok_or(BinaryOptionError::UnknownMarket)?)
    }

    pub(crate) fn active_market_mut(&mut self, market_id: MarketId) -> Result<&mut Market> {
        let entry = self.entry_mut(market_id)?;
        require!(
            entry.membership == Membership::Active,
            BinaryOptionError::MarketNotActive
        );
        Ok(&mut entry.market)
    }

    pub(crate) fn set_membership(&mut self, market_id: MarketId, membership: Membership) -> Result<()> {
        let entry = self.entry_mut(market_id)?;
        let previous = entry.membership;
        entry.membership = membership;

        match previous {
            Membership::Active => self.active.retain(|id| *id != market_id),
            Membership::Matured => self.matured.retain(|id| *id != market_id),
            Membership::Destroyed => {}
        }
        match membership {
            Membership::Active => self.active.push(market_id),
            Membership::Matured => self.matured.push(market_id),
            Membership::Destroyed => {}
        }
        Ok(())
    }
}

fn page(ids: &[MarketId], index: usize, count: usize) -> Vec<MarketId> {
    ids.iter().skip(index).take(count).copied().collect()
}
