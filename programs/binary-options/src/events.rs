use anchor_lang::prelude::*;

use crate::state::{ManagerConfig, OracleKey, Side};

// --- MARKET LIFECYCLE ---
#[event]
pub struct MarketCreated {
    pub market: Pubkey,
    pub market_id: u64,
    pub creator: Pubkey,
    pub oracle_key: OracleKey,
    pub strike_price: u128,
    pub refunds_enabled: bool,
    pub bidding_end: i64,
    pub maturity: i64,
    pub expiry: i64,
    pub long_bid: u128,
    pub short_bid: u128,
    pub creation_fee: u128,
    pub pool_fee: u128,
    pub creator_fee: u128,
    pub refund_fee: u128,
}

#[event]
pub struct MarketResolved {
    pub market: Pubkey,
    pub market_id: u64,
    pub result: Side,
    pub oracle_price: u128,
    pub oracle_updated_at: i64,
    pub deposited: u128,
    pub pool_fees: u128,
    pub creator_fees: u128,
}

#[event]
pub struct MarketDestroyed {
    pub market: Pubkey,
    pub market_id: u64,
    pub beneficiary: Pubkey,
    pub residual: u128,
    pub swept: u128,
}

#[event]
pub struct MarketsTransitioned {
    pub market_ids: Vec<u64>,
    pub remaining_active: u64,
}

#[event]
pub struct MarketsExpired {
    pub market_ids: Vec<u64>,
    pub remaining_matured: u64,
}

// --- BIDDING ---
#[event]
pub struct BidPlaced {
    pub market: Pubkey,
    pub market_id: u64,
    pub side: Side,
    pub account: Pubkey,
    pub amount: u128,
    pub deposited: u128,
}

#[event]
pub struct Refunded {
    pub market: Pubkey,
    pub market_id: u64,
    pub side: Side,
    pub account: Pubkey,
    pub refund: u128,
    pub fee: u128,
    pub deposited: u128,
}

#[event]
pub struct PricesUpdated {
    pub market: Pubkey,
    pub market_id: u64,
    pub long_price: u128,
    pub short_price: u128,
}

// --- OPTIONS ---
#[event]
pub struct OptionsClaimed {
    pub market: Pubkey,
    pub market_id: u64,
    pub account: Pubkey,
    pub long_options: u128,
    pub short_options: u128,
}

#[event]
pub struct OptionsExercised {
    pub market: Pubkey,
    pub market_id: u64,
    pub account: Pubkey,
    pub payout: u128,
    pub long_burned: u128,
    pub short_burned: u128,
}

#[event]
pub struct OptionsTransferred {
    pub market: Pubkey,
    pub market_id: u64,
    pub side: Side,
    pub from: Pubkey,
    pub to: Pubkey,
    pub amount: u128,
}

// --- MANAGER & ADMIN ---
#[event]
pub struct ManagerConfigUpdated {
    pub config: ManagerConfig,
}

#[event]
pub struct PauseChanged {
    pub is_paused: bool,
}

#[event]
pub struct MarketCreationEnabledChanged {
    pub enabled: bool,
}

#[event]
pub struct OwnerNominated {
    pub nominee: Pubkey,
}

#[event]
pub struct OwnershipTransferred {
    pub previous_owner: Pubkey,
    pub new_owner: Pubkey,
}
