/// Fixed-point precision: 18 decimal places.
pub const DECIMALS: u32 = 18;
pub const UNIT: u128 = 10u128.pow(DECIMALS);
pub const HALF_UNIT: u128 = UNIT / 2;

pub const SEED_MARKET: &[u8] = b"market";
pub const SEED_MANAGER: &[u8] = b"manager";

/// Quote currency; prices are denominated in it, so it is never a valid oracle key.
pub const QUOTE_CURRENCY_KEY: &str = "sUSD";

// Manager defaults
pub const DEFAULT_POOL_FEE: u128 = 8 * UNIT / 1_000; // 0.8%
pub const DEFAULT_CREATOR_FEE: u128 = 2 * UNIT / 1_000; // 0.2%
pub const DEFAULT_REFUND_FEE: u128 = 5 * UNIT / 100; // 5%
pub const DEFAULT_CREATION_FEE: u128 = 0;
pub const DEFAULT_MIN_BID: u128 = UNIT / 10;
pub const DEFAULT_MAX_BID: u128 = 1_000_000 * UNIT;
pub const DEFAULT_CAPITAL_REQUIREMENT: u128 = 2 * UNIT;
pub const DEFAULT_SKEW_LIMIT: u128 = 5 * UNIT / 100;
pub const DEFAULT_MIN_TIME_TO_MATURITY: i64 = 60 * 60;
pub const DEFAULT_MAX_TIME_TO_MATURITY: i64 = 365 * 24 * 60 * 60;
pub const DEFAULT_EXPIRY_DURATION: i64 = 26 * 7 * 24 * 60 * 60;
pub const DEFAULT_MAX_ORACLE_PRICE_AGE: i64 = 120 * 60;
