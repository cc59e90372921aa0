use anchor_lang::error::Error;
use anchor_lang::prelude::*;

use crate::constants::UNIT;
use crate::errors::BinaryOptionError;
use crate::instructions::{InitializeMarket, MarketTemplate};
use crate::state::*;
use crate::utils::{MemoryLedger, MemoryPriceFeed};

pub const BIDDING_END: i64 = 1_000;
pub const MATURITY: i64 = 2_000;
pub const EXPIRY: i64 = 3_000;
pub const MAX_PRICE_AGE: i64 = 100;

fn error_code(err: &Error) -> Option<u32> {
    match err {
        Error::AnchorError(e) => Some(e.error_code_number),
        _ => None,
    }
}

/// Anchor errors carry their source location, so compare codes only.
pub fn assert_error<T: std::fmt::Debug>(result: Result<T>, expected: BinaryOptionError) {
    let err = result.expect_err("expected an error");
    let expected = Error::from(expected);
    assert_eq!(
        error_code(&err),
        error_code(&expected),
        "got {err:?}, expected {expected:?}"
    );
}

/// 0.8% pool fee, 0.2% creator fee, 5% refund fee.
pub fn template() -> MarketTemplate {
    MarketTemplate {
        fees: Fees {
            pool_fee: 8 * UNIT / 1_000,
            creator_fee: 2 * UNIT / 1_000,
            refund_fee: 5 * UNIT / 100,
        },
        creator_limits: CreatorLimits {
            capital_requirement: UNIT,
            skew_limit: 5 * UNIT / 100,
        },
    }
}

pub struct Fixture {
    pub market: Market,
    pub ledger: MemoryLedger,
    pub feed: MemoryPriceFeed,
    pub creator: Pubkey,
    pub fee_recipient: Pubkey,
}

impl Fixture {
    /// Mints `amount` to a fresh account and lets the market pull it.
    pub fn funded_account(&mut self, amount: u128) -> Pubkey {
        let account = Pubkey::new_unique();
        self.ledger.mint(&account, amount).unwrap();
        self.ledger.approve(&account, &self.market.address, amount);
        account
    }

    pub fn set_final_price(&mut self, price: u128, updated_at: i64) {
        self.feed.set_price(self.market.oracle_key, price, updated_at);
    }

    pub fn resolve(&mut self) -> Result<u128> {
        self.market.resolve(
            &self.feed,
            &mut self.ledger,
            &self.fee_recipient,
            MAX_PRICE_AGE,
            MATURITY,
        )
    }
}

/// Strike 1.0 market on `sETH` with the creator's opening bids already in custody.
pub fn fixture(long_bid: u128, short_bid: u128) -> Fixture {
    let creator = Pubkey::new_unique();
    let oracle_key = OracleKey::from_symbol("sETH");
    let market = template()
        .instantiate(InitializeMarket {
            market_id: 0,
            creator,
            oracle_key,
            strike_price: UNIT,
            refunds_enabled: true,
            times: Times {
                bidding_end: BIDDING_END,
                maturity: MATURITY,
                expiry: EXPIRY,
            },
            long_bid,
            short_bid,
        })
        .unwrap();

    let mut ledger = MemoryLedger::new();
    ledger.mint(&market.address, market.deposited).unwrap();

    let mut feed = MemoryPriceFeed::new();
    feed.set_price(oracle_key, UNIT, 0);

    Fixture {
        market,
        ledger,
        feed,
        creator,
        fee_recipient: Pubkey::new_unique(),
    }
}
