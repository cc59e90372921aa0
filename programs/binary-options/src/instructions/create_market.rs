use anchor_lang::prelude::*;

use crate::errors::BinaryOptionError;
use crate::events::{MarketCreated, PricesUpdated};
use crate::state::*;
use crate::utils::fixed_math::add;
use crate::utils::ledger::{ensure_can_debit, Ledger};
use crate::utils::price_feed::PriceFeed;

/// Parameters for creating a new binary option market.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreateMarketParams {
    /// Price feed the market settles against.
    pub oracle_key: OracleKey,

    pub strike_price: u128,

    pub refunds_enabled: bool,

    /// `[bidding_end, maturity]`. Expiry follows from the manager's expiry duration.
    pub times: [i64; 2],

    /// `[long, short]` opening bids, paid by the creator.
    pub bids: [u128; 2],
}

/// Per-market values that vary between instances.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitializeMarket {
    pub market_id: u64,
    pub creator: Pubkey,
    pub oracle_key: OracleKey,
    pub strike_price: u128,
    pub refunds_enabled: bool,
    pub times: Times,
    pub long_bid: u128,
    pub short_bid: u128,
}

/// Configuration shared by every market the manager deploys. Cloned into
/// each new market and then initialized with that market's values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketTemplate {
    pub fees: Fees,
    pub creator_limits: CreatorLimits,
}

impl MarketTemplate {
    pub fn instantiate(&self, params: InitializeMarket) -> Result<Market> {
        self.fees.validate()?;
        params.times.validate()?;
        self.creator_limits.check(params.long_bid, params.short_bid)?;

        let deposited = add(params.long_bid, params.short_bid)?;
        let prices = Prices::compute(params.long_bid, params.short_bid, deposited, &self.fees)?;

        let mut long = BidPosition::default();
        long.bid(params.creator, params.long_bid)?;
        let mut short = BidPosition::default();
        short.bid(params.creator, params.short_bid)?;

        Ok(Market {
            market_id: params.market_id,
            address: Market::address_for(&params.creator, params.market_id),
            creator: params.creator,
            oracle_key: params.oracle_key,
            strike_price: params.strike_price,
            refunds_enabled: params.refunds_enabled,
            times: params.times,
            fees: self.fees,
            creator_limits: self.creator_limits,
            long,
            short,
            prices,
            deposited,
            retained_refund_fees: 0,
            resolution: Resolution::default(),
            destroyed: false,
        })
    }
}

impl MarketManager {
    /// Validates the request, charges the creation fee, deploys the market
    /// with the creator's opening bids and registers it as active.
    pub fn create_market(
        &mut self,
        params: CreateMarketParams,
        from: Pubkey,
        feed: &impl PriceFeed,
        ledger: &mut impl Ledger,
        now: i64,
    ) -> Result<MarketId> {
        self.require_not_paused()?;
        require!(
            self.market_creation_enabled,
            BinaryOptionError::MarketCreationDisabled
        );
        require!(
            self.is_valid_key(feed, &params.oracle_key),
            BinaryOptionError::InvalidKey
        );

        let times = self.market_times(params.times, now)?;

        let [long_bid, short_bid] = params.bids;
        for bid in [long_bid, short_bid] {
            require!(bid >= self.config.min_bid, BinaryOptionError::BidTooSmall);
            require!(bid <= self.config.max_bid, BinaryOptionError::BidTooLarge);
        }

        let initial_deposit = add(long_bid, short_bid)?;
        let total_deposited = add(self.total_deposited, initial_deposit)?;
        let creation_fee = self.config.creation_fee;
        let debit = add(creation_fee, initial_deposit)?;
        ensure_can_debit(&*ledger, &self.address, &from, debit)?;

        let market_id = self.markets.len() as MarketId;
        let market = self.config.market_template().instantiate(InitializeMarket {
            market_id,
            creator: from,
            oracle_key: params.oracle_key,
            strike_price: params.strike_price,
            refunds_enabled: params.refunds_enabled,
            times,
            long_bid,
            short_bid,
        })?;

        // Single pull from the creator; the manager forwards both parts.
        ledger.transfer_from(&self.address, &from, &self.address, debit)?;
        if creation_fee > 0 {
            ledger.transfer(&self.address, &self.config.fee_recipient, creation_fee)?;
        }
        ledger.transfer(&self.address, &market.address, initial_deposit)?;

        emit!(MarketCreated {
            market: market.address,
            market_id,
            creator: from,
            oracle_key: market.oracle_key,
            strike_price: market.strike_price,
            refunds_enabled: market.refunds_enabled,
            bidding_end: times.bidding_end,
            maturity: times.maturity,
            expiry: times.expiry,
            long_bid,
            short_bid,
            creation_fee,
            pool_fee: market.fees.pool_fee,
            creator_fee: market.fees.creator_fee,
            refund_fee: market.fees.refund_fee,
        });
        emit!(PricesUpdated {
            market: market.address,
            market_id,
            long_price: market.prices.long,
            short_price: market.prices.short,
        });

        msg!(
            "Market #{} created: {} strike {} | bidding end {} maturity {} expiry {} | long {} short {}",
            market_id,
            market.oracle_key,
            market.strike_price,
            times.bidding_end,
            times.maturity,
            times.expiry,
            long_bid,
            short_bid,
        );

        self.markets.push(MarketEntry {
            market,
            membership: Membership::Active,
        });
        self.active.push(market_id);
        self.total_deposited = total_deposited;

        Ok(market_id)
    }

    fn market_times(&self, [bidding_end, maturity]: [i64; 2], now: i64) -> Result<Times> {
        require!(now < bidding_end, BinaryOptionError::InvalidDates);
        require!(bidding_end < maturity, BinaryOptionError::InvalidDates);

        let time_to_maturity = maturity
            .checked_sub(now)
            .ok_or(BinaryOptionError::InvalidDates)?;
        require!(
            time_to_maturity >= self.config.min_time_to_maturity
                && time_to_maturity <= self.config.max_time_to_maturity,
            BinaryOptionError::InvalidDates
        );

        let expiry = maturity
            .checked_add(self.config.expiry_duration)
            .ok_or(BinaryOptionError::InvalidDates)?;

        let times = Times {
            bidding_end,
            maturity,
            expiry,
        };
        times.validate()?;
        Ok(times)
    }
}
