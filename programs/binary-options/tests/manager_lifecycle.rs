use anchor_lang::error::Error;
use anchor_lang::prelude::*;

use binary_options::constants::UNIT;
use binary_options::utils::{Ledger, MemoryLedger, MemoryPriceFeed};
use binary_options::*;

const NOW: i64 = 1_000_000;
const HOUR: i64 = 60 * 60;
const DAY: i64 = 24 * HOUR;

fn assert_error<T: std::fmt::Debug>(result: Result<T>, expected: BinaryOptionError) {
    let code = |err: &Error| match err {
        Error::AnchorError(e) => Some(e.error_code_number),
        _ => None,
    };
    let err = result.expect_err("expected an error");
    let expected = Error::from(expected);
    assert_eq!(code(&err), code(&expected), "got {err:?}, expected {expected:?}");
}

struct World {
    manager: MarketManager,
    feed: MemoryPriceFeed,
    ledger: MemoryLedger,
    owner: Pubkey,
    fee_recipient: Pubkey,
}

impl World {
    fn new() -> Self {
        let owner = Pubkey::new_unique();
        let fee_recipient = Pubkey::new_unique();
        let config = ManagerConfig {
            fee_recipient,
            ..ManagerConfig::default()
        };

        let mut feed = MemoryPriceFeed::new();
        feed.set_price(eth(), 2_000 * UNIT, NOW);
        feed.set_price(OracleKey::from_symbol("sBTC"), 30_000 * UNIT, NOW);

        Self {
            manager: MarketManager::new(owner, config).unwrap(),
            feed,
            ledger: MemoryLedger::new(),
            owner,
            fee_recipient,
        }
    }

    /// Fresh account with `amount` approved for the manager to pull.
    fn creator(&mut self, amount: u128) -> Pubkey {
        let account = Pubkey::new_unique();
        self.ledger.mint(&account, amount).unwrap();
        self.ledger.approve(&account, &self.manager.address(), amount);
        account
    }

    /// Fresh account with `amount` approved for the market to pull.
    fn bidder(&mut self, market_id: MarketId, amount: u128) -> Pubkey {
        let account = Pubkey::new_unique();
        let market = self.manager.market(market_id).unwrap().address;
        self.ledger.mint(&account, amount).unwrap();
        self.ledger.approve(&account, &market, amount);
        account
    }

    fn create(&mut self, params: CreateMarketParams, from: Pubkey) -> Result<MarketId> {
        self.manager
            .create_market(params, from, &self.feed, &mut self.ledger, NOW)
    }
}

fn eth() -> OracleKey {
    OracleKey::from_symbol("sETH")
}

fn params(long_bid: u128, short_bid: u128) -> CreateMarketParams {
    CreateMarketParams {
        oracle_key: eth(),
        strike_price: 2_000 * UNIT,
        refunds_enabled: true,
        times: [NOW + DAY, NOW + 2 * DAY],
        bids: [long_bid, short_bid],
    }
}

#[test]
fn full_market_lifecycle() {
    let mut w = World::new();
    let creator = w.creator(5 * UNIT);
    let id = w.create(params(2 * UNIT, 3 * UNIT), creator).unwrap();
    let times = w.manager.market(id).unwrap().times;
    assert_eq!(times.expiry - times.maturity, w.manager.config().expiry_duration);

    let alice = w.bidder(id, UNIT);
    w.manager
        .bid(id, Side::Long, alice, UNIT, &mut w.ledger, NOW + HOUR)
        .unwrap();
    assert_eq!(w.manager.total_deposited(), 6 * UNIT);
    w.manager.check_total_deposited().unwrap();

    // bidding closed
    assert_error(
        w.manager.bid(id, Side::Short, alice, 0, &mut w.ledger, times.bidding_end),
        BinaryOptionError::BiddingClosed,
    );

    w.feed.set_price(eth(), 2_100 * UNIT, times.maturity);
    let transitioned = w
        .manager
        .transition_matured_markets(10, &w.feed, &mut w.ledger, times.maturity)
        .unwrap();
    assert_eq!(transitioned, vec![id]);
    assert_eq!(w.manager.membership(id).unwrap(), Membership::Matured);
    assert_eq!(w.manager.num_active_markets(), 0);
    assert_eq!(w.manager.matured_markets(0, 10), vec![id]);

    let market = w.manager.market(id).unwrap();
    assert_eq!(market.result(), Side::Long);
    // 0.8% pool fee and 0.2% creator fee of 6.0
    assert_eq!(w.ledger.balance_of(&w.fee_recipient), 48 * UNIT / 1_000);
    assert_eq!(w.ledger.balance_of(&creator), 12 * UNIT / 1_000);
    assert_eq!(w.manager.total_deposited(), 5_940_000_000_000_000_000);
    w.manager.check_total_deposited().unwrap();

    let now = times.maturity + HOUR;
    let alice_payout = w.manager.exercise(id, alice, &w.feed, &mut w.ledger, now).unwrap();
    let creator_payout = w.manager.exercise(id, creator, &w.feed, &mut w.ledger, now).unwrap();
    assert_eq!(alice_payout + creator_payout, 5_940_000_000_000_000_000);
    assert!(alice_payout < creator_payout);
    assert_eq!(w.manager.total_deposited(), 0);
    assert_error(
        w.manager.exercise(id, alice, &w.feed, &mut w.ledger, now),
        BinaryOptionError::NothingToExercise,
    );

    assert!(w
        .manager
        .expire_markets(10, &mut w.ledger, times.expiry - 1)
        .unwrap()
        .is_empty());
    let expired = w.manager.expire_markets(10, &mut w.ledger, times.expiry).unwrap();
    assert_eq!(expired, vec![id]);
    assert_eq!(w.manager.membership(id).unwrap(), Membership::Destroyed);
    assert_eq!(w.manager.num_matured_markets(), 0);
    assert!(w.manager.market(id).unwrap().destroyed);
    assert_eq!(w.manager.check_total_deposited().unwrap(), 0);
}

#[test]
fn unclaimed_funds_go_to_the_owner_on_expiry() {
    let mut w = World::new();
    let creator = w.creator(5 * UNIT);
    let id = w.create(params(2 * UNIT, 3 * UNIT), creator).unwrap();
    let times = w.manager.market(id).unwrap().times;

    w.feed.set_price(eth(), 1_000 * UNIT, times.maturity);
    w.manager
        .resolve_market(id, &w.feed, &mut w.ledger, times.maturity)
        .unwrap();

    w.manager.expire_markets(1, &mut w.ledger, times.expiry).unwrap();
    assert_eq!(w.ledger.balance_of(&w.owner), 4_950_000_000_000_000_000);
    assert_eq!(w.manager.total_deposited(), 0);
    w.manager.check_total_deposited().unwrap();
}

#[test]
fn creation_fee_goes_to_fee_recipient() {
    let mut w = World::new();
    let owner = w.owner;
    let mut config = w.manager.config().clone();
    config.creation_fee = UNIT;
    w.manager.set_config(&owner, config).unwrap();

    let creator = w.creator(6 * UNIT);
    let id = w.create(params(2 * UNIT, 3 * UNIT), creator).unwrap();

    assert_eq!(w.ledger.balance_of(&w.fee_recipient), UNIT);
    assert_eq!(w.ledger.balance_of(&creator), 0);
    let market = w.manager.market(id).unwrap();
    assert_eq!(w.ledger.balance_of(&market.address), 5 * UNIT);
    assert_eq!(w.ledger.balance_of(&w.manager.address()), 0);
    assert_eq!(w.manager.total_deposited(), 5 * UNIT);
}

/// Records every allowance-based pull before handing it to a `MemoryLedger`.
#[derive(Default)]
struct RecordingLedger {
    inner: MemoryLedger,
    pulls: Vec<(Pubkey, Pubkey, u128)>,
}

impl Ledger for RecordingLedger {
    fn balance_of(&self, account: &Pubkey) -> u128 {
        self.inner.balance_of(account)
    }

    fn allowance(&self, owner: &Pubkey, spender: &Pubkey) -> u128 {
        self.inner.allowance(owner, spender)
    }

    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<()> {
        self.inner.transfer(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        amount: u128,
    ) -> Result<()> {
        self.pulls.push((*from, *to, amount));
        self.inner.transfer_from(spender, from, to, amount)
    }
}

#[test]
fn creation_pulls_fee_and_bids_in_one_debit() {
    let w = World::new();
    let owner = w.owner;
    let mut manager = w.manager;
    let mut config = manager.config().clone();
    config.creation_fee = UNIT;
    manager.set_config(&owner, config).unwrap();

    let mut ledger = RecordingLedger::default();
    let creator = Pubkey::new_unique();
    ledger.inner.mint(&creator, 6 * UNIT).unwrap();
    ledger.inner.approve(&creator, &manager.address(), 6 * UNIT);

    let id = manager
        .create_market(params(2 * UNIT, 3 * UNIT), creator, &w.feed, &mut ledger, NOW)
        .unwrap();

    assert_eq!(ledger.pulls, vec![(creator, manager.address(), 6 * UNIT)]);
    assert_eq!(ledger.balance_of(&w.fee_recipient), UNIT);
    assert_eq!(ledger.balance_of(&manager.market(id).unwrap().address), 5 * UNIT);
    assert_eq!(ledger.balance_of(&manager.address()), 0);
    assert_eq!(ledger.allowance(&creator, &manager.address()), 0);
}

#[test]
fn unusable_oracle_keys_are_rejected() {
    let mut w = World::new();
    let creator = w.creator(5 * UNIT);

    let inverse = OracleKey::from_symbol("iETH");
    w.feed.set_price(inverse, 500 * UNIT, NOW);
    w.feed.set_inverse_pricing(inverse, true);
    let quote = OracleKey::from_symbol("sUSD");
    w.feed.set_price(quote, UNIT, NOW);

    for key in [OracleKey::from_symbol("sXYZ"), inverse, quote] {
        let params = CreateMarketParams {
            oracle_key: key,
            ..params(2 * UNIT, 3 * UNIT)
        };
        assert_error(w.create(params, creator), BinaryOptionError::InvalidKey);
    }
    assert_eq!(w.manager.markets_len(), 0);
}

#[test]
fn market_dates_are_bounded() {
    let mut w = World::new();
    let creator = w.creator(5 * UNIT);
    let max = w.manager.config().max_time_to_maturity;

    for times in [
        [NOW, NOW + DAY],
        [NOW + DAY, NOW + DAY],
        [NOW + 1, NOW + HOUR - 1],
        [NOW + DAY, NOW + max + 1],
    ] {
        let params = CreateMarketParams {
            times,
            ..params(2 * UNIT, 3 * UNIT)
        };
        assert_error(w.create(params, creator), BinaryOptionError::InvalidDates);
    }

    let params = CreateMarketParams {
        times: [NOW + 1, NOW + max],
        ..params(2 * UNIT, 3 * UNIT)
    };
    assert!(w.create(params, creator).is_ok());
}

#[test]
fn opening_bids_are_bounded() {
    let mut w = World::new();
    let creator = w.creator(5 * UNIT);

    assert_error(
        w.create(params(2 * UNIT, UNIT / 20), creator),
        BinaryOptionError::BidTooSmall,
    );
    assert_error(
        w.create(params(2_000_000 * UNIT, 3 * UNIT), creator),
        BinaryOptionError::BidTooLarge,
    );
    assert_error(
        w.create(params(UNIT / 2, UNIT), creator),
        BinaryOptionError::InsufficientCapital,
    );
}

#[test]
fn unapproved_creation_changes_nothing() {
    let mut w = World::new();
    let creator = Pubkey::new_unique();
    w.ledger.mint(&creator, 5 * UNIT).unwrap();

    assert_error(
        w.create(params(2 * UNIT, 3 * UNIT), creator),
        BinaryOptionError::InsufficientAllowance,
    );
    assert_eq!(w.ledger.balance_of(&creator), 5 * UNIT);
    assert_eq!(w.manager.markets_len(), 0);
    assert_eq!(w.manager.total_deposited(), 0);

    let poor = w.creator(4 * UNIT);
    assert_error(
        w.create(params(2 * UNIT, 3 * UNIT), poor),
        BinaryOptionError::InsufficientBalance,
    );
}

#[test]
fn transitions_run_in_bounded_batches() {
    let mut w = World::new();
    let creator = w.creator(25 * UNIT);
    let ids: Vec<MarketId> = (0..5)
        .map(|i| {
            let params = CreateMarketParams {
                times: [NOW + DAY, NOW + 2 * DAY + i * HOUR],
                ..params(2 * UNIT, 3 * UNIT)
            };
            w.create(params, creator).unwrap()
        })
        .collect();

    assert_eq!(w.manager.active_markets(1, 2), vec![ids[1], ids[2]]);
    assert_eq!(w.manager.active_markets(4, 10), vec![ids[4]]);
    assert!(w.manager.active_markets(5, 10).is_empty());

    let now = NOW + 2 * DAY + 2 * HOUR;
    w.feed.set_price(eth(), 2_500 * UNIT, now);

    let first = w
        .manager
        .transition_matured_markets(2, &w.feed, &mut w.ledger, now)
        .unwrap();
    assert_eq!(first, vec![ids[0], ids[1]]);
    let second = w
        .manager
        .transition_matured_markets(2, &w.feed, &mut w.ledger, now)
        .unwrap();
    assert_eq!(second, vec![ids[2]]);
    assert!(w
        .manager
        .transition_matured_markets(2, &w.feed, &mut w.ledger, now)
        .unwrap()
        .is_empty());

    assert_eq!(w.manager.active_markets(0, 10), vec![ids[3], ids[4]]);
    assert_eq!(w.manager.matured_markets(0, 10), vec![ids[0], ids[1], ids[2]]);
    w.manager.check_total_deposited().unwrap();
}

#[test]
fn stale_feed_fails_the_whole_batch() {
    let mut w = World::new();
    let creator = w.creator(10 * UNIT);
    let eth_id = w.create(params(2 * UNIT, 3 * UNIT), creator).unwrap();
    let btc_params = CreateMarketParams {
        oracle_key: OracleKey::from_symbol("sBTC"),
        strike_price: 30_000 * UNIT,
        ..params(2 * UNIT, 3 * UNIT)
    };
    let btc_id = w.create(btc_params, creator).unwrap();
    let maturity = w.manager.market(eth_id).unwrap().times.maturity;

    // sBTC still carries its creation-time update
    w.feed.set_price(eth(), 2_500 * UNIT, maturity);
    assert_error(
        w.manager
            .transition_matured_markets(10, &w.feed, &mut w.ledger, maturity),
        BinaryOptionError::StalePrice,
    );
    assert_eq!(w.manager.active_markets(0, 10), vec![eth_id, btc_id]);
    assert!(!w.manager.market(eth_id).unwrap().resolution.resolved);
    assert_eq!(w.manager.total_deposited(), 10 * UNIT);
    assert_eq!(w.ledger.balance_of(&w.fee_recipient), 0);
}

#[test]
fn exercise_resolves_a_matured_market() {
    let mut w = World::new();
    let creator = w.creator(5 * UNIT);
    let id = w.create(params(2 * UNIT, 3 * UNIT), creator).unwrap();
    let maturity = w.manager.market(id).unwrap().times.maturity;

    w.feed.set_price(eth(), 1_500 * UNIT, maturity);
    let stranger = Pubkey::new_unique();
    assert_error(
        w.manager.exercise(id, stranger, &w.feed, &mut w.ledger, maturity),
        BinaryOptionError::NothingToExercise,
    );
    assert_eq!(w.manager.membership(id).unwrap(), Membership::Active);

    let payout = w
        .manager
        .exercise(id, creator, &w.feed, &mut w.ledger, maturity)
        .unwrap();
    assert_eq!(payout, 4_950_000_000_000_000_000);
    assert_eq!(w.manager.membership(id).unwrap(), Membership::Matured);
    assert_eq!(w.manager.market(id).unwrap().result(), Side::Short);
    w.manager.check_total_deposited().unwrap();
}

#[test]
fn refunds_keep_the_manager_total_in_step() {
    let mut w = World::new();
    let creator = w.creator(5 * UNIT);
    let id = w.create(params(2 * UNIT, 3 * UNIT), creator).unwrap();
    let bob = w.bidder(id, 2 * UNIT);

    w.manager
        .bid(id, Side::Short, bob, 2 * UNIT, &mut w.ledger, NOW)
        .unwrap();
    let refund = w
        .manager
        .refund(id, Side::Short, bob, UNIT, &mut w.ledger, NOW)
        .unwrap();

    assert_eq!(refund, 950_000_000_000_000_000);
    assert_eq!(w.manager.total_deposited(), 7 * UNIT - refund);
    w.manager.check_total_deposited().unwrap();

    let market = w.manager.market(id).unwrap();
    let (long, short) = market.total_bids();
    assert_eq!(market.deposited, long + short + market.retained_refund_fees);
}

#[test]
fn paused_manager_rejects_market_operations() {
    let mut w = World::new();
    let owner = w.owner;
    let creator = w.creator(10 * UNIT);
    let id = w.create(params(2 * UNIT, 3 * UNIT), creator).unwrap();
    let alice = w.bidder(id, UNIT);

    w.manager.set_paused(&owner, true).unwrap();
    assert_error(
        w.create(params(2 * UNIT, 3 * UNIT), creator),
        BinaryOptionError::ManagerPaused,
    );
    assert_error(
        w.manager.bid(id, Side::Long, alice, UNIT, &mut w.ledger, NOW),
        BinaryOptionError::ManagerPaused,
    );

    w.manager.set_paused(&owner, false).unwrap();
    w.manager.set_market_creation_enabled(&owner, false).unwrap();
    assert_error(
        w.create(params(2 * UNIT, 3 * UNIT), creator),
        BinaryOptionError::MarketCreationDisabled,
    );
    w.manager
        .bid(id, Side::Long, alice, UNIT, &mut w.ledger, NOW)
        .unwrap();
}

#[test]
fn config_changes_leave_existing_markets_alone() {
    let mut w = World::new();
    let owner = w.owner;
    let creator = w.creator(10 * UNIT);
    let first = w.create(params(2 * UNIT, 3 * UNIT), creator).unwrap();

    let mut config = w.manager.config().clone();
    config.pool_fee = UNIT / 100;
    w.manager.set_config(&owner, config).unwrap();
    let second = w.create(params(2 * UNIT, 3 * UNIT), creator).unwrap();

    assert_eq!(w.manager.market(first).unwrap().fees.pool_fee, 8 * UNIT / 1_000);
    assert_eq!(w.manager.market(second).unwrap().fees.pool_fee, UNIT / 100);
}

#[test]
fn expiries_run_in_bounded_batches() {
    let mut w = World::new();
    let creator = w.creator(15 * UNIT);
    let ids: Vec<MarketId> = (0..3)
        .map(|_| w.create(params(2 * UNIT, 3 * UNIT), creator).unwrap())
        .collect();
    let times = w.manager.market(ids[0]).unwrap().times;

    w.feed.set_price(eth(), 2_500 * UNIT, times.maturity);
    w.manager
        .transition_matured_markets(10, &w.feed, &mut w.ledger, times.maturity)
        .unwrap();
    assert_eq!(w.manager.matured_markets(0, 10), ids);

    let first = w.manager.expire_markets(2, &mut w.ledger, times.expiry).unwrap();
    assert_eq!(first, vec![ids[0], ids[1]]);
    assert_eq!(w.manager.matured_markets(0, 10), vec![ids[2]]);
    assert_eq!(w.manager.membership(ids[1]).unwrap(), Membership::Destroyed);
    assert_eq!(w.manager.membership(ids[2]).unwrap(), Membership::Matured);
    w.manager.check_total_deposited().unwrap();

    let second = w.manager.expire_markets(2, &mut w.ledger, times.expiry).unwrap();
    assert_eq!(second, vec![ids[2]]);
    assert!(w
        .manager
        .expire_markets(2, &mut w.ledger, times.expiry)
        .unwrap()
        .is_empty());

    assert_eq!(w.manager.num_matured_markets(), 0);
    assert_eq!(w.manager.total_deposited(), 0);
    assert_eq!(w.manager.check_total_deposited().unwrap(), 0);
    // 3 × 5.0 deposited, less the 1% fees remitted at resolution
    assert_eq!(w.ledger.balance_of(&w.owner), 14_850_000_000_000_000_000);
}

#[test]
fn manager_state_is_reported_through_accessors() {
    let mut w = World::new();
    let owner = w.owner;
    let nominee = Pubkey::new_unique();

    assert_eq!(w.manager.owner(), owner);
    assert_eq!(w.manager.address(), MarketManager::manager_address());
    assert_eq!(w.manager.config().fee_recipient, w.fee_recipient);
    assert!(!w.manager.is_paused());
    assert!(w.manager.market_creation_enabled());

    w.manager.nominate_owner(&owner, nominee).unwrap();
    assert_eq!(w.manager.nominated_owner(), Some(nominee));
    w.manager.accept_ownership(&nominee).unwrap();
    assert_eq!(w.manager.owner(), nominee);
    assert_eq!(w.manager.nominated_owner(), None);

    w.manager.set_paused(&nominee, true).unwrap();
    w.manager.set_market_creation_enabled(&nominee, false).unwrap();
    assert!(w.manager.is_paused());
    assert!(!w.manager.market_creation_enabled());
}
