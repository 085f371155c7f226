//! End-to-end pool scenarios over in-memory ledgers

use std::sync::Arc;
use swap_amm::{
    AmmError, AmmPool, AssetLedger, Pool, PoolEvent, PoolSettings, Reserves, Stateful,
    SwapDirection, TokenLedger, DEFAULT_SLIPPAGE_BPS,
};
use swap_types::{parse_ether, Address};

const POOL: u64 = 0xdead;

fn addr(n: u64) -> Address {
    Address::from_low_u64_be(n)
}

struct Market {
    pool: Pool,
    eth: Arc<TokenLedger>,
    token: Arc<TokenLedger>,
}

impl Market {
    fn empty() -> Self {
        let eth = Arc::new(TokenLedger::native());
        let token = Arc::new(TokenLedger::new("ImuLL", 18));
        let pool = Pool::new(PoolSettings::new(addr(POOL)), eth.clone(), token.clone());
        Self { pool, eth, token }
    }

    /// Pool seeded with (1000, 2000) by account 1
    fn seeded() -> Self {
        let mut market = Self::empty();
        market.fund(1, 1000, 2000);
        market.pool.add_liquidity(&addr(1), 2000, 1000).unwrap();
        market
    }

    fn fund(&mut self, who: u64, eth: u128, tokens: u128) {
        self.eth.mint(&addr(who), eth).unwrap();
        self.token.mint(&addr(who), tokens).unwrap();
        self.pool.approve(&addr(who), &addr(POOL), tokens);
    }
}

#[test]
fn swap_100_eth_units_returns_181_tokens() {
    let mut market = Market::seeded();
    market.fund(2, 100, 0);

    let receipt = market.pool.swap_eth_to_token(&addr(2), 100, 0).unwrap();

    assert_eq!(receipt.output, 181);
    assert_eq!(market.pool.current_reserves(), (1100, 1819));
    assert_eq!(
        receipt.event,
        PoolEvent::Swap {
            trader: addr(2),
            direction: SwapDirection::BaseToQuote,
            input: 100,
            output: 181,
            reserves: Reserves::new(1100, 1819),
        }
    );
}

#[test]
fn deposit_is_trimmed_to_pool_ratio() {
    let mut market = Market::seeded();
    market.fund(3, 100, 500);
    let total_before = market.pool.total_shares();

    let receipt = market.pool.add_liquidity(&addr(3), 500, 100).unwrap();

    assert_eq!((receipt.base, receipt.quote), (100, 200));
    assert_eq!(receipt.shares, total_before * 100 / 1000);
    assert_eq!(market.pool.current_reserves(), (1100, 2200));
    // excess tokens and allowance stay with the depositor
    assert_eq!(market.token.balance_of(&addr(3)), 300);
    assert_eq!(market.pool.allowance(&addr(3), &addr(POOL)), 300);
}

#[test]
fn zero_input_swap_is_rejected() {
    let mut market = Market::seeded();
    assert_eq!(
        market.pool.swap_eth_to_token(&addr(2), 0, 0),
        Err(AmmError::InsufficientInput)
    );
    assert_eq!(
        market.pool.swap_token_to_eth(&addr(2), 0, 0),
        Err(AmmError::InsufficientInput)
    );
}

#[test]
fn zero_deposit_into_empty_pool_is_rejected() {
    let mut market = Market::empty();
    assert_eq!(
        market.pool.add_liquidity(&addr(1), 0, 0),
        Err(AmmError::ZeroDeposit)
    );
    assert_eq!(market.pool.total_shares(), 0);
}

#[test]
fn ratio_is_stable_between_commits() {
    let mut market = Market::seeded();
    let first = market.pool.get_ratio().unwrap();
    assert_eq!(first, market.pool.get_ratio().unwrap());

    market.fund(2, 100, 0);
    market.pool.swap_eth_to_token(&addr(2), 100, 0).unwrap();
    let after = market.pool.get_ratio().unwrap();
    assert_eq!(after.cmp_value(first), std::cmp::Ordering::Less);
}

#[test]
fn slippage_floor_from_preview_is_honored() {
    let mut market = Market::seeded();
    market.fund(2, 100, 0);

    let preview = market
        .pool
        .preview_swap(SwapDirection::BaseToQuote, 100, DEFAULT_SLIPPAGE_BPS)
        .unwrap();
    let receipt = market
        .pool
        .swap_eth_to_token(&addr(2), 100, preview.minimum_output)
        .unwrap();
    assert_eq!(receipt.output, preview.expected_output);
}

#[test]
fn front_run_swap_trips_slippage_check() {
    let mut market = Market::seeded();
    market.fund(2, 100, 0);
    market.fund(5, 500, 0);

    let preview = market
        .pool
        .preview_swap(SwapDirection::BaseToQuote, 100, DEFAULT_SLIPPAGE_BPS)
        .unwrap();
    market.pool.swap_eth_to_token(&addr(5), 500, 0).unwrap();
    let reserves = market.pool.current_reserves();

    let err = market
        .pool
        .swap_eth_to_token(&addr(2), 100, preview.minimum_output)
        .unwrap_err();
    assert!(matches!(err, AmmError::SlippageExceeded { .. }));
    assert_eq!(market.pool.current_reserves(), reserves);
    assert_eq!(market.eth.balance_of(&addr(2)), 100);
}

#[test]
fn ether_denominated_pool() {
    let mut market = Market::empty();
    let one_eth = parse_ether("1").unwrap();
    let tokens = parse_ether("2500").unwrap();
    market.fund(1, one_eth, tokens);
    market.pool.add_liquidity(&addr(1), tokens, one_eth).unwrap();

    let ratio = market.pool.get_ratio().unwrap();
    assert_eq!(ratio.floor(), 2500);
    assert_eq!(ratio.to_fixed_point(), Some(2500 * 1_000_000_000_000_000_000));

    let tenth = parse_ether("0.1").unwrap();
    market.fund(2, tenth, 0);
    let receipt = market.pool.swap_eth_to_token(&addr(2), tenth, 0).unwrap();
    // below the 250 tokens a zero-fee, zero-impact trade would give
    assert!(receipt.output < parse_ether("250").unwrap());
    assert!(receipt.output > parse_ether("226").unwrap());
}

#[test]
fn withdrawal_after_trading_pays_accrued_fees() {
    let mut market = Market::seeded();
    market.fund(2, 100, 0);
    let received = market
        .pool
        .swap_eth_to_token(&addr(2), 100, 0)
        .unwrap()
        .output;
    market
        .pool
        .approve(&addr(2), &addr(POOL), received);
    market
        .pool
        .swap_token_to_eth(&addr(2), received, 0)
        .unwrap();

    let shares = market.pool.shares_of(&addr(1));
    let receipt = market.pool.remove_liquidity(&addr(1), shares).unwrap();
    assert!(receipt.base >= 1000);
    assert!(receipt.quote >= 2000);
    assert_eq!(market.pool.current_reserves(), (0, 0));
}

#[test]
fn snapshot_survives_a_restart() {
    let mut market = Market::seeded();
    market.fund(2, 100, 0);
    market.pool.swap_eth_to_token(&addr(2), 100, 0).unwrap();
    let bytes = market.pool.snapshot().unwrap();

    let mut restarted = Pool::new(
        PoolSettings::new(addr(POOL)),
        market.eth.clone(),
        market.token.clone(),
    );
    restarted.restore(&bytes).unwrap();

    assert_eq!(restarted.view(), market.pool.view());
    assert_eq!(
        restarted.get_amount_out(SwapDirection::QuoteToBase, 50),
        market.pool.get_amount_out(SwapDirection::QuoteToBase, 50)
    );
}

#[test]
fn pool_account_cannot_trade_or_deposit_against_itself() {
    let mut market = Market::seeded();

    for direction in [SwapDirection::BaseToQuote, SwapDirection::QuoteToBase] {
        assert!(matches!(
            market.pool.execute_swap(&addr(POOL), direction, 100, 0),
            Err(AmmError::Unauthorized { granted: 0, .. })
        ));
    }
    assert!(matches!(
        market.pool.add_liquidity(&addr(POOL), 200, 100),
        Err(AmmError::Unauthorized { granted: 0, .. })
    ));

    assert_eq!(market.pool.current_reserves(), (1000, 2000));
    assert_eq!(market.pool.total_shares(), 1414);
    assert_eq!(market.pool.sequence(), 1);
    assert_eq!(market.eth.balance_of(&addr(POOL)), 1000);
    assert_eq!(market.token.balance_of(&addr(POOL)), 2000);
}
