//! Commands processed by the pool actor

use swap_amm::{
    AmmError, DepositReceipt, PoolState, SwapDirection, SwapReceipt, WithdrawalReceipt,
};
use swap_types::Address;
use tokio::sync::oneshot;

type Reply<T> = oneshot::Sender<Result<T, AmmError>>;

/// State-changing requests, applied one at a time in arrival order
#[derive(Debug)]
pub(crate) enum PoolCommand {
    Swap {
        caller: Address,
        direction: SwapDirection,
        input: u128,
        min_output: u128,
        reply: Reply<SwapReceipt>,
    },
    AddLiquidity {
        caller: Address,
        token_amount: u128,
        eth_value: u128,
        reply: Reply<DepositReceipt>,
    },
    RemoveLiquidity {
        caller: Address,
        shares: u128,
        reply: Reply<WithdrawalReceipt>,
    },
    Snapshot {
        reply: oneshot::Sender<PoolState>,
    },
    Restore {
        state: PoolState,
        reply: Reply<()>,
    },
    Shutdown {
        reply: oneshot::Sender<PoolState>,
    },
}
