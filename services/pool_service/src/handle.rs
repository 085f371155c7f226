//! Client handle to a running pool actor

use crate::actor::PoolActor;
use crate::command::PoolCommand;
use crate::error::{Result, ServiceError};
use parking_lot::RwLock;
use std::sync::Arc;
use swap_amm::{
    AmmError, AmmPool, Asset, AssetLedger, DepositReceipt, Pool, PoolState, PoolView,
    SwapDirection, SwapPreview, SwapReceipt, WithdrawalReceipt,
};
use swap_types::{Address, Ratio};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Cloneable handle; writes go through the actor, reads use the published view
#[derive(Clone)]
pub struct PoolHandle {
    commands: mpsc::Sender<PoolCommand>,
    view: Arc<RwLock<PoolView>>,
    account: Address,
    base_ledger: Arc<dyn AssetLedger>,
    quote_ledger: Arc<dyn AssetLedger>,
}

impl PoolHandle {
    /// Move `pool` into a new actor task with a queue of `queue_size` commands
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn(pool: Pool, queue_size: usize) -> (Self, JoinHandle<()>) {
        let (commands, receiver) = mpsc::channel(queue_size.max(1));
        let view = Arc::new(RwLock::new(pool.view()));
        let handle = Self {
            commands,
            view: Arc::clone(&view),
            account: pool.account(),
            base_ledger: pool.asset_ledger(Asset::Base),
            quote_ledger: pool.asset_ledger(Asset::Quote),
        };
        let task = tokio::spawn(PoolActor::new(pool, receiver, view).run());
        (handle, task)
    }

    pub fn account(&self) -> Address {
        self.account
    }

    /// Last published state
    pub fn view(&self) -> PoolView {
        *self.view.read()
    }

    /// Tokens per ETH
    pub fn get_ratio(&self) -> std::result::Result<Ratio, AmmError> {
        self.view().spot_ratio()
    }

    pub fn current_reserves(&self) -> (u128, u128) {
        self.view().get_liquidity()
    }

    pub fn preview_swap(
        &self,
        direction: SwapDirection,
        input: u128,
        slippage_bps: u32,
    ) -> std::result::Result<SwapPreview, AmmError> {
        self.view().preview_swap(direction, input, slippage_bps)
    }

    /// Token balance
    pub fn balance_of(&self, owner: &Address) -> u128 {
        self.quote_ledger.balance_of(owner)
    }

    pub fn native_balance_of(&self, owner: &Address) -> u128 {
        self.base_ledger.balance_of(owner)
    }

    /// Let the pool pull up to `amount` tokens from `owner`
    pub fn approve(&self, owner: &Address, amount: u128) {
        self.quote_ledger.approve(owner, &self.account, amount);
    }

    pub async fn swap_eth_to_token(
        &self,
        caller: Address,
        value: u128,
        min_out: u128,
    ) -> Result<SwapReceipt> {
        self.swap(caller, SwapDirection::BaseToQuote, value, min_out)
            .await
    }

    pub async fn swap_token_to_eth(
        &self,
        caller: Address,
        amount: u128,
        min_out: u128,
    ) -> Result<SwapReceipt> {
        self.swap(caller, SwapDirection::QuoteToBase, amount, min_out)
            .await
    }

    pub async fn swap(
        &self,
        caller: Address,
        direction: SwapDirection,
        input: u128,
        min_output: u128,
    ) -> Result<SwapReceipt> {
        self.request(|reply| PoolCommand::Swap {
            caller,
            direction,
            input,
            min_output,
            reply,
        })
        .await?
        .map_err(ServiceError::from)
    }

    pub async fn add_liquidity(
        &self,
        caller: Address,
        token_amount: u128,
        eth_value: u128,
    ) -> Result<DepositReceipt> {
        self.request(|reply| PoolCommand::AddLiquidity {
            caller,
            token_amount,
            eth_value,
            reply,
        })
        .await?
        .map_err(ServiceError::from)
    }

    pub async fn remove_liquidity(&self, caller: Address, shares: u128) -> Result<WithdrawalReceipt> {
        self.request(|reply| PoolCommand::RemoveLiquidity {
            caller,
            shares,
            reply,
        })
        .await?
        .map_err(ServiceError::from)
    }

    /// Persistable state, taken between commands
    pub async fn snapshot(&self) -> Result<PoolState> {
        self.request(|reply| PoolCommand::Snapshot { reply }).await
    }

    pub async fn restore(&self, state: PoolState) -> Result<()> {
        self.request(|reply| PoolCommand::Restore { state, reply })
            .await?
            .map_err(ServiceError::from)
    }

    /// Stop the actor after the commands already queued; returns the final state
    pub async fn shutdown(&self) -> Result<PoolState> {
        self.request(|reply| PoolCommand::Shutdown { reply }).await
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> PoolCommand) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| ServiceError::PoolStopped)?;
        response.await.map_err(|_| ServiceError::PoolStopped)
    }
}
