//! Pool facade
//!
//! [`Pool`] is the surface the frontend talks to: `getRatio`,
//! `swapEthToToken`, `swapTokenToEth`, `addLiquidity` and
//! `removeLiquidity`. It owns the reserve ledger and the liquidity book and
//! borrows the external asset ledgers through the custody guard. Every
//! state-changing method takes `&mut self`, so commits are serialized by
//! ownership.

use crate::asset::{Asset, SwapDirection};
use crate::custody::CustodyGuard;
use crate::error::{AmmError, Result};
use crate::events::PoolEvent;
use crate::fee::FeeRate;
use crate::ledger::AssetLedger;
use crate::liquidity::{DepositQuote, LiquidityBook};
use crate::pool_traits::AmmPool;
use crate::pricing::PricingEngine;
use crate::reserves::{ReserveLedger, Reserves};
use crate::state::{PoolState, Stateful};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use swap_types::{Address, Ratio};
use tracing::{debug, error, info};

/// Fixed parameters of a pool instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// Account that holds the pool's funds and receives allowances
    pub account: Address,
    pub fee: FeeRate,
    /// Largest decrease of `k` a swap commit may cause
    pub rounding_tolerance: u128,
}

impl PoolSettings {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            fee: FeeRate::DEFAULT,
            rounding_tolerance: 0,
        }
    }
}

/// Consistent read-only copy of pool state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolView {
    pub reserves: Reserves,
    pub total_shares: u128,
    pub fee: FeeRate,
    pub sequence: u64,
}

impl PoolView {
    /// Integer `getRatio`, `None` on an empty pool
    pub fn ratio_floor(&self) -> Option<u128> {
        self.spot_ratio().ok().map(Ratio::floor)
    }
}

impl AmmPool for PoolView {
    fn reserves(&self) -> Reserves {
        self.reserves
    }

    fn fee(&self) -> FeeRate {
        self.fee
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReceipt {
    pub input: u128,
    pub output: u128,
    pub reserves: Reserves,
    pub event: PoolEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositReceipt {
    /// Accepted ETH, at most the attached value
    pub base: u128,
    /// Accepted tokens, at most the requested amount
    pub quote: u128,
    pub shares: u128,
    pub reserves: Reserves,
    pub event: PoolEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalReceipt {
    pub base: u128,
    pub quote: u128,
    pub shares: u128,
    pub reserves: Reserves,
    pub event: PoolEvent,
}

pub struct Pool {
    settings: PoolSettings,
    pricing: PricingEngine,
    reserves: ReserveLedger,
    liquidity: LiquidityBook,
    custody: CustodyGuard,
    sequence: u64,
}

impl Pool {
    /// Empty pool over the ETH ledger (`base_ledger`) and token ledger (`quote_ledger`)
    pub fn new(
        settings: PoolSettings,
        base_ledger: Arc<dyn AssetLedger>,
        quote_ledger: Arc<dyn AssetLedger>,
    ) -> Self {
        info!(
            account = ?settings.account,
            fee = %settings.fee,
            base = base_ledger.symbol(),
            quote = quote_ledger.symbol(),
            "pool created"
        );
        Self {
            pricing: PricingEngine::new(settings.fee),
            reserves: ReserveLedger::new(settings.rounding_tolerance),
            liquidity: LiquidityBook::new(),
            custody: CustodyGuard::new(settings.account, base_ledger, quote_ledger),
            settings,
            sequence: 0,
        }
    }

    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    pub fn account(&self) -> Address {
        self.settings.account
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Tokens per ETH (`getRatio`)
    pub fn get_ratio(&self) -> Result<Ratio> {
        self.pricing.quote(&self.reserves)
    }

    pub fn current_reserves(&self) -> (u128, u128) {
        self.reserves.current_reserves()
    }

    pub fn total_shares(&self) -> u128 {
        self.liquidity.total_shares()
    }

    pub fn shares_of(&self, owner: &Address) -> u128 {
        self.liquidity.shares_of(owner)
    }

    /// Shared handle to the external ledger of `asset`
    pub fn asset_ledger(&self, asset: Asset) -> Arc<dyn AssetLedger> {
        Arc::clone(self.custody.ledger(asset))
    }

    /// Token balance of `owner` (`balanceOf`)
    pub fn balance_of(&self, owner: &Address) -> u128 {
        self.custody.ledger(Asset::Quote).balance_of(owner)
    }

    /// ETH balance of `owner`
    pub fn native_balance_of(&self, owner: &Address) -> u128 {
        self.custody.ledger(Asset::Base).balance_of(owner)
    }

    /// Token allowance `owner` granted to `spender`
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.custody.ledger(Asset::Quote).allowance(owner, spender)
    }

    /// Token `approve`; pass [`Pool::account`] as spender before selling tokens
    pub fn approve(&self, owner: &Address, spender: &Address, amount: u128) {
        debug!(?owner, ?spender, amount, "token approval");
        self.custody.ledger(Asset::Quote).approve(owner, spender, amount);
    }

    pub fn view(&self) -> PoolView {
        PoolView {
            reserves: self.reserves.reserves(),
            total_shares: self.liquidity.total_shares(),
            fee: self.pricing.fee(),
            sequence: self.sequence,
        }
    }

    /// Sell `value` ETH attached to the call for tokens
    pub fn swap_eth_to_token(
        &mut self,
        caller: &Address,
        value: u128,
        min_out: u128,
    ) -> Result<SwapReceipt> {
        self.execute_swap(caller, SwapDirection::BaseToQuote, value, min_out)
    }

    /// Sell `amount` tokens, pulled on the caller's allowance, for ETH
    pub fn swap_token_to_eth(
        &mut self,
        caller: &Address,
        amount: u128,
        min_out: u128,
    ) -> Result<SwapReceipt> {
        self.execute_swap(caller, SwapDirection::QuoteToBase, amount, min_out)
    }

    pub fn execute_swap(
        &mut self,
        caller: &Address,
        direction: SwapDirection,
        input: u128,
        min_output: u128,
    ) -> Result<SwapReceipt> {
        let outcome = self
            .pricing
            .execute_swap(
                &mut self.reserves,
                &self.custody,
                caller,
                direction,
                input,
                min_output,
            )
            .map_err(|err| rejected("swap", err))?;

        self.sequence += 1;
        info!(
            sequence = self.sequence,
            trader = ?caller,
            ?direction,
            input,
            output = outcome.output,
            base = outcome.reserves.base,
            quote = outcome.reserves.quote,
            "swap committed"
        );
        Ok(SwapReceipt {
            input,
            output: outcome.output,
            reserves: outcome.reserves,
            event: PoolEvent::Swap {
                trader: *caller,
                direction,
                input,
                output: outcome.output,
                reserves: outcome.reserves,
            },
        })
    }

    /// What a deposit of `eth_value` and `token_amount` would accept and earn
    pub fn quote_deposit(&self, token_amount: u128, eth_value: u128) -> Result<DepositQuote> {
        self.liquidity
            .compute_deposit(&self.reserves.reserves(), eth_value, token_amount)
    }

    /// Deposit at the pool ratio; only the accepted amounts move
    pub fn add_liquidity(
        &mut self,
        caller: &Address,
        token_amount: u128,
        eth_value: u128,
    ) -> Result<DepositReceipt> {
        let deposit = self
            .quote_deposit(token_amount, eth_value)
            .map_err(|err| rejected("deposit", err))?;
        let reserves = self
            .liquidity
            .apply_deposit(&mut self.reserves, &self.custody, caller, deposit)
            .map_err(|err| rejected("deposit", err))?;

        self.sequence += 1;
        info!(
            sequence = self.sequence,
            owner = ?caller,
            base = deposit.base,
            quote = deposit.quote,
            shares = deposit.shares,
            total_shares = self.liquidity.total_shares(),
            "liquidity added"
        );
        Ok(DepositReceipt {
            base: deposit.base,
            quote: deposit.quote,
            shares: deposit.shares,
            reserves,
            event: PoolEvent::Mint {
                owner: *caller,
                base: deposit.base,
                quote: deposit.quote,
                shares: deposit.shares,
                reserves,
            },
        })
    }

    /// Burn `shares` for the pro-rata part of both reserves
    pub fn remove_liquidity(&mut self, caller: &Address, shares: u128) -> Result<WithdrawalReceipt> {
        let withdrawal = self
            .liquidity
            .compute_withdrawal(&self.reserves.reserves(), caller, shares)
            .map_err(|err| rejected("withdrawal", err))?;
        let reserves = self
            .liquidity
            .apply_withdrawal(&mut self.reserves, &self.custody, caller, withdrawal)
            .map_err(|err| rejected("withdrawal", err))?;

        self.sequence += 1;
        info!(
            sequence = self.sequence,
            owner = ?caller,
            base = withdrawal.base,
            quote = withdrawal.quote,
            shares,
            total_shares = self.liquidity.total_shares(),
            "liquidity removed"
        );
        Ok(WithdrawalReceipt {
            base: withdrawal.base,
            quote: withdrawal.quote,
            shares,
            reserves,
            event: PoolEvent::Burn {
                owner: *caller,
                base: withdrawal.base,
                quote: withdrawal.quote,
                shares,
                reserves,
            },
        })
    }

    pub fn state(&self) -> PoolState {
        let reserves = self.reserves.reserves();
        PoolState {
            sequence: self.sequence,
            reserve_base: reserves.base,
            reserve_quote: reserves.quote,
            total_shares: self.liquidity.total_shares(),
            positions: self.liquidity.positions().clone(),
        }
    }

    /// Install a validated snapshot; the current state is kept on error
    /// Reserves must be covered by what the pool account holds on each ledger
    fn check_backing(&self, reserves: Reserves) -> Result<()> {
        let account = self.custody.pool_account();
        for (asset, reserve) in [(Asset::Base, reserves.base), (Asset::Quote, reserves.quote)] {
            let held = self.custody.ledger(asset).balance_of(&account);
            if held < reserve {
                return Err(AmmError::invariant(format!(
                    "{} reserve {} exceeds pool account balance {}",
                    asset, reserve, held
                )));
            }
        }
        Ok(())
    }

    /// Replace reserves and positions with a validated snapshot
    pub fn restore_state(&mut self, state: PoolState) -> Result<()> {
        let sequence = state.sequence;
        let (reserves, liquidity) = state
            .into_parts(self.settings.rounding_tolerance)
            .map_err(|err| rejected("restore", err))?;
        self.check_backing(reserves.reserves())
            .map_err(|err| rejected("restore", err))?;
        self.reserves = reserves;
        self.liquidity = liquidity;
        self.sequence = sequence;
        info!(
            sequence,
            base = self.reserves.reserves().base,
            quote = self.reserves.reserves().quote,
            total_shares = self.liquidity.total_shares(),
            "pool state restored"
        );
        Ok(())
    }
}

impl AmmPool for Pool {
    fn reserves(&self) -> Reserves {
        self.reserves.reserves()
    }

    fn fee(&self) -> FeeRate {
        self.pricing.fee()
    }
}

impl Stateful for Pool {
    type Error = AmmError;

    fn snapshot(&self) -> Result<Vec<u8>> {
        self.state().encode()
    }

    fn restore(&mut self, snapshot: &[u8]) -> Result<()> {
        let state = PoolState::decode(snapshot)?;
        self.restore_state(state)
    }
}

fn rejected(operation: &'static str, err: AmmError) -> AmmError {
    if err.is_fatal() {
        error!(operation, error = %err, "invariant violation");
    } else {
        debug!(operation, error = %err, "operation rejected");
    }
    err
}
