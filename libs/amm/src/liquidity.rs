//! Liquidity Accounting
//!
//! Ownership shares of the pool. A deposit into a live pool is trimmed to
//! the current reserve ratio before shares are issued, so adding liquidity
//! never moves the price; only the accepted amounts are pulled from the
//! depositor.

use crate::asset::Asset;
use crate::custody::CustodyGuard;
use crate::error::{AmmError, Result};
use crate::pricing::unwind;
use crate::reserves::{CommitKind, ReserveLedger, Reserves};
use crate::v2_math::V2Math;
use std::collections::BTreeMap;
use swap_types::common::wide::narrow;
use swap_types::{mul_div_floor, Address, U256};
use tracing::debug;

/// Amounts a deposit will actually move and the shares it earns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositQuote {
    pub base: u128,
    pub quote: u128,
    pub shares: u128,
}

/// Amounts paid out for burning `shares`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalQuote {
    pub base: u128,
    pub quote: u128,
    pub shares: u128,
}

/// Share positions per owner; their sum is always `total_shares`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiquidityBook {
    positions: BTreeMap<Address, u128>,
    total_shares: u128,
}

impl LiquidityBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted positions; empty positions are dropped
    pub fn from_positions(positions: BTreeMap<Address, u128>) -> Result<Self> {
        let positions: BTreeMap<_, _> = positions
            .into_iter()
            .filter(|(_, shares)| *shares > 0)
            .collect();
        let total_shares = positions.values().try_fold(0u128, |total, shares| {
            total
                .checked_add(*shares)
                .ok_or_else(|| AmmError::overflow("total shares"))
        })?;
        Ok(Self {
            positions,
            total_shares,
        })
    }

    pub fn total_shares(&self) -> u128 {
        self.total_shares
    }

    pub fn shares_of(&self, owner: &Address) -> u128 {
        self.positions.get(owner).copied().unwrap_or(0)
    }

    pub fn positions(&self) -> &BTreeMap<Address, u128> {
        &self.positions
    }

    /// Trim a desired deposit to the pool ratio and price it in shares
    pub fn compute_deposit(
        &self,
        reserves: &Reserves,
        desired_base: u128,
        desired_quote: u128,
    ) -> Result<DepositQuote> {
        if desired_base == 0 && desired_quote == 0 {
            return Err(AmmError::ZeroDeposit);
        }
        self.check_consistent(reserves)?;

        if self.total_shares == 0 {
            // a one-sided first deposit cannot set a price
            if desired_base == 0 || desired_quote == 0 {
                return Err(AmmError::DepositTooSmall);
            }
            let root = V2Math::integer_sqrt(U256::from(desired_base) * U256::from(desired_quote));
            let shares = narrow(root).ok_or_else(|| AmmError::overflow("initial shares"))?;
            return Ok(DepositQuote {
                base: desired_base,
                quote: desired_quote,
                shares: shares.max(1),
            });
        }

        let implied_quote = V2Math::quote(desired_base, reserves.base, reserves.quote)?;
        let (base, quote) = if desired_quote >= implied_quote {
            (desired_base, implied_quote)
        } else {
            let implied_base = V2Math::quote(desired_quote, reserves.quote, reserves.base)?;
            (implied_base, desired_quote)
        };

        let by_base = mul_div_floor(self.total_shares, base, reserves.base)
            .ok_or_else(|| AmmError::overflow("deposit shares"))?;
        let by_quote = mul_div_floor(self.total_shares, quote, reserves.quote)
            .ok_or_else(|| AmmError::overflow("deposit shares"))?;
        let shares = by_base.min(by_quote);

        if shares == 0 {
            return Err(AmmError::DepositTooSmall);
        }
        Ok(DepositQuote {
            base,
            quote,
            shares,
        })
    }

    /// Pull both assets, grow the reserves, mint shares to `owner`
    pub fn apply_deposit(
        &mut self,
        ledger: &mut ReserveLedger,
        custody: &CustodyGuard,
        owner: &Address,
        deposit: DepositQuote,
    ) -> Result<Reserves> {
        let current = ledger.reserves();
        let next = Reserves::new(
            current
                .base
                .checked_add(deposit.base)
                .ok_or_else(|| AmmError::overflow("base reserve"))?,
            current
                .quote
                .checked_add(deposit.quote)
                .ok_or_else(|| AmmError::overflow("quote reserve"))?,
        );
        ledger.validate(&next, CommitKind::Deposit)?;
        let total_shares = self
            .total_shares
            .checked_add(deposit.shares)
            .ok_or_else(|| AmmError::overflow("total shares"))?;

        let base_ticket = custody.authorize(owner, Asset::Base, deposit.base)?;
        let quote_ticket = custody.authorize(owner, Asset::Quote, deposit.quote)?;

        let base_held = custody.take_custody(base_ticket)?;
        let quote_held = match custody.take_custody(quote_ticket) {
            Ok(held) => held,
            Err(err) => {
                debug!(?owner, error = %err, "quote pull failed, refunding base");
                return Err(unwind(custody, base_held, err));
            }
        };

        let reserves = match ledger.commit(next.base, next.quote, CommitKind::Deposit) {
            Ok(reserves) => reserves,
            Err(err) => {
                let err = unwind(custody, quote_held, err);
                return Err(unwind(custody, base_held, err));
            }
        };

        *self.positions.entry(*owner).or_insert(0) += deposit.shares;
        self.total_shares = total_shares;
        Ok(reserves)
    }

    /// Pro-rata amounts for burning `shares` of `owner`
    pub fn compute_withdrawal(
        &self,
        reserves: &Reserves,
        owner: &Address,
        shares: u128,
    ) -> Result<WithdrawalQuote> {
        if shares == 0 {
            return Err(AmmError::InsufficientInput);
        }
        let available = self.shares_of(owner);
        if available < shares {
            return Err(AmmError::InsufficientShares {
                requested: shares,
                available,
            });
        }
        self.check_consistent(reserves)?;

        let base = mul_div_floor(shares, reserves.base, self.total_shares)
            .ok_or_else(|| AmmError::overflow("withdrawal base"))?;
        let quote = mul_div_floor(shares, reserves.quote, self.total_shares)
            .ok_or_else(|| AmmError::overflow("withdrawal quote"))?;
        if base == 0 && quote == 0 {
            return Err(AmmError::WithdrawalTooSmall);
        }
        Ok(WithdrawalQuote {
            base,
            quote,
            shares,
        })
    }

    /// Shrink the reserves, burn shares, pay both assets to `owner`
    pub fn apply_withdrawal(
        &mut self,
        ledger: &mut ReserveLedger,
        custody: &CustodyGuard,
        owner: &Address,
        withdrawal: WithdrawalQuote,
    ) -> Result<Reserves> {
        let available = self.shares_of(owner);
        if available < withdrawal.shares {
            return Err(AmmError::InsufficientShares {
                requested: withdrawal.shares,
                available,
            });
        }
        let previous = ledger.reserves();
        let next = Reserves::new(
            previous
                .base
                .checked_sub(withdrawal.base)
                .ok_or_else(|| AmmError::invariant("withdrawal exceeds base reserve"))?,
            previous
                .quote
                .checked_sub(withdrawal.quote)
                .ok_or_else(|| AmmError::invariant("withdrawal exceeds quote reserve"))?,
        );

        let reserves = ledger.commit(next.base, next.quote, CommitKind::Withdrawal)?;
        let snapshot = self.clone();
        self.burn(owner, withdrawal.shares);

        if let Err(err) = custody.release(Asset::Base, owner, withdrawal.base) {
            ledger.rollback(previous);
            *self = snapshot;
            return Err(err);
        }
        if let Err(err) = custody.release(Asset::Quote, owner, withdrawal.quote) {
            ledger.rollback(previous);
            *self = snapshot;
            return Err(match custody.reclaim(Asset::Base, owner, withdrawal.base) {
                Ok(()) => err,
                Err(fatal) => fatal,
            });
        }
        Ok(reserves)
    }

    fn burn(&mut self, owner: &Address, shares: u128) {
        if let Some(position) = self.positions.get_mut(owner) {
            *position -= shares;
            if *position == 0 {
                self.positions.remove(owner);
            }
        }
        self.total_shares -= shares;
    }

    /// Shares exist exactly when both reserves are positive
    pub(crate) fn check_consistent(&self, reserves: &Reserves) -> Result<()> {
        match (self.total_shares == 0, reserves.is_empty()) {
            (true, true) => Ok(()),
            (false, false) if reserves.is_initialized() => Ok(()),
            _ => Err(AmmError::invariant(format!(
                "{} shares outstanding against reserves {}/{}",
                self.total_shares, reserves.base, reserves.quote
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{AssetLedger, TokenLedger};
    use std::sync::Arc;

    const POOL: u64 = 0xdead;

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    fn seeded_book(total: u128) -> LiquidityBook {
        LiquidityBook::from_positions(BTreeMap::from([(addr(1), total)])).unwrap()
    }

    #[test]
    fn test_initial_deposit_uses_geometric_mean() {
        let book = LiquidityBook::new();
        let quote = book
            .compute_deposit(&Reserves::EMPTY, 1000, 2000)
            .unwrap();
        assert_eq!(
            quote,
            DepositQuote {
                base: 1000,
                quote: 2000,
                shares: 1414
            }
        );
    }

    #[test]
    fn test_zero_and_one_sided_initial_deposits() {
        let book = LiquidityBook::new();
        assert_eq!(
            book.compute_deposit(&Reserves::EMPTY, 0, 0),
            Err(AmmError::ZeroDeposit)
        );
        assert_eq!(
            book.compute_deposit(&Reserves::EMPTY, 100, 0),
            Err(AmmError::DepositTooSmall)
        );
    }

    #[test]
    fn test_deposit_trimmed_to_ratio() {
        let book = seeded_book(1414);
        let reserves = Reserves::new(1000, 2000);

        let quote = book.compute_deposit(&reserves, 100, 500).unwrap();
        assert_eq!((quote.base, quote.quote), (100, 200));
        assert_eq!(quote.shares, 1414 * 100 / 1000);

        // quote side binds
        let quote = book.compute_deposit(&reserves, 500, 100).unwrap();
        assert_eq!((quote.base, quote.quote), (50, 100));
        assert_eq!(quote.shares, 70);
    }

    #[test]
    fn test_dust_deposit_too_small() {
        let book = seeded_book(10);
        let reserves = Reserves::new(1_000_000, 2_000_000);
        assert_eq!(
            book.compute_deposit(&reserves, 10, 20),
            Err(AmmError::DepositTooSmall)
        );
    }

    #[test]
    fn test_shares_without_reserves_is_invariant_violation() {
        let book = seeded_book(10);
        assert!(book
            .compute_deposit(&Reserves::EMPTY, 1, 1)
            .unwrap_err()
            .is_fatal());
    }

    #[test]
    fn test_withdrawal_quotes() {
        let book = seeded_book(1414);
        let reserves = Reserves::new(1000, 2000);

        let quote = book.compute_withdrawal(&reserves, &addr(1), 707).unwrap();
        assert_eq!((quote.base, quote.quote), (500, 1000));

        assert_eq!(
            book.compute_withdrawal(&reserves, &addr(1), 0),
            Err(AmmError::InsufficientInput)
        );
        assert_eq!(
            book.compute_withdrawal(&reserves, &addr(2), 1),
            Err(AmmError::InsufficientShares {
                requested: 1,
                available: 0
            })
        );

        let deep = seeded_book(1_000_000);
        assert_eq!(
            deep.compute_withdrawal(&Reserves::new(10, 10), &addr(1), 1),
            Err(AmmError::WithdrawalTooSmall)
        );
    }

    #[test]
    fn test_apply_deposit_then_full_withdrawal() {
        let eth = Arc::new(TokenLedger::native());
        let token = Arc::new(TokenLedger::new("ImuLL", 18));
        let custody = CustodyGuard::new(addr(POOL), eth.clone(), token.clone());
        let mut ledger = ReserveLedger::new(0);
        let mut book = LiquidityBook::new();
        let owner = addr(1);

        eth.mint(&owner, 1000).unwrap();
        token.mint(&owner, 2000).unwrap();
        token.approve(&owner, &addr(POOL), 2000);

        let deposit = book.compute_deposit(&ledger.reserves(), 1000, 2000).unwrap();
        book.apply_deposit(&mut ledger, &custody, &owner, deposit)
            .unwrap();
        assert_eq!(ledger.current_reserves(), (1000, 2000));
        assert_eq!(book.shares_of(&owner), 1414);
        assert_eq!(token.balance_of(&addr(POOL)), 2000);

        let withdrawal = book
            .compute_withdrawal(&ledger.reserves(), &owner, 1414)
            .unwrap();
        book.apply_withdrawal(&mut ledger, &custody, &owner, withdrawal)
            .unwrap();
        assert!(!ledger.is_initialized());
        assert_eq!(book.total_shares(), 0);
        assert!(book.positions().is_empty());
        assert_eq!(eth.balance_of(&owner), 1000);
        assert_eq!(token.balance_of(&owner), 2000);
    }

    #[test]
    fn test_failed_quote_pull_refunds_base() {
        let eth = Arc::new(TokenLedger::native());
        let token = Arc::new(TokenLedger::new("ImuLL", 18));
        let custody = CustodyGuard::new(addr(POOL), eth.clone(), token.clone());
        let mut ledger = ReserveLedger::new(0);
        let mut book = LiquidityBook::new();
        let owner = addr(1);

        eth.mint(&owner, 1000).unwrap();
        // allowance granted but no token balance
        token.approve(&owner, &addr(POOL), 2000);

        let deposit = book.compute_deposit(&ledger.reserves(), 1000, 2000).unwrap();
        let err = book
            .apply_deposit(&mut ledger, &custody, &owner, deposit)
            .unwrap_err();
        assert!(matches!(
            err,
            AmmError::TransferFailed {
                asset: Asset::Quote,
                ..
            }
        ));
        assert_eq!(eth.balance_of(&owner), 1000);
        assert_eq!(ledger.current_reserves(), (0, 0));
        assert_eq!(book.total_shares(), 0);
        assert_eq!(token.allowance(&owner, &addr(POOL)), 2000);
    }
}
