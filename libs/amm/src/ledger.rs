//! Asset ledgers
//!
//! Balances of ETH and of the ERC-20 token live outside the engine. The
//! engine reaches them through [`AssetLedger`]; [`TokenLedger`] is the
//! in-process implementation with ERC-20 semantics (`balanceOf`, `approve`,
//! `allowance`, `transfer`, `transferFrom`), used for both the token and the
//! native ETH balances.

use parking_lot::Mutex;
use std::collections::HashMap;
use swap_types::Address;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance: needed {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: needed {needed}, granted {granted}")]
    InsufficientAllowance { needed: u128, granted: u128 },

    #[error("balance overflow")]
    Overflow,

    #[error("ledger rejected transfer: {0}")]
    Rejected(String),
}

/// Balance ledger of one asset
///
/// Implementations use interior mutability so one ledger can be shared by
/// the pool and its clients behind an `Arc`.
pub trait AssetLedger: Send + Sync {
    fn symbol(&self) -> &str;

    fn decimals(&self) -> u8;

    fn balance_of(&self, owner: &Address) -> u128;

    fn allowance(&self, owner: &Address, spender: &Address) -> u128;

    fn approve(&self, owner: &Address, spender: &Address, amount: u128);

    /// Move funds on the owner's own authority
    fn transfer(&self, from: &Address, to: &Address, amount: u128) -> Result<(), LedgerError>;

    /// Move funds on an allowance previously granted to `spender`
    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), LedgerError>;
}

#[derive(Debug, Default)]
struct Book {
    balances: HashMap<Address, u128>,
    allowances: HashMap<(Address, Address), u128>,
    total_supply: u128,
}

impl Book {
    fn balance(&self, owner: &Address) -> u128 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    fn move_funds(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), LedgerError> {
        let available = self.balance(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.balances.insert(*from, available - amount);
        self.balances.insert(*to, credited);
        Ok(())
    }
}

/// In-memory ERC-20 style ledger
///
/// An allowance of `u128::MAX` is treated as unlimited and never decremented.
#[derive(Debug)]
pub struct TokenLedger {
    symbol: String,
    decimals: u8,
    book: Mutex<Book>,
}

impl TokenLedger {
    pub fn new(symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
            book: Mutex::new(Book::default()),
        }
    }

    /// Ledger for the chain's native currency
    pub fn native() -> Self {
        Self::new("ETH", swap_types::ETHER_DECIMALS)
    }

    /// Create new units for `to`
    pub fn mint(&self, to: &Address, amount: u128) -> Result<(), LedgerError> {
        let mut book = self.book.lock();
        let supply = book
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let balance = book.balance(to).checked_add(amount).ok_or(LedgerError::Overflow)?;
        book.total_supply = supply;
        book.balances.insert(*to, balance);
        Ok(())
    }

    pub fn total_supply(&self) -> u128 {
        self.book.lock().total_supply
    }
}

impl AssetLedger for TokenLedger {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn balance_of(&self, owner: &Address) -> u128 {
        self.book.lock().balance(owner)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.book
            .lock()
            .allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn approve(&self, owner: &Address, spender: &Address, amount: u128) {
        self.book
            .lock()
            .allowances
            .insert((*owner, *spender), amount);
    }

    fn transfer(&self, from: &Address, to: &Address, amount: u128) -> Result<(), LedgerError> {
        self.book.lock().move_funds(from, to, amount)
    }

    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let mut book = self.book.lock();
        let key = (*from, *spender);
        let granted = book.allowances.get(&key).copied().unwrap_or(0);
        if granted < amount {
            return Err(LedgerError::InsufficientAllowance {
                needed: amount,
                granted,
            });
        }
        book.move_funds(from, to, amount)?;
        if granted != u128::MAX {
            book.allowances.insert(key, granted - amount);
        }
        Ok(())
    }
}
