//! Access/Custody Guard
//!
//! Funds enter the pool in two phases. [`CustodyGuard::authorize`] checks
//! the caller's balance and, for the token, the allowance granted to the
//! pool account, and hands back a [`CustodyTicket`]. Only a ticket can be
//! redeemed by [`CustodyGuard::take_custody`], so no commit path can move
//! caller funds without passing the allowance check first.
//!
//! ETH arrives as value attached to the call: the caller moves it on its own
//! authority and no allowance is involved. The token follows the
//! approve-then-call pattern and is pulled with `transfer_from`.

use crate::asset::Asset;
use crate::error::{AmmError, Result};
use crate::ledger::{AssetLedger, LedgerError};
use std::sync::Arc;
use swap_types::Address;
use tracing::{debug, error};

/// How the pool pulls an asset from a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustodyMode {
    /// Caller attaches the value to the call
    AttachedValue,
    /// Caller pre-approves the pool account as spender
    Allowance,
}

struct AssetSlot {
    ledger: Arc<dyn AssetLedger>,
    mode: CustodyMode,
}

/// Proof that an intake passed authorization; redeemed exactly once
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a ticket authorizes nothing until it is redeemed"]
pub struct CustodyTicket {
    asset: Asset,
    owner: Address,
    amount: u128,
}

impl CustodyTicket {
    pub fn asset(&self) -> Asset {
        self.asset
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn amount(&self) -> u128 {
        self.amount
    }
}

/// Funds taken into custody; consumed by a refund on rollback
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct Held {
    asset: Asset,
    owner: Address,
    amount: u128,
}

impl Held {
    pub fn amount(&self) -> u128 {
        self.amount
    }
}

pub struct CustodyGuard {
    pool_account: Address,
    base: AssetSlot,
    quote: AssetSlot,
}

impl CustodyGuard {
    /// Base (ETH) uses attached value, quote (token) uses allowances
    pub fn new(
        pool_account: Address,
        base_ledger: Arc<dyn AssetLedger>,
        quote_ledger: Arc<dyn AssetLedger>,
    ) -> Self {
        Self {
            pool_account,
            base: AssetSlot {
                ledger: base_ledger,
                mode: CustodyMode::AttachedValue,
            },
            quote: AssetSlot {
                ledger: quote_ledger,
                mode: CustodyMode::Allowance,
            },
        }
    }

    pub fn pool_account(&self) -> Address {
        self.pool_account
    }

    pub fn ledger(&self, asset: Asset) -> &Arc<dyn AssetLedger> {
        &self.slot(asset).ledger
    }

    pub fn mode(&self, asset: Asset) -> CustodyMode {
        self.slot(asset).mode
    }

    fn slot(&self, asset: Asset) -> &AssetSlot {
        match asset {
            Asset::Base => &self.base,
            Asset::Quote => &self.quote,
        }
    }

    /// Phase one: allowance and balance check, no funds move
    pub fn authorize(
        &self,
        caller: &Address,
        asset: Asset,
        amount: u128,
    ) -> Result<CustodyTicket> {
        let slot = self.slot(asset);

        // a self-transfer moves nothing, so the pool account can never pay in
        if *caller == self.pool_account {
            debug!(%asset, required = amount, "custody refused for pool account");
            return Err(AmmError::Unauthorized {
                required: amount,
                granted: 0,
            });
        }

        if slot.mode == CustodyMode::Allowance {
            let granted = slot.ledger.allowance(caller, &self.pool_account);
            if granted < amount {
                debug!(?caller, %asset, required = amount, granted, "custody unauthorized");
                return Err(AmmError::Unauthorized {
                    required: amount,
                    granted,
                });
            }
        }

        let available = slot.ledger.balance_of(caller);
        if available < amount {
            return Err(AmmError::TransferFailed {
                asset,
                reason: LedgerError::InsufficientBalance {
                    needed: amount,
                    available,
                }
                .to_string(),
            });
        }

        Ok(CustodyTicket {
            asset,
            owner: *caller,
            amount,
        })
    }

    /// Phase two: move the authorized funds into the pool account
    pub fn take_custody(&self, ticket: CustodyTicket) -> Result<Held> {
        let CustodyTicket {
            asset,
            owner,
            amount,
        } = ticket;
        let slot = self.slot(asset);

        let moved = match slot.mode {
            CustodyMode::AttachedValue => slot.ledger.transfer(&owner, &self.pool_account, amount),
            CustodyMode::Allowance => slot.ledger.transfer_from(
                &self.pool_account,
                &owner,
                &self.pool_account,
                amount,
            ),
        };
        moved.map_err(|err| ledger_failure(asset, err))?;

        debug!(?owner, %asset, amount, "funds taken into custody");
        Ok(Held {
            asset,
            owner,
            amount,
        })
    }

    /// Pay out of the pool account
    pub fn release(&self, asset: Asset, to: &Address, amount: u128) -> Result<()> {
        self.slot(asset)
            .ledger
            .transfer(&self.pool_account, to, amount)
            .map_err(|err| ledger_failure(asset, err))?;
        debug!(?to, %asset, amount, "funds released");
        Ok(())
    }

    /// Undo a [`take_custody`](Self::take_custody), restoring any allowance it spent
    pub fn refund(&self, held: Held) -> Result<()> {
        let Held {
            asset,
            owner,
            amount,
        } = held;
        let slot = self.slot(asset);

        slot.ledger
            .transfer(&self.pool_account, &owner, amount)
            .map_err(|err| compensation_failure("refund", asset, err))?;

        if slot.mode == CustodyMode::Allowance {
            let granted = slot.ledger.allowance(&owner, &self.pool_account);
            if granted != u128::MAX {
                slot.ledger
                    .approve(&owner, &self.pool_account, granted.saturating_add(amount));
            }
        }
        debug!(?owner, %asset, amount, "custody refunded");
        Ok(())
    }

    /// Undo a [`release`](Self::release)
    pub fn reclaim(&self, asset: Asset, from: &Address, amount: u128) -> Result<()> {
        self.slot(asset)
            .ledger
            .transfer(from, &self.pool_account, amount)
            .map_err(|err| compensation_failure("reclaim", asset, err))?;
        debug!(?from, %asset, amount, "release reclaimed");
        Ok(())
    }
}

fn ledger_failure(asset: Asset, err: LedgerError) -> AmmError {
    match err {
        LedgerError::InsufficientAllowance { needed, granted } => AmmError::Unauthorized {
            required: needed,
            granted,
        },
        other => AmmError::TransferFailed {
            asset,
            reason: other.to_string(),
        },
    }
}

fn compensation_failure(step: &str, asset: Asset, err: LedgerError) -> AmmError {
    error!(step, %asset, error = %err, "rollback transfer failed");
    AmmError::invariant(format!("{step} of {asset} failed during rollback: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TokenLedger;

    const POOL: u64 = 0xdead;

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    fn guard() -> (CustodyGuard, Arc<TokenLedger>, Arc<TokenLedger>) {
        let eth = Arc::new(TokenLedger::native());
        let token = Arc::new(TokenLedger::new("ImuLL", 18));
        let guard = CustodyGuard::new(addr(POOL), eth.clone(), token.clone());
        (guard, eth, token)
    }

    #[test]
    fn test_token_requires_allowance() {
        let (guard, _eth, token) = guard();
        token.mint(&addr(1), 1_000).unwrap();

        assert_eq!(
            guard.authorize(&addr(1), Asset::Quote, 500),
            Err(AmmError::Unauthorized {
                required: 500,
                granted: 0
            })
        );

        token.approve(&addr(1), &addr(POOL), 500);
        let ticket = guard.authorize(&addr(1), Asset::Quote, 500).unwrap();
        assert_eq!(ticket.amount(), 500);
        let held = guard.take_custody(ticket).unwrap();
        assert_eq!(held.amount(), 500);
        assert_eq!(token.balance_of(&addr(POOL)), 500);
        assert_eq!(token.allowance(&addr(1), &addr(POOL)), 0);
    }

    #[test]
    fn test_pool_account_cannot_pay_itself() {
        let (guard, eth, token) = guard();
        eth.mint(&addr(POOL), 100).unwrap();
        token.mint(&addr(POOL), 100).unwrap();
        token.approve(&addr(POOL), &addr(POOL), 100);

        for asset in [Asset::Base, Asset::Quote] {
            assert_eq!(
                guard.authorize(&addr(POOL), asset, 10),
                Err(AmmError::Unauthorized {
                    required: 10,
                    granted: 0
                })
            );
        }
    }

    #[test]
    fn test_eth_needs_balance_not_allowance() {
        let (guard, eth, _token) = guard();
        assert!(matches!(
            guard.authorize(&addr(1), Asset::Base, 10),
            Err(AmmError::TransferFailed {
                asset: Asset::Base,
                ..
            })
        ));

        eth.mint(&addr(1), 10).unwrap();
        let held = guard
            .take_custody(guard.authorize(&addr(1), Asset::Base, 10).unwrap())
            .unwrap();
        assert_eq!(eth.balance_of(&addr(POOL)), 10);

        guard.refund(held).unwrap();
        assert_eq!(eth.balance_of(&addr(1)), 10);
        assert_eq!(eth.balance_of(&addr(POOL)), 0);
    }

    #[test]
    fn test_refund_restores_allowance() {
        let (guard, _eth, token) = guard();
        token.mint(&addr(1), 100).unwrap();
        token.approve(&addr(1), &addr(POOL), 100);

        let held = guard
            .take_custody(guard.authorize(&addr(1), Asset::Quote, 60).unwrap())
            .unwrap();
        assert_eq!(token.allowance(&addr(1), &addr(POOL)), 40);

        guard.refund(held).unwrap();
        assert_eq!(token.allowance(&addr(1), &addr(POOL)), 100);
        assert_eq!(token.balance_of(&addr(1)), 100);
    }

    #[test]
    fn test_release_and_reclaim() {
        let (guard, _eth, token) = guard();
        token.mint(&addr(POOL), 50).unwrap();

        guard.release(Asset::Quote, &addr(2), 30).unwrap();
        assert_eq!(token.balance_of(&addr(2)), 30);
        assert!(matches!(
            guard.release(Asset::Quote, &addr(2), 30),
            Err(AmmError::TransferFailed { .. })
        ));

        guard.reclaim(Asset::Quote, &addr(2), 30).unwrap();
        assert_eq!(token.balance_of(&addr(POOL)), 50);
    }
}
