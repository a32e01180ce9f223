//! # Native Value Transfer
//!
//! The engine never moves funds itself. It calls a [`NativeTransfer`]
//! capability after its own state is updated, and treats any error as a
//! reason to roll the claim back.
//!
//! [`InMemoryLedger`] is the in-process backend: per-recipient balances plus
//! a reject-list that makes chosen recipients refuse payment.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use airdrop_core::Address;

/// Failure reported by a transfer backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The recipient refused the payment.
    #[error("recipient {0} rejected the transfer")]
    Rejected(Address),

    /// The recipient balance would overflow.
    #[error("balance overflow for {0}")]
    Overflow(Address),

    /// Any other backend failure.
    #[error("{0}")]
    Backend(String),
}

/// Moves `amount` of native currency to `recipient`.
///
/// Implementations may call back into the engine (a recipient contract
/// re-entering `claim`). The engine holds no lock while calling this.
pub trait NativeTransfer: Send + Sync {
    /// Pay `amount` to `recipient`.
    fn transfer(&self, recipient: &Address, amount: u128) -> Result<(), TransferError>;
}

impl<T: NativeTransfer + ?Sized> NativeTransfer for Arc<T> {
    fn transfer(&self, recipient: &Address, amount: u128) -> Result<(), TransferError> {
        (**self).transfer(recipient, amount)
    }
}

impl<T: NativeTransfer + ?Sized> NativeTransfer for Box<T> {
    fn transfer(&self, recipient: &Address, amount: u128) -> Result<(), TransferError> {
        (**self).transfer(recipient, amount)
    }
}

/// Thread-safe in-memory balances.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: RwLock<BTreeMap<Address, u128>>,
    rejecting: RwLock<BTreeSet<Address>>,
}

impl InMemoryLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance credited to `recipient`.
    pub fn balance_of(&self, recipient: &Address) -> u128 {
        self.balances.read().get(recipient).copied().unwrap_or(0)
    }

    /// Sum of all credited balances.
    pub fn total_paid(&self) -> u128 {
        self.balances.read().values().fold(0u128, |acc, v| acc.saturating_add(*v))
    }

    /// Make `recipient` reject every future transfer.
    pub fn reject(&self, recipient: Address) {
        self.rejecting.write().insert(recipient);
    }

    /// Undo [`InMemoryLedger::reject`].
    pub fn accept(&self, recipient: &Address) {
        self.rejecting.write().remove(recipient);
    }
}

impl NativeTransfer for InMemoryLedger {
    fn transfer(&self, recipient: &Address, amount: u128) -> Result<(), TransferError> {
        if self.rejecting.read().contains(recipient) {
            return Err(TransferError::Rejected(*recipient));
        }
        let mut balances = self.balances.write();
        let balance = balances.entry(*recipient).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(TransferError::Overflow(*recipient))?;
        Ok(())
    }
}
