//! # Distributor Audit Events
//!
//! Every state change the engine commits is recorded as a
//! [`DistributorEvent`] and logged through `tracing`. Rejected calls record
//! nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use airdrop_core::{Address, Hash32};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// The controller published a new root.
    RootUpdated {
        /// Root before the update, if one was set.
        previous: Option<Hash32>,
        /// The new root.
        root: Hash32,
    },
    /// The pool was topped up.
    Funded {
        /// Amount added.
        #[serde(with = "airdrop_core::entry::decimal_u128")]
        amount: u128,
        /// Balance after the top-up.
        #[serde(with = "airdrop_core::entry::decimal_u128")]
        balance: u128,
    },
    /// An allocation was paid out.
    Claimed {
        /// Leaf index.
        index: u64,
        /// Who was paid.
        recipient: Address,
        /// How much.
        #[serde(with = "airdrop_core::entry::decimal_u128")]
        amount: u128,
    },
}

/// A timestamped event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributorEvent {
    /// When the change was committed.
    pub at: DateTime<Utc>,
    /// The change.
    #[serde(flatten)]
    pub kind: EventKind,
}

impl DistributorEvent {
    /// Stamp `kind` with the current time.
    pub fn now(kind: EventKind) -> Self {
        Self {
            at: Utc::now(),
            kind,
        }
    }
}
