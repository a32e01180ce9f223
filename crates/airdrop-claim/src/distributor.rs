//! # Distributor State Machine
//!
//! Holds the accepted root, the pool balance and the per-index claim record,
//! and runs the claim path against them.
//!
//! ## Claim Order
//!
//! 1. Recompute the leaf with the engine's own context and algorithm.
//! 2. Verify it against the current root (`InvalidProof`).
//! 3. Reject an index that is claimed or reserved (`AlreadyClaimed`).
//! 4. Reject an allocation the pool cannot cover (`InsufficientFunds`).
//! 5. Reserve the index and debit the balance.
//! 6. Release the state lock and call the transfer backend.
//! 7. Commit the reservation to `Claimed`, or undo it if the transfer failed
//!    or the backend panicked.
//!
//! Steps 1–5 run under one lock, so two claims for the same index can never
//! both pass step 3.
//!
//! ## Security Invariant
//!
//! Effects before interactions: by the time the backend runs, the index is
//! already `Reserved` and the balance already debited. A backend that calls
//! back into [`Distributor::claim`] for the same index is rejected with
//! `AlreadyClaimed`.
//!
//! `balance + reserved + total_claimed` equals everything ever funded and is
//! kept within `u128` by [`Distributor::fund`], so no other path can
//! overflow.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use airdrop_core::{Address, Hash32, WhitelistEntry};
use airdrop_tree::{verify_proof, ClaimPayload, Proof};

use crate::config::DistributorConfig;
use crate::error::ClaimError;
use crate::event::{DistributorEvent, EventKind};
use crate::transfer::NativeTransfer;

/// Claim status of one leaf index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// No claim has succeeded or is in flight.
    Unclaimed,
    /// A claim passed every check and its transfer is in flight.
    Reserved,
    /// Paid out (terminal).
    Claimed,
}

impl ClaimStatus {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Claimed)
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unclaimed => "UNCLAIMED",
            Self::Reserved => "RESERVED",
            Self::Claimed => "CLAIMED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Default)]
struct DistributorState {
    root: Option<Hash32>,
    balance: u128,
    reserved: u128,
    total_claimed: u128,
    /// Absent means `Unclaimed`.
    claims: BTreeMap<u64, ClaimStatus>,
    events: Vec<DistributorEvent>,
}

impl DistributorState {
    fn record(&mut self, kind: EventKind) {
        self.events.push(DistributorEvent::now(kind));
    }
}

/// An index reserved by an in-flight claim, with its debited amount.
///
/// Dropping it without [`Reservation::commit`] (a failed transfer, or a
/// backend that panics) frees the index and returns the amount to the pool.
struct Reservation<'a> {
    state: &'a Mutex<DistributorState>,
    index: u64,
    amount: u128,
    committed: bool,
}

impl Reservation<'_> {
    fn commit(mut self, recipient: Address) {
        self.committed = true;
        let mut state = self.state.lock();
        state.reserved -= self.amount;
        state.claims.insert(self.index, ClaimStatus::Claimed);
        state.total_claimed += self.amount;
        state.record(EventKind::Claimed {
            index: self.index,
            recipient,
            amount: self.amount,
        });
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        let mut state = self.state.lock();
        state.reserved -= self.amount;
        state.balance += self.amount;
        if state.claims.get(&self.index) == Some(&ClaimStatus::Reserved) {
            state.claims.remove(&self.index);
        }
        tracing::debug!(index = self.index, amount = %self.amount, "reservation released");
    }
}

/// The claim engine for one distribution.
#[derive(Debug)]
pub struct Distributor<T> {
    config: DistributorConfig,
    transfer: T,
    state: Mutex<DistributorState>,
}

impl<T: NativeTransfer> Distributor<T> {
    /// Create an engine with no root and an empty pool.
    pub fn new(config: DistributorConfig, transfer: T) -> Self {
        tracing::debug!(
            controller = %config.controller,
            context = %config.context_id,
            algorithm = %config.algorithm,
            "created distributor"
        );
        Self {
            config,
            transfer,
            state: Mutex::new(DistributorState::default()),
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &DistributorConfig {
        &self.config
    }

    /// The transfer backend.
    pub fn transfer_backend(&self) -> &T {
        &self.transfer
    }

    /// Publish `root` as the accepted commitment.
    ///
    /// Returns `false` when `root` is already current (a retried publication
    /// is a no-op). Claim status is never touched.
    ///
    /// # Errors
    ///
    /// [`ClaimError::PermissionDenied`] unless `caller` is the controller;
    /// [`ClaimError::InvalidRoot`] for the zero hash.
    pub fn update_root(&self, caller: &Address, root: Hash32) -> Result<bool, ClaimError> {
        if caller != &self.config.controller {
            tracing::warn!(caller = %caller, "root update denied");
            return Err(ClaimError::PermissionDenied { caller: *caller });
        }
        if root.is_zero() {
            return Err(ClaimError::InvalidRoot);
        }

        let mut state = self.state.lock();
        if state.root == Some(root) {
            tracing::debug!(root = %root, "root already current");
            return Ok(false);
        }
        let previous = state.root.replace(root);
        state.record(EventKind::RootUpdated { previous, root });
        tracing::info!(
            previous = ?previous.map(|r| r.to_hex()),
            root = %root,
            "merkle root updated"
        );
        Ok(true)
    }

    /// Add `amount` to the pool. Returns the new balance.
    ///
    /// # Errors
    ///
    /// [`ClaimError::ArithmeticOverflow`] if the pool's lifetime total would
    /// exceed `u128`.
    pub fn fund(&self, amount: u128) -> Result<u128, ClaimError> {
        let mut state = self.state.lock();
        let balance = state
            .balance
            .checked_add(amount)
            .ok_or(ClaimError::ArithmeticOverflow)?;
        balance
            .checked_add(state.reserved)
            .and_then(|sum| sum.checked_add(state.total_claimed))
            .ok_or(ClaimError::ArithmeticOverflow)?;
        state.balance = balance;
        state.record(EventKind::Funded { amount, balance });
        tracing::info!(amount = %amount, balance = %balance, "distributor funded");
        Ok(balance)
    }

    /// Claim `entry` at `index`. Returns the amount transferred.
    ///
    /// The leaf is recomputed from `entry` with the configured context; the
    /// caller never supplies one. `proof.index` must equal `index`.
    ///
    /// # Errors
    ///
    /// See [`ClaimError`]. On any error the engine state is as it was before
    /// the call.
    pub fn claim(
        &self,
        entry: &WhitelistEntry,
        index: u64,
        proof: &Proof,
    ) -> Result<u128, ClaimError> {
        let amount = entry.allocation;
        let leaf = entry.leaf(self.config.context_id, self.config.algorithm);

        {
            let mut state = self.state.lock();
            let root = state.root.ok_or(ClaimError::RootNotSet)?;

            if proof.index != index || !verify_proof(self.config.algorithm, &root, &leaf, proof) {
                tracing::warn!(index, recipient = %entry.recipient, "claim rejected: invalid proof");
                return Err(ClaimError::InvalidProof { index });
            }
            if state.claims.contains_key(&index) {
                tracing::warn!(index, "claim rejected: already claimed");
                return Err(ClaimError::AlreadyClaimed { index });
            }
            if state.balance < amount {
                tracing::warn!(index, requested = %amount, available = %state.balance, "claim rejected: insufficient funds");
                return Err(ClaimError::InsufficientFunds {
                    requested: amount,
                    available: state.balance,
                });
            }

            state.claims.insert(index, ClaimStatus::Reserved);
            state.balance -= amount;
            state.reserved += amount;
        }
        let reservation = Reservation {
            state: &self.state,
            index,
            amount,
            committed: false,
        };

        // A panicking backend unwinds through `reservation`, which releases it.
        match self.transfer.transfer(&entry.recipient, amount) {
            Ok(()) => {
                reservation.commit(entry.recipient);
                tracing::info!(index, recipient = %entry.recipient, amount = %amount, "claimed");
                Ok(amount)
            }
            Err(err) => {
                drop(reservation);
                tracing::warn!(index, recipient = %entry.recipient, error = %err, "transfer failed, claim rolled back");
                Err(ClaimError::TransferFailed {
                    index,
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Claim from an exported payload.
    ///
    /// # Errors
    ///
    /// As [`Distributor::claim`].
    pub fn claim_payload(&self, payload: &ClaimPayload) -> Result<u128, ClaimError> {
        self.claim(&payload.entry(), payload.index, &payload.to_proof())
    }

    /// The accepted root, if one was published.
    pub fn current_root(&self) -> Option<Hash32> {
        self.state.lock().root
    }

    /// Balance not yet paid out or reserved.
    pub fn available_balance(&self) -> u128 {
        self.state.lock().balance
    }

    /// Status of `index`.
    pub fn status(&self, index: u64) -> ClaimStatus {
        self.state
            .lock()
            .claims
            .get(&index)
            .copied()
            .unwrap_or(ClaimStatus::Unclaimed)
    }

    /// Whether `index` has been paid out.
    pub fn is_claimed(&self, index: u64) -> bool {
        self.status(index) == ClaimStatus::Claimed
    }

    /// Paid-out indices in ascending order.
    ///
    /// Committed claims only. Indices with a transfer in flight are left
    /// out; use [`Distributor::blocked_indices`] when checking a rotation.
    pub fn claimed_indices(&self) -> Vec<u64> {
        self.state
            .lock()
            .claims
            .iter()
            .filter(|(_, status)| status.is_terminal())
            .map(|(index, _)| *index)
            .collect()
    }

    /// Indices no new claim can take: paid out or reserved by an in-flight
    /// claim. This is the set to check a replacement whitelist against.
    pub fn blocked_indices(&self) -> Vec<u64> {
        self.state.lock().claims.keys().copied().collect()
    }

    /// Sum of all successful claims.
    pub fn total_claimed(&self) -> u128 {
        self.state.lock().total_claimed
    }

    /// Committed events in order.
    pub fn events(&self) -> Vec<DistributorEvent> {
        self.state.lock().events.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::{InMemoryLedger, TransferError};
    use airdrop_core::{ContextId, DigestAlgorithm};
    use airdrop_tree::MerkleTree;
    use std::sync::{Arc, Weak};

    const CONTROLLER: Address = Address::from_bytes([0x11; 20]);

    fn entry(b: u8, amount: u128) -> WhitelistEntry {
        WhitelistEntry::new(Address::from_bytes([b; 20]), amount)
    }

    fn tree() -> MerkleTree {
        MerkleTree::build(
            vec![entry(0xaa, 1000), entry(0xbb, 2000), entry(0xcc, 3000)],
            ContextId(1),
            DigestAlgorithm::Keccak256,
        )
        .unwrap()
    }

    fn ready(tree: &MerkleTree, funds: u128) -> Distributor<InMemoryLedger> {
        let d = Distributor::new(
            DistributorConfig::new(CONTROLLER, ContextId(1)),
            InMemoryLedger::new(),
        );
        d.update_root(&CONTROLLER, tree.root()).unwrap();
        d.fund(funds).unwrap();
        d
    }

    fn claim_at(d: &Distributor<impl NativeTransfer>, tree: &MerkleTree, i: usize) -> Result<u128, ClaimError> {
        d.claim(tree.item(i).unwrap(), i as u64, &tree.proof(i).unwrap())
    }

    #[test]
    fn claim_pays_and_records() {
        let tree = tree();
        let d = ready(&tree, 6000);
        assert_eq!(claim_at(&d, &tree, 0).unwrap(), 1000);
        assert_eq!(d.available_balance(), 5000);
        assert_eq!(d.total_claimed(), 1000);
        assert!(d.is_claimed(0));
        assert_eq!(d.claimed_indices(), vec![0]);
        assert_eq!(d.transfer_backend().balance_of(&Address::from_bytes([0xaa; 20])), 1000);
        let last = d.events().pop().unwrap();
        assert_eq!(
            last.kind,
            EventKind::Claimed {
                index: 0,
                recipient: Address::from_bytes([0xaa; 20]),
                amount: 1000
            }
        );
    }

    #[test]
    fn second_claim_is_rejected() {
        let tree = tree();
        let d = ready(&tree, 6000);
        claim_at(&d, &tree, 1).unwrap();
        assert_eq!(claim_at(&d, &tree, 1).unwrap_err(), ClaimError::AlreadyClaimed { index: 1 });
        assert_eq!(d.available_balance(), 4000);
    }

    #[test]
    fn tampered_allocation_is_invalid_proof() {
        let tree = tree();
        let d = ready(&tree, 6000);
        let forged = entry(0xaa, 1001);
        let err = d.claim(&forged, 0, &tree.proof(0).unwrap()).unwrap_err();
        assert_eq!(err, ClaimError::InvalidProof { index: 0 });
        assert_eq!(d.available_balance(), 6000);
        assert!(!d.is_claimed(0));
    }

    #[test]
    fn mismatched_proof_index_is_invalid() {
        let tree = tree();
        let d = ready(&tree, 6000);
        let err = d.claim(tree.item(0).unwrap(), 1, &tree.proof(0).unwrap()).unwrap_err();
        assert_eq!(err, ClaimError::InvalidProof { index: 1 });
    }

    #[test]
    fn invalid_proof_is_checked_before_claimed() {
        let tree = tree();
        let d = ready(&tree, 6000);
        claim_at(&d, &tree, 0).unwrap();
        let err = d.claim(&entry(0xaa, 1001), 0, &tree.proof(0).unwrap()).unwrap_err();
        assert_eq!(err, ClaimError::InvalidProof { index: 0 });
    }

    #[test]
    fn claimed_is_checked_before_funds() {
        let tree = tree();
        let d = ready(&tree, 1000);
        claim_at(&d, &tree, 0).unwrap();
        assert_eq!(claim_at(&d, &tree, 0).unwrap_err(), ClaimError::AlreadyClaimed { index: 0 });
    }

    #[test]
    fn insufficient_funds_leaves_state_untouched() {
        let tree = tree();
        let d = ready(&tree, 2500);
        let err = claim_at(&d, &tree, 2).unwrap_err();
        assert_eq!(
            err,
            ClaimError::InsufficientFunds {
                requested: 3000,
                available: 2500
            }
        );
        assert_eq!(d.status(2), ClaimStatus::Unclaimed);
        d.fund(500).unwrap();
        assert_eq!(claim_at(&d, &tree, 2).unwrap(), 3000);
        assert_eq!(d.available_balance(), 0);
    }

    #[test]
    fn claim_before_root_fails() {
        let tree = tree();
        let d = Distributor::new(
            DistributorConfig::new(CONTROLLER, ContextId(1)),
            InMemoryLedger::new(),
        );
        d.fund(6000).unwrap();
        assert_eq!(claim_at(&d, &tree, 0).unwrap_err(), ClaimError::RootNotSet);
    }

    #[test]
    fn update_root_permissions_and_idempotence() {
        let tree = tree();
        let d = Distributor::new(
            DistributorConfig::new(CONTROLLER, ContextId(1)),
            InMemoryLedger::new(),
        );
        let intruder = Address::from_bytes([0x22; 20]);
        assert_eq!(
            d.update_root(&intruder, tree.root()).unwrap_err(),
            ClaimError::PermissionDenied { caller: intruder }
        );
        assert_eq!(d.current_root(), None);

        assert!(d.update_root(&CONTROLLER, tree.root()).unwrap());
        assert!(!d.update_root(&CONTROLLER, tree.root()).unwrap());
        assert_eq!(d.current_root(), Some(tree.root()));
        assert_eq!(d.events().len(), 1);

        assert_eq!(
            d.update_root(&CONTROLLER, Hash32::ZERO).unwrap_err(),
            ClaimError::InvalidRoot
        );
        assert_eq!(d.current_root(), Some(tree.root()));
    }

    #[test]
    fn rotation_invalidates_old_proofs_but_keeps_claims() {
        let old = tree();
        let d = ready(&old, 10_000);
        claim_at(&d, &old, 0).unwrap();

        let new = MerkleTree::build(
            vec![entry(0xdd, 500), entry(0xbb, 2000), entry(0xcc, 3000)],
            ContextId(1),
            DigestAlgorithm::Keccak256,
        )
        .unwrap();
        d.update_root(&CONTROLLER, new.root()).unwrap();

        // Old proof for index 2 no longer matches.
        assert_eq!(claim_at(&d, &old, 2).unwrap_err(), ClaimError::InvalidProof { index: 2 });
        // Index 0 stays claimed even though its leaf changed.
        assert_eq!(claim_at(&d, &new, 0).unwrap_err(), ClaimError::AlreadyClaimed { index: 0 });
        assert_eq!(claim_at(&d, &new, 2).unwrap(), 3000);
    }

    #[test]
    fn foreign_context_entry_does_not_verify() {
        let tree = MerkleTree::build(
            vec![entry(0xaa, 1000), entry(0xbb, 2000)],
            ContextId(5),
            DigestAlgorithm::Keccak256,
        )
        .unwrap();
        let d = ready(&tree, 6000);
        assert_eq!(claim_at(&d, &tree, 0).unwrap_err(), ClaimError::InvalidProof { index: 0 });
    }

    #[test]
    fn sha256_configuration() {
        let tree = MerkleTree::build(
            vec![entry(0xaa, 1000), entry(0xbb, 2000)],
            ContextId(1),
            DigestAlgorithm::Sha256,
        )
        .unwrap();
        let d = Distributor::new(
            DistributorConfig::new(CONTROLLER, ContextId(1)).with_algorithm(DigestAlgorithm::Sha256),
            InMemoryLedger::new(),
        );
        d.update_root(&CONTROLLER, tree.root()).unwrap();
        d.fund(3000).unwrap();
        assert_eq!(claim_at(&d, &tree, 1).unwrap(), 2000);
    }

    #[test]
    fn rejected_transfer_rolls_back() {
        let tree = tree();
        let d = ready(&tree, 6000);
        let bb = Address::from_bytes([0xbb; 20]);
        d.transfer_backend().reject(bb);

        let err = claim_at(&d, &tree, 1).unwrap_err();
        assert!(matches!(err, ClaimError::TransferFailed { index: 1, .. }));
        assert_eq!(d.status(1), ClaimStatus::Unclaimed);
        assert_eq!(d.available_balance(), 6000);
        assert_eq!(d.total_claimed(), 0);
        assert_eq!(d.events().len(), 2);

        d.transfer_backend().accept(&bb);
        assert_eq!(claim_at(&d, &tree, 1).unwrap(), 2000);
    }

    /// Panics on its first transfer, then defers to the ledger.
    struct PanicsOnce {
        ledger: InMemoryLedger,
        armed: parking_lot::Mutex<bool>,
    }

    impl NativeTransfer for PanicsOnce {
        fn transfer(&self, recipient: &Address, amount: u128) -> Result<(), TransferError> {
            if std::mem::replace(&mut *self.armed.lock(), false) {
                panic!("backend failure");
            }
            self.ledger.transfer(recipient, amount)
        }
    }

    #[test]
    fn panicking_transfer_releases_reservation() {
        let tree = tree();
        let d = Distributor::new(
            DistributorConfig::new(CONTROLLER, ContextId(1)),
            PanicsOnce {
                ledger: InMemoryLedger::new(),
                armed: parking_lot::Mutex::new(true),
            },
        );
        d.update_root(&CONTROLLER, tree.root()).unwrap();
        d.fund(6000).unwrap();

        let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| claim_at(&d, &tree, 0)));
        assert!(unwound.is_err());
        assert_eq!(d.status(0), ClaimStatus::Unclaimed);
        assert!(d.blocked_indices().is_empty());
        assert_eq!(d.available_balance(), 6000);
        assert_eq!(d.total_claimed(), 0);
        assert_eq!(d.events().len(), 2);

        assert_eq!(claim_at(&d, &tree, 0).unwrap(), 1000);
        assert_eq!(d.available_balance(), 5000);
        assert_eq!(d.transfer_backend().ledger.balance_of(&Address::from_bytes([0xaa; 20])), 1000);
        // The released amount counts once toward the lifetime total.
        assert_eq!(d.fund(u128::MAX - 6000).unwrap(), u128::MAX - 1000);
    }

    #[test]
    fn fund_overflow() {
        let tree = tree();
        let d = ready(&tree, u128::MAX - 10);
        assert_eq!(d.fund(11).unwrap_err(), ClaimError::ArithmeticOverflow);
        claim_at(&d, &tree, 0).unwrap();
        // Paid-out funds still count toward the lifetime total.
        assert_eq!(d.fund(11).unwrap_err(), ClaimError::ArithmeticOverflow);
        assert_eq!(d.fund(10).unwrap(), u128::MAX - 1000);
    }

    /// Re-enters `claim` from inside the transfer.
    struct Reentrant {
        ledger: InMemoryLedger,
        target: parking_lot::Mutex<Weak<Distributor<Reentrant>>>,
        attack: parking_lot::Mutex<Option<(WhitelistEntry, u64, Proof)>>,
        observed: parking_lot::Mutex<Vec<Result<u128, ClaimError>>>,
        observed_status: parking_lot::Mutex<Vec<ClaimStatus>>,
        observed_indices: parking_lot::Mutex<Vec<(Vec<u64>, Vec<u64>)>>,
    }

    impl NativeTransfer for Reentrant {
        fn transfer(&self, recipient: &Address, amount: u128) -> Result<(), TransferError> {
            let target = self.target.lock().upgrade();
            let attack = self.attack.lock().take();
            if let (Some(d), Some((entry, index, proof))) = (target, attack) {
                self.observed_status.lock().push(d.status(index));
                self.observed_indices
                    .lock()
                    .push((d.blocked_indices(), d.claimed_indices()));
                let result = d.claim(&entry, index, &proof);
                self.observed.lock().push(result);
            }
            self.ledger.transfer(recipient, amount)
        }
    }

    fn reentrant(tree: &MerkleTree, funds: u128) -> Arc<Distributor<Reentrant>> {
        let d = Arc::new(Distributor::new(
            DistributorConfig::new(CONTROLLER, ContextId(1)),
            Reentrant {
                ledger: InMemoryLedger::new(),
                target: parking_lot::Mutex::new(Weak::new()),
                attack: parking_lot::Mutex::new(None),
                observed: parking_lot::Mutex::new(Vec::new()),
                observed_status: parking_lot::Mutex::new(Vec::new()),
                observed_indices: parking_lot::Mutex::new(Vec::new()),
            },
        ));
        *d.transfer_backend().target.lock() = Arc::downgrade(&d);
        d.update_root(&CONTROLLER, tree.root()).unwrap();
        d.fund(funds).unwrap();
        d
    }

    #[test]
    fn reentrant_claim_of_same_index_is_rejected() {
        let tree = tree();
        let d = reentrant(&tree, 6000);
        *d.transfer_backend().attack.lock() =
            Some((tree.item(0).unwrap().clone(), 0, tree.proof(0).unwrap()));

        assert_eq!(claim_at(&*d, &tree, 0).unwrap(), 1000);

        let backend = d.transfer_backend();
        assert_eq!(backend.observed_status.lock().as_slice(), &[ClaimStatus::Reserved]);
        assert_eq!(
            backend.observed.lock().as_slice(),
            &[Err(ClaimError::AlreadyClaimed { index: 0 })]
        );
        assert_eq!(backend.ledger.balance_of(&Address::from_bytes([0xaa; 20])), 1000);
        assert_eq!(d.available_balance(), 5000);
    }

    #[test]
    fn in_flight_index_is_blocked_but_not_claimed() {
        let tree = tree();
        let d = reentrant(&tree, 6000);
        claim_at(&*d, &tree, 1).unwrap();
        *d.transfer_backend().attack.lock() =
            Some((tree.item(2).unwrap().clone(), 2, tree.proof(2).unwrap()));

        assert_eq!(claim_at(&*d, &tree, 2).unwrap(), 3000);

        // Seen from inside the transfer of index 2.
        assert_eq!(
            d.transfer_backend().observed_indices.lock().as_slice(),
            &[(vec![1, 2], vec![1])]
        );
        assert_eq!(d.blocked_indices(), vec![1, 2]);
        assert_eq!(d.claimed_indices(), vec![1, 2]);
    }

    #[test]
    fn reentrant_claim_sees_debited_balance() {
        let tree = tree();
        // Enough for index 2 only; the nested claim of index 0 must not see
        // the funds already reserved for index 2.
        let d = reentrant(&tree, 3000);
        *d.transfer_backend().attack.lock() =
            Some((tree.item(0).unwrap().clone(), 0, tree.proof(0).unwrap()));

        assert_eq!(claim_at(&*d, &tree, 2).unwrap(), 3000);
        assert_eq!(
            d.transfer_backend().observed.lock().as_slice(),
            &[Err(ClaimError::InsufficientFunds {
                requested: 1000,
                available: 0
            })]
        );
        assert_eq!(d.total_claimed(), 3000);
    }

    #[test]
    fn concurrent_claims_of_one_index() {
        let tree = Arc::new(tree());
        let d = Arc::new(ready(&tree, 6000));
        let barrier = Arc::new(std::sync::Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let (tree, d, barrier) = (Arc::clone(&tree), Arc::clone(&d), Arc::clone(&barrier));
                std::thread::spawn(move || {
                    barrier.wait();
                    claim_at(&*d, &tree, 1)
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| *e == ClaimError::AlreadyClaimed { index: 1 }));
        assert_eq!(d.available_balance(), 4000);
    }

    #[test]
    fn status_display() {
        assert_eq!(ClaimStatus::Reserved.to_string(), "RESERVED");
        assert!(ClaimStatus::Claimed.is_terminal());
        assert!(!ClaimStatus::Reserved.is_terminal());
    }
}
