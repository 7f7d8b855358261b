//! Storage layer for khata.
//!
//! This crate provides storage for parties, transactions, bills, activities,
//! and users, with per-type auto-incrementing integer ids, behind one
//! [`Store`] trait with two implementations:
//!
//! - [`MemoryStore`]: purely in-memory, state dies with the process
//! - [`JsonStore`]: in-memory plus one JSON array file per collection and a
//!   counters file, rewritten synchronously after every mutation
//!
//! The backend is selected once at startup (see [`StoreConfig`]); there is
//! no runtime switching. On top of the store sits the [`Ledger`], which owns
//! every cross-entity rule: the balance engine, activity logging, and
//! bill-to-transaction linking.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use khata_store::{JsonStore, Ledger};
//! use khata_core::{NewParty, NewTransaction, TransactionKind};
//!
//! let store = Arc::new(JsonStore::open("data/khata").unwrap());
//! let ledger = Ledger::new(store);
//!
//! let party = ledger
//!     .create_party(None, NewParty { name: "Sharma Traders".into(), ..NewParty::default() })
//!     .unwrap();
//!
//! let tx = ledger
//!     .create_transaction(None, NewTransaction {
//!         party_id: party.id,
//!         kind: TransactionKind::Credit,
//!         amount_paise: 50_000,
//!         date: None,
//!         reference: None,
//!         notes: None,
//!     })
//!     .unwrap();
//!
//! assert_eq!(ledger.get_party(party.id).unwrap().unwrap().balance_paise, 50_000);
//! # let _ = tx;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod files;
pub mod json;
pub mod ledger;
pub mod memory;
pub mod tables;

pub use config::{StorageBackend, StoreConfig};
pub use error::{Result, StoreError};
pub use json::JsonStore;
pub use ledger::{BillUpload, Ledger};
pub use memory::MemoryStore;

use khata_core::{
    Activity, Bill, BillId, NewActivity, NewBill, NewParty, NewTransaction, NewUser, Party,
    PartyId, PartyPatch, Transaction, TransactionId, TransactionPatch, User, UserId,
};

/// The storage trait defining all record operations.
///
/// This trait abstracts the storage layer over the in-memory and JSON
/// file-backed implementations. It is a plain record mapper: id assignment,
/// default field fill, and partial-update merging — every cross-entity rule
/// (balance arithmetic, activity appending, link invariants) belongs to the
/// [`Ledger`].
///
/// Lookups never fail on absence: `get_*` returns `Ok(None)` and `update_*`
/// returns `Ok(None)` when the id is unknown. No delete operation exists for
/// any entity type.
pub trait Store: Send + Sync {
    // =========================================================================
    // Party Operations
    // =========================================================================

    /// Assign the next party id and store a new party with zero balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn create_party(&self, new: NewParty) -> Result<Party>;

    /// Get a party by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn get_party(&self, id: PartyId) -> Result<Option<Party>>;

    /// List all parties.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn list_parties(&self) -> Result<Vec<Party>>;

    /// Merge a partial update into a party, refreshing `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn update_party(&self, id: PartyId, patch: PartyPatch) -> Result<Option<Party>>;

    /// Apply a balance adjustment to a party, stamping `last_activity_at`.
    ///
    /// Only the ledger's balance path may call this.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn adjust_party_balance(
        &self,
        id: PartyId,
        amount_paise: i64,
        is_credit: bool,
    ) -> Result<Option<Party>>;

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    /// Assign the next transaction id and store a new transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn create_transaction(&self, new: NewTransaction) -> Result<Transaction>;

    /// Get a transaction by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>>;

    /// List all transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn list_transactions(&self) -> Result<Vec<Transaction>>;

    /// Merge a partial update into a transaction, refreshing `updated_at`.
    ///
    /// The party balance is NOT recomputed here or anywhere else on update.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn update_transaction(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Option<Transaction>>;

    /// Set the bill side of a transaction link.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn set_transaction_bill(
        &self,
        id: TransactionId,
        bill_id: BillId,
    ) -> Result<Option<Transaction>>;

    // =========================================================================
    // Bill Operations
    // =========================================================================

    /// Assign the next bill id and store a new, unlinked bill.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn create_bill(&self, new: NewBill) -> Result<Bill>;

    /// Get a bill by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn get_bill(&self, id: BillId) -> Result<Option<Bill>>;

    /// List all bills.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn list_bills(&self) -> Result<Vec<Bill>>;

    /// Set the transaction side of a bill link.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn set_bill_transaction(&self, id: BillId, transaction_id: TransactionId) -> Result<Option<Bill>>;

    // =========================================================================
    // Activity Operations
    // =========================================================================

    /// Assign the next activity id and append an audit record.
    ///
    /// The trail is append-only; prior entries are never touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn append_activity(&self, new: NewActivity) -> Result<Activity>;

    /// List all activities, newest first by timestamp.
    ///
    /// This is the only collection with a mandated order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn list_activities(&self) -> Result<Vec<Activity>>;

    // =========================================================================
    // User Operations
    // =========================================================================

    /// Assign the next user id and store a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn create_user(&self, new: NewUser) -> Result<User>;

    /// Get a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn get_user(&self, id: UserId) -> Result<Option<User>>;

    /// Look up a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unusable.
    fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
}
