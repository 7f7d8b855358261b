//! JSON file-backed storage implementation.
//!
//! This module provides the `JsonStore` implementation of the `Store` trait.
//! State is held in memory exactly as `MemoryStore` holds it; in addition,
//! every mutation synchronously rewrites the affected collection file and
//! the counters file in full. There is no append log and no atomic rename:
//! a crash mid-write can corrupt a file, which the next open treats as an
//! empty collection.
//!
//! Persistence is best-effort by policy: a failed disk write is logged and
//! the in-memory state still advances, with no rollback.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use khata_core::{
    Activity, Bill, BillId, NewActivity, NewBill, NewParty, NewTransaction, NewUser, Party,
    PartyId, PartyPatch, Transaction, TransactionId, TransactionPatch, User, UserId,
};

use crate::error::{Result, StoreError};
use crate::files::file;
use crate::tables::{Counters, Tables};
use crate::Store;

/// JSON file-backed storage implementation.
#[derive(Debug)]
pub struct JsonStore {
    data_dir: PathBuf,
    tables: Mutex<Tables>,
}

impl JsonStore {
    /// Open or create a JSON store rooted at the given directory.
    ///
    /// Missing files load as empty collections. Malformed files load as
    /// empty collections with a logged warning, never a fatal error.
    /// Counters are raised past the highest loaded id of each collection
    /// so a lost counters file cannot cause id reuse.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let data_dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;

        let mut tables = Tables {
            parties: load_collection::<Party>(&data_dir.join(file::PARTIES))
                .into_iter()
                .map(|p| (p.id, p))
                .collect(),
            transactions: load_collection::<Transaction>(&data_dir.join(file::TRANSACTIONS))
                .into_iter()
                .map(|t| (t.id, t))
                .collect(),
            bills: load_collection::<Bill>(&data_dir.join(file::BILLS))
                .into_iter()
                .map(|b| (b.id, b))
                .collect(),
            activities: load_collection::<Activity>(&data_dir.join(file::ACTIVITIES))
                .into_iter()
                .map(|a| (a.id, a))
                .collect(),
            users: load_collection::<User>(&data_dir.join(file::USERS))
                .into_iter()
                .map(|u| (u.id, u))
                .collect(),
            counters: load_counters(&data_dir.join(file::COUNTERS)),
        };
        raise_counters(&mut tables);

        tracing::info!(
            data_dir = %data_dir.display(),
            parties = tables.parties.len(),
            transactions = tables.transactions.len(),
            bills = tables.bills.len(),
            "opened JSON store"
        );

        Ok(Self {
            data_dir,
            tables: Mutex::new(tables),
        })
    }

    /// Lock the table state, surfacing a poisoned lock as a storage error.
    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Rewrite one collection file in full, best-effort.
    fn write_rows<T: Serialize>(&self, name: &str, rows: &[T]) {
        let path = self.data_dir.join(name);
        let payload = match serde_json::to_vec_pretty(rows) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(file = name, error = %e, "failed to serialize collection");
                return;
            }
        };
        if let Err(e) = fs::write(&path, payload) {
            tracing::error!(file = name, error = %e, "failed to persist collection");
        }
    }

    /// Rewrite the counters file, best-effort.
    fn write_counters(&self, counters: &Counters) {
        let path = self.data_dir.join(file::COUNTERS);
        let payload = match serde_json::to_vec_pretty(counters) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize counters");
                return;
            }
        };
        if let Err(e) = fs::write(&path, payload) {
            tracing::error!(error = %e, "failed to persist counters");
        }
    }

    fn persist_parties(&self, tables: &Tables) {
        self.write_rows(file::PARTIES, &tables.list_parties());
        self.write_counters(&tables.counters);
    }

    fn persist_transactions(&self, tables: &Tables) {
        self.write_rows(file::TRANSACTIONS, &tables.list_transactions());
        self.write_counters(&tables.counters);
    }

    fn persist_bills(&self, tables: &Tables) {
        self.write_rows(file::BILLS, &tables.list_bills());
        self.write_counters(&tables.counters);
    }

    fn persist_activities(&self, tables: &Tables) {
        // Activities are persisted in id order, not display order.
        let rows: Vec<Activity> = tables.activities.values().cloned().collect();
        self.write_rows(file::ACTIVITIES, &rows);
        self.write_counters(&tables.counters);
    }

    fn persist_users(&self, tables: &Tables) {
        let rows: Vec<User> = tables.users.values().cloned().collect();
        self.write_rows(file::USERS, &rows);
        self.write_counters(&tables.counters);
    }
}

/// Load a JSON array file into records. Missing or malformed files load as
/// an empty collection.
fn load_collection<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read collection, treating as empty");
            return Vec::new();
        }
    };
    match serde_json::from_str(&contents) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "malformed collection file, treating as empty");
            Vec::new()
        }
    }
}

/// Load the counters file, falling back to fresh counters.
fn load_counters(path: &Path) -> Counters {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Counters::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read counters, starting fresh");
            return Counters::default();
        }
    };
    match serde_json::from_str(&contents) {
        Ok(counters) => counters,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "malformed counters file, starting fresh");
            Counters::default()
        }
    }
}

/// Raise each counter past the highest id present in its collection.
fn raise_counters(tables: &mut Tables) {
    fn floor<K: Copy + Into<u64>, V>(map: &std::collections::BTreeMap<K, V>) -> u64 {
        map.keys().last().map_or(1, |k| (*k).into() + 1)
    }
    let c = &mut tables.counters;
    c.party = c.party.max(floor(&tables.parties));
    c.transaction = c.transaction.max(floor(&tables.transactions));
    c.bill = c.bill.max(floor(&tables.bills));
    c.activity = c.activity.max(floor(&tables.activities));
    c.user = c.user.max(floor(&tables.users));
}

impl Store for JsonStore {
    // =========================================================================
    // Party Operations
    // =========================================================================

    fn create_party(&self, new: NewParty) -> Result<Party> {
        let mut tables = self.lock()?;
        let party = tables.create_party(new);
        self.persist_parties(&tables);
        Ok(party)
    }

    fn get_party(&self, id: PartyId) -> Result<Option<Party>> {
        Ok(self.lock()?.get_party(id))
    }

    fn list_parties(&self) -> Result<Vec<Party>> {
        Ok(self.lock()?.list_parties())
    }

    fn update_party(&self, id: PartyId, patch: PartyPatch) -> Result<Option<Party>> {
        let mut tables = self.lock()?;
        let party = tables.update_party(id, patch);
        if party.is_some() {
            self.persist_parties(&tables);
        }
        Ok(party)
    }

    fn adjust_party_balance(
        &self,
        id: PartyId,
        amount_paise: i64,
        is_credit: bool,
    ) -> Result<Option<Party>> {
        let mut tables = self.lock()?;
        let party = tables.adjust_party_balance(id, amount_paise, is_credit);
        if party.is_some() {
            self.persist_parties(&tables);
        }
        Ok(party)
    }

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    fn create_transaction(&self, new: NewTransaction) -> Result<Transaction> {
        let mut tables = self.lock()?;
        let transaction = tables.create_transaction(new);
        self.persist_transactions(&tables);
        Ok(transaction)
    }

    fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>> {
        Ok(self.lock()?.get_transaction(id))
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.lock()?.list_transactions())
    }

    fn update_transaction(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Option<Transaction>> {
        let mut tables = self.lock()?;
        let transaction = tables.update_transaction(id, patch);
        if transaction.is_some() {
            self.persist_transactions(&tables);
        }
        Ok(transaction)
    }

    fn set_transaction_bill(
        &self,
        id: TransactionId,
        bill_id: BillId,
    ) -> Result<Option<Transaction>> {
        let mut tables = self.lock()?;
        let transaction = tables.set_transaction_bill(id, bill_id);
        if transaction.is_some() {
            self.persist_transactions(&tables);
        }
        Ok(transaction)
    }

    // =========================================================================
    // Bill Operations
    // =========================================================================

    fn create_bill(&self, new: NewBill) -> Result<Bill> {
        let mut tables = self.lock()?;
        let bill = tables.create_bill(new);
        self.persist_bills(&tables);
        Ok(bill)
    }

    fn get_bill(&self, id: BillId) -> Result<Option<Bill>> {
        Ok(self.lock()?.get_bill(id))
    }

    fn list_bills(&self) -> Result<Vec<Bill>> {
        Ok(self.lock()?.list_bills())
    }

    fn set_bill_transaction(&self, id: BillId, transaction_id: TransactionId) -> Result<Option<Bill>> {
        let mut tables = self.lock()?;
        let bill = tables.set_bill_transaction(id, transaction_id);
        if bill.is_some() {
            self.persist_bills(&tables);
        }
        Ok(bill)
    }

    // =========================================================================
    // Activity Operations
    // =========================================================================

    fn append_activity(&self, new: NewActivity) -> Result<Activity> {
        let mut tables = self.lock()?;
        let activity = tables.append_activity(new);
        self.persist_activities(&tables);
        Ok(activity)
    }

    fn list_activities(&self) -> Result<Vec<Activity>> {
        Ok(self.lock()?.list_activities())
    }

    // =========================================================================
    // User Operations
    // =========================================================================

    fn create_user(&self, new: NewUser) -> Result<User> {
        let mut tables = self.lock()?;
        let user = tables.create_user(new);
        self.persist_users(&tables);
        Ok(user)
    }

    fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.lock()?.get_user(id))
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.lock()?.find_user_by_username(username))
    }
}
