//! Purely in-memory storage implementation.
//!
//! This module provides the `MemoryStore` implementation of the `Store`
//! trait. State lives only for the lifetime of the process; it is the
//! backend of choice for tests and throwaway runs.

use std::sync::{Mutex, MutexGuard};

use khata_core::{
    Activity, Bill, BillId, NewActivity, NewBill, NewParty, NewTransaction, NewUser, Party,
    PartyId, PartyPatch, Transaction, TransactionId, TransactionPatch, User, UserId,
};

use crate::error::{Result, StoreError};
use crate::tables::Tables;
use crate::Store;

/// In-memory storage implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the table state, surfacing a poisoned lock as a storage error.
    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl Store for MemoryStore {
    // =========================================================================
    // Party Operations
    // =========================================================================

    fn create_party(&self, new: NewParty) -> Result<Party> {
        Ok(self.lock()?.create_party(new))
    }

    fn get_party(&self, id: PartyId) -> Result<Option<Party>> {
        Ok(self.lock()?.get_party(id))
    }

    fn list_parties(&self) -> Result<Vec<Party>> {
        Ok(self.lock()?.list_parties())
    }

    fn update_party(&self, id: PartyId, patch: PartyPatch) -> Result<Option<Party>> {
        Ok(self.lock()?.update_party(id, patch))
    }

    fn adjust_party_balance(
        &self,
        id: PartyId,
        amount_paise: i64,
        is_credit: bool,
    ) -> Result<Option<Party>> {
        Ok(self.lock()?.adjust_party_balance(id, amount_paise, is_credit))
    }

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    fn create_transaction(&self, new: NewTransaction) -> Result<Transaction> {
        Ok(self.lock()?.create_transaction(new))
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
        Ok(self.lock()?.update_transaction(id, patch))
    }

    fn set_transaction_bill(
        &self,
        id: TransactionId,
        bill_id: BillId,
    ) -> Result<Option<Transaction>> {
        Ok(self.lock()?.set_transaction_bill(id, bill_id))
    }

    // =========================================================================
    // Bill Operations
    // =========================================================================

    fn create_bill(&self, new: NewBill) -> Result<Bill> {
        Ok(self.lock()?.create_bill(new))
    }

    fn get_bill(&self, id: BillId) -> Result<Option<Bill>> {
        Ok(self.lock()?.get_bill(id))
    }

    fn list_bills(&self) -> Result<Vec<Bill>> {
        Ok(self.lock()?.list_bills())
    }

    fn set_bill_transaction(&self, id: BillId, transaction_id: TransactionId) -> Result<Option<Bill>> {
        Ok(self.lock()?.set_bill_transaction(id, transaction_id))
    }

    // =========================================================================
    // Activity Operations
    // =========================================================================

    fn append_activity(&self, new: NewActivity) -> Result<Activity> {
        Ok(self.lock()?.append_activity(new))
    }

    fn list_activities(&self) -> Result<Vec<Activity>> {
        Ok(self.lock()?.list_activities())
    }

    // =========================================================================
    // User Operations
    // =========================================================================

    fn create_user(&self, new: NewUser) -> Result<User> {
        Ok(self.lock()?.create_user(new))
    }

    fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.lock()?.get_user(id))
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.lock()?.find_user_by_username(username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use khata_core::TransactionKind;

    #[test]
    fn party_crud() {
        let store = MemoryStore::new();
        let party = store
            .create_party(NewParty {
                name: "Gupta Hardware".into(),
                ..NewParty::default()
            })
            .unwrap();
        assert_eq!(party.id, PartyId::new(1));

        let retrieved = store.get_party(party.id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Gupta Hardware");

        let updated = store
            .update_party(
                party.id,
                PartyPatch {
                    description: Some("retail".into()),
                    ..PartyPatch::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("retail"));

        assert!(store.get_party(PartyId::new(42)).unwrap().is_none());
    }

    #[test]
    fn balance_adjustment_requires_existing_party() {
        let store = MemoryStore::new();
        assert!(store
            .adjust_party_balance(PartyId::new(1), 100, true)
            .unwrap()
            .is_none());

        let party = store
            .create_party(NewParty {
                name: "Gupta Hardware".into(),
                ..NewParty::default()
            })
            .unwrap();
        let adjusted = store
            .adjust_party_balance(party.id, 100, true)
            .unwrap()
            .unwrap();
        assert_eq!(adjusted.balance_paise, 100);
        assert!(adjusted.last_activity_at.is_some());
    }

    #[test]
    fn bill_link_sides_are_independent_writes() {
        let store = MemoryStore::new();
        let party = store
            .create_party(NewParty {
                name: "Gupta Hardware".into(),
                ..NewParty::default()
            })
            .unwrap();
        let tx = store
            .create_transaction(NewTransaction {
                party_id: party.id,
                kind: TransactionKind::Credit,
                amount_paise: 500,
                date: None,
                reference: None,
                notes: None,
            })
            .unwrap();
        let bill = store
            .create_bill(NewBill {
                party_id: party.id,
                filename: "b.pdf".into(),
                filepath: "uploads/b.pdf".into(),
                reference: None,
                amount_paise: None,
                uploaded_at: None,
            })
            .unwrap();

        store.set_transaction_bill(tx.id, bill.id).unwrap().unwrap();
        store.set_bill_transaction(bill.id, tx.id).unwrap().unwrap();

        assert_eq!(
            store.get_transaction(tx.id).unwrap().unwrap().bill_id,
            Some(bill.id)
        );
        assert_eq!(
            store.get_bill(bill.id).unwrap().unwrap().transaction_id,
            Some(tx.id)
        );
    }

    #[test]
    fn find_user_by_username() {
        let store = MemoryStore::new();
        store
            .create_user(NewUser {
                username: "ramesh".into(),
                password_hash: "$2b$10$abc".into(),
            })
            .unwrap();
        assert!(store.find_user_by_username("ramesh").unwrap().is_some());
        assert!(store.find_user_by_username("suresh").unwrap().is_none());
    }
}
