//! Shared in-memory table state for both storage backends.
//!
//! All entity collections and the per-type id counters live here, so the
//! assignment and merge rules exist in exactly one place. `MemoryStore`
//! wraps [`Tables`] directly; `JsonStore` wraps it and adds persistence
//! after each mutation. Callers always receive clones, never references
//! into the maps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use khata_core::{
    Activity, ActivityId, Bill, BillId, NewActivity, NewBill, NewParty, NewTransaction, NewUser,
    Party, PartyId, PartyPatch, Transaction, TransactionId, TransactionPatch, User, UserId,
};

/// The five next-id counters. Counters start at 1 and never reuse values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counters {
    /// Next party id.
    pub party: u64,
    /// Next transaction id.
    pub transaction: u64,
    /// Next bill id.
    pub bill: u64,
    /// Next activity id.
    pub activity: u64,
    /// Next user id.
    pub user: u64,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            party: 1,
            transaction: 1,
            bill: 1,
            activity: 1,
            user: 1,
        }
    }
}

impl Counters {
    fn take(slot: &mut u64) -> u64 {
        let value = *slot;
        *slot += 1;
        value
    }

    /// Take the next party id.
    pub fn next_party(&mut self) -> PartyId {
        PartyId::new(Self::take(&mut self.party))
    }

    /// Take the next transaction id.
    pub fn next_transaction(&mut self) -> TransactionId {
        TransactionId::new(Self::take(&mut self.transaction))
    }

    /// Take the next bill id.
    pub fn next_bill(&mut self) -> BillId {
        BillId::new(Self::take(&mut self.bill))
    }

    /// Take the next activity id.
    pub fn next_activity(&mut self) -> ActivityId {
        ActivityId::new(Self::take(&mut self.activity))
    }

    /// Take the next user id.
    pub fn next_user(&mut self) -> UserId {
        UserId::new(Self::take(&mut self.user))
    }
}

/// All entity collections plus the id counters.
#[derive(Debug, Default)]
pub struct Tables {
    /// Parties by id.
    pub parties: BTreeMap<PartyId, Party>,
    /// Transactions by id.
    pub transactions: BTreeMap<TransactionId, Transaction>,
    /// Bills by id.
    pub bills: BTreeMap<BillId, Bill>,
    /// Activities by id.
    pub activities: BTreeMap<ActivityId, Activity>,
    /// Users by id.
    pub users: BTreeMap<UserId, User>,
    /// Next-id counters.
    pub counters: Counters,
}

impl Tables {
    // =========================================================================
    // Party Operations
    // =========================================================================

    /// Assign the next id and store a new party.
    pub fn create_party(&mut self, new: NewParty) -> Party {
        let party = Party::create(self.counters.next_party(), new);
        self.parties.insert(party.id, party.clone());
        party
    }

    /// Look up a party by id.
    #[must_use]
    pub fn get_party(&self, id: PartyId) -> Option<Party> {
        self.parties.get(&id).cloned()
    }

    /// All parties, id-ascending.
    #[must_use]
    pub fn list_parties(&self) -> Vec<Party> {
        self.parties.values().cloned().collect()
    }

    /// Merge a patch into an existing party.
    pub fn update_party(&mut self, id: PartyId, patch: PartyPatch) -> Option<Party> {
        let party = self.parties.get_mut(&id)?;
        party.apply(patch);
        Some(party.clone())
    }

    /// Apply a balance adjustment to a party and stamp its activity time.
    pub fn adjust_party_balance(
        &mut self,
        id: PartyId,
        amount_paise: i64,
        is_credit: bool,
    ) -> Option<Party> {
        let party = self.parties.get_mut(&id)?;
        if is_credit {
            party.credit(amount_paise);
        } else {
            party.debit(amount_paise);
        }
        Some(party.clone())
    }

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    /// Assign the next id and store a new transaction.
    pub fn create_transaction(&mut self, new: NewTransaction) -> Transaction {
        let transaction = Transaction::create(self.counters.next_transaction(), new);
        self.transactions.insert(transaction.id, transaction.clone());
        transaction
    }

    /// Look up a transaction by id.
    #[must_use]
    pub fn get_transaction(&self, id: TransactionId) -> Option<Transaction> {
        self.transactions.get(&id).cloned()
    }

    /// All transactions, id-ascending.
    #[must_use]
    pub fn list_transactions(&self) -> Vec<Transaction> {
        self.transactions.values().cloned().collect()
    }

    /// Merge a patch into an existing transaction.
    pub fn update_transaction(
        &mut self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Option<Transaction> {
        let transaction = self.transactions.get_mut(&id)?;
        transaction.apply(patch);
        Some(transaction.clone())
    }

    /// Set the bill side of a transaction link.
    pub fn set_transaction_bill(
        &mut self,
        id: TransactionId,
        bill_id: BillId,
    ) -> Option<Transaction> {
        let transaction = self.transactions.get_mut(&id)?;
        transaction.bill_id = Some(bill_id);
        transaction.updated_at = chrono::Utc::now();
        Some(transaction.clone())
    }

    // =========================================================================
    // Bill Operations
    // =========================================================================

    /// Assign the next id and store a new bill.
    pub fn create_bill(&mut self, new: NewBill) -> Bill {
        let bill = Bill::create(self.counters.next_bill(), new);
        self.bills.insert(bill.id, bill.clone());
        bill
    }

    /// Look up a bill by id.
    #[must_use]
    pub fn get_bill(&self, id: BillId) -> Option<Bill> {
        self.bills.get(&id).cloned()
    }

    /// All bills, id-ascending.
    #[must_use]
    pub fn list_bills(&self) -> Vec<Bill> {
        self.bills.values().cloned().collect()
    }

    /// Set the transaction side of a bill link.
    pub fn set_bill_transaction(&mut self, id: BillId, transaction_id: TransactionId) -> Option<Bill> {
        let bill = self.bills.get_mut(&id)?;
        bill.transaction_id = Some(transaction_id);
        Some(bill.clone())
    }

    // =========================================================================
    // Activity Operations
    // =========================================================================

    /// Assign the next id and append an activity record.
    pub fn append_activity(&mut self, new: NewActivity) -> Activity {
        let activity = Activity::create(self.counters.next_activity(), new);
        self.activities.insert(activity.id, activity.clone());
        activity
    }

    /// All activities, newest first by timestamp (id-descending tiebreak).
    #[must_use]
    pub fn list_activities(&self) -> Vec<Activity> {
        let mut activities: Vec<Activity> = self.activities.values().cloned().collect();
        activities.sort_by(|a, b| b.at.cmp(&a.at).then(b.id.cmp(&a.id)));
        activities
    }

    // =========================================================================
    // User Operations
    // =========================================================================

    /// Assign the next id and store a new user.
    pub fn create_user(&mut self, new: NewUser) -> User {
        let user = User::create(self.counters.next_user(), new);
        self.users.insert(user.id, user.clone());
        user
    }

    /// Look up a user by id.
    #[must_use]
    pub fn get_user(&self, id: UserId) -> Option<User> {
        self.users.get(&id).cloned()
    }

    /// Look up a user by username.
    #[must_use]
    pub fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.users.values().find(|u| u.username == username).cloned()
    }
}
