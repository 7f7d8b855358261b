//! Ledger orchestration over a [`Store`].
//!
//! The `Ledger` owns every cross-entity rule: input validation, the balance
//! engine, the audit trail, and bill-to-transaction linking. It is
//! constructed once at process start with the selected backend and passed by
//! handle into callers; there is no global instance.
//!
//! Each operation runs its steps sequentially within the one call
//! (mutation, then balance effect where applicable, then activity append;
//! the file-backed store adds its disk write per step). Multi-step
//! workflows such as [`Ledger::upload_bill`] stay behind a single call and
//! return one composite result, so a transaction boundary can later wrap
//! them without touching call sites.

use std::sync::Arc;

use khata_core::{
    Activity, Bill, BillId, FieldError, LedgerError, NewActivity, NewBill, NewParty,
    NewTransaction, NewUser, Party, PartyId, PartyPatch, Result, Transaction, TransactionId,
    TransactionKind, TransactionPatch, User,
};

use crate::Store;

/// Result of the bill upload workflow: the stored bill and, when the upload
/// carried an amount, the auto-created CREDIT transaction linked to it.
#[derive(Debug, Clone)]
pub struct BillUpload {
    /// The stored bill, with its link side set when a transaction was made.
    pub bill: Bill,

    /// The auto-created transaction, if any.
    pub transaction: Option<Transaction>,
}

/// The bookkeeping ledger.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn Store>,
}

impl Ledger {
    /// Create a ledger over the selected storage backend.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    // =========================================================================
    // Party Operations
    // =========================================================================

    /// Create a party and record the activity.
    ///
    /// # Errors
    ///
    /// - `Validation` if the name is empty.
    /// - `DuplicateGstin` if another party already carries the GSTIN.
    pub fn create_party(&self, performed_by: Option<&str>, new: NewParty) -> Result<Party> {
        let mut errors = Vec::new();
        if new.name.trim().is_empty() {
            errors.push(FieldError::new("name", "is required"));
        }
        if !errors.is_empty() {
            return Err(LedgerError::validation(errors));
        }
        if let Some(gstin) = new.gstin.as_deref() {
            self.ensure_gstin_free(gstin, None)?;
        }

        let party = self.store.create_party(new)?;
        self.store
            .append_activity(NewActivity::party_created(performed_by, &party))?;
        tracing::info!(party_id = %party.id, name = %party.name, "created party");
        Ok(party)
    }

    /// Merge a partial update into a party and record the activity.
    ///
    /// # Errors
    ///
    /// - `PartyNotFound` if the id is unknown.
    /// - `Validation` if a patched name is empty.
    /// - `DuplicateGstin` if another party already carries a patched GSTIN.
    pub fn update_party(
        &self,
        performed_by: Option<&str>,
        id: PartyId,
        patch: PartyPatch,
    ) -> Result<Party> {
        if self.store.get_party(id)?.is_none() {
            return Err(LedgerError::PartyNotFound { id });
        }
        if let Some(name) = patch.name.as_deref() {
            if name.trim().is_empty() {
                return Err(LedgerError::validation(vec![FieldError::new(
                    "name",
                    "is required",
                )]));
            }
        }
        if let Some(gstin) = patch.gstin.as_deref() {
            self.ensure_gstin_free(gstin, Some(id))?;
        }

        let party = self
            .store
            .update_party(id, patch)?
            .ok_or(LedgerError::PartyNotFound { id })?;
        self.store
            .append_activity(NewActivity::party_updated(performed_by, &party))?;
        Ok(party)
    }

    /// Get a party by id.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend is unusable.
    pub fn get_party(&self, id: PartyId) -> Result<Option<Party>> {
        Ok(self.store.get_party(id)?)
    }

    /// List all parties.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend is unusable.
    pub fn list_parties(&self) -> Result<Vec<Party>> {
        Ok(self.store.list_parties()?)
    }

    /// Apply a balance change to a party. Credit adds, deposit subtracts;
    /// `last_activity_at` is stamped either way.
    ///
    /// This is the single authoritative mutation path for balances. No other
    /// operation adjusts a balance directly — in particular,
    /// [`Ledger::update_transaction`] never calls this.
    ///
    /// # Errors
    ///
    /// Returns `PartyNotFound` if the id is unknown.
    pub fn update_party_balance(
        &self,
        party_id: PartyId,
        amount_paise: i64,
        is_credit: bool,
    ) -> Result<Party> {
        self.store
            .adjust_party_balance(party_id, amount_paise, is_credit)?
            .ok_or(LedgerError::PartyNotFound { id: party_id })
    }

    fn ensure_gstin_free(&self, gstin: &str, exclude: Option<PartyId>) -> Result<()> {
        let taken = self.store.list_parties()?.into_iter().any(|p| {
            p.gstin.as_deref() == Some(gstin) && Some(p.id) != exclude
        });
        if taken {
            return Err(LedgerError::DuplicateGstin {
                gstin: gstin.to_string(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    /// Record a ledger entry: store the transaction, apply its balance
    /// effect, and record the activity.
    ///
    /// The balance is updated exactly once, immediately after the
    /// transaction record itself is stored.
    ///
    /// # Errors
    ///
    /// - `Validation` if the amount is not positive.
    /// - `PartyNotFound` if the party is unknown.
    pub fn create_transaction(
        &self,
        performed_by: Option<&str>,
        new: NewTransaction,
    ) -> Result<Transaction> {
        if new.amount_paise <= 0 {
            return Err(LedgerError::validation(vec![FieldError::new(
                "amount_paise",
                "must be positive",
            )]));
        }
        let party = self
            .store
            .get_party(new.party_id)?
            .ok_or(LedgerError::PartyNotFound { id: new.party_id })?;

        let transaction = self.store.create_transaction(new)?;
        self.update_party_balance(
            transaction.party_id,
            transaction.amount_paise,
            transaction.kind.is_credit(),
        )?;
        self.store.append_activity(NewActivity::transaction_created(
            performed_by,
            &transaction,
            &party.name,
        ))?;
        tracing::info!(
            transaction_id = %transaction.id,
            party_id = %transaction.party_id,
            amount_paise = transaction.amount_paise,
            "recorded transaction"
        );
        Ok(transaction)
    }

    /// Merge a partial update into a transaction and record the activity.
    ///
    /// The party balance keeps the creation-time effect even when `kind` or
    /// `amount_paise` change.
    ///
    /// # Errors
    ///
    /// - `TransactionNotFound` if the id is unknown.
    /// - `Validation` if a patched amount is not positive.
    pub fn update_transaction(
        &self,
        performed_by: Option<&str>,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction> {
        if let Some(amount_paise) = patch.amount_paise {
            if amount_paise <= 0 {
                return Err(LedgerError::validation(vec![FieldError::new(
                    "amount_paise",
                    "must be positive",
                )]));
            }
        }
        let transaction = self
            .store
            .update_transaction(id, patch)?
            .ok_or(LedgerError::TransactionNotFound { id })?;
        let party_name = self
            .store
            .get_party(transaction.party_id)?
            .map_or_else(|| format!("party {}", transaction.party_id), |p| p.name);
        self.store.append_activity(NewActivity::transaction_updated(
            performed_by,
            &transaction,
            &party_name,
        ))?;
        Ok(transaction)
    }

    /// Get a transaction by id.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend is unusable.
    pub fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>> {
        Ok(self.store.get_transaction(id)?)
    }

    /// All entries against one party, newest entry date first.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend is unusable.
    pub fn transactions_for_party(&self, party_id: PartyId) -> Result<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .store
            .list_transactions()?
            .into_iter()
            .filter(|t| t.party_id == party_id)
            .collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    /// The most recent entries across all parties, newest entry date first.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend is unusable.
    pub fn recent_transactions(&self, limit: usize) -> Result<Vec<Transaction>> {
        let mut transactions = self.store.list_transactions()?;
        sort_newest_first(&mut transactions);
        transactions.truncate(limit);
        Ok(transactions)
    }

    /// Credit entries that have no bill linked yet, newest entry date first.
    ///
    /// These are the candidates for a direct bill upload.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend is unusable.
    pub fn credit_transactions_without_bill(&self) -> Result<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .store
            .list_transactions()?
            .into_iter()
            .filter(|t| t.kind.is_credit() && t.bill_id.is_none())
            .collect();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    // =========================================================================
    // Bill Operations
    // =========================================================================

    /// Create a bill record and record the activity. The bill starts
    /// unlinked; use the linking operations to tie it to a transaction.
    ///
    /// # Errors
    ///
    /// - `Validation` if filename/filepath are empty or a given amount is
    ///   not positive.
    /// - `PartyNotFound` if the party is unknown.
    pub fn create_bill(&self, performed_by: Option<&str>, new: NewBill) -> Result<Bill> {
        let mut errors = Vec::new();
        if new.filename.trim().is_empty() {
            errors.push(FieldError::new("filename", "is required"));
        }
        if new.filepath.trim().is_empty() {
            errors.push(FieldError::new("filepath", "is required"));
        }
        if let Some(amount_paise) = new.amount_paise {
            if amount_paise <= 0 {
                errors.push(FieldError::new("amount_paise", "must be positive"));
            }
        }
        if !errors.is_empty() {
            return Err(LedgerError::validation(errors));
        }
        let party = self
            .store
            .get_party(new.party_id)?
            .ok_or(LedgerError::PartyNotFound { id: new.party_id })?;

        let bill = self.store.create_bill(new)?;
        self.store
            .append_activity(NewActivity::bill_created(performed_by, &bill, &party.name))?;
        Ok(bill)
    }

    /// Get a bill by id.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend is unusable.
    pub fn get_bill(&self, id: BillId) -> Result<Option<Bill>> {
        Ok(self.store.get_bill(id)?)
    }

    /// List all bills.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend is unusable.
    pub fn list_bills(&self) -> Result<Vec<Bill>> {
        Ok(self.store.list_bills()?)
    }

    /// All bills belonging to one party.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend is unusable.
    pub fn bills_for_party(&self, party_id: PartyId) -> Result<Vec<Bill>> {
        Ok(self
            .store
            .list_bills()?
            .into_iter()
            .filter(|b| b.party_id == party_id)
            .collect())
    }

    /// Tie a bill and a transaction together, setting both link sides.
    ///
    /// A missing transaction makes the call a silent no-op, as does a
    /// missing bill or a bill already linked to this same transaction —
    /// repeat calls with the same pair are idempotent.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend is unusable.
    pub fn link_bill_to_transaction(
        &self,
        bill_id: BillId,
        transaction_id: TransactionId,
    ) -> Result<()> {
        let Some(transaction) = self.store.get_transaction(transaction_id)? else {
            tracing::debug!(%transaction_id, "link target transaction missing, ignoring");
            return Ok(());
        };
        let Some(bill) = self.store.get_bill(bill_id)? else {
            tracing::debug!(%bill_id, "bill missing, ignoring link");
            return Ok(());
        };
        if bill.transaction_id == Some(transaction_id) {
            return Ok(());
        }

        self.store.set_transaction_bill(transaction.id, bill.id)?;
        self.store.set_bill_transaction(bill.id, transaction.id)?;
        tracing::info!(%bill_id, %transaction_id, "linked bill to transaction");
        Ok(())
    }

    /// The bill upload workflow: store the bill and, when it carries an
    /// amount, auto-create a matching CREDIT transaction and link the two.
    ///
    /// # Errors
    ///
    /// Same as [`Ledger::create_bill`]; validation happens before any record
    /// is stored.
    pub fn upload_bill(&self, performed_by: Option<&str>, new: NewBill) -> Result<BillUpload> {
        let bill = self.create_bill(performed_by, new)?;
        let Some(amount_paise) = bill.amount_paise else {
            return Ok(BillUpload {
                bill,
                transaction: None,
            });
        };

        let transaction = self.create_transaction(
            performed_by,
            NewTransaction {
                party_id: bill.party_id,
                kind: TransactionKind::Credit,
                amount_paise,
                date: Some(bill.uploaded_at),
                reference: bill.reference.clone(),
                notes: None,
            },
        )?;
        self.link_bill_to_transaction(bill.id, transaction.id)?;

        // Return the linked sides, not the pre-link snapshots.
        let bill = self
            .store
            .get_bill(bill.id)?
            .ok_or(LedgerError::BillNotFound { id: bill.id })?;
        let transaction = self
            .store
            .get_transaction(transaction.id)?
            .ok_or(LedgerError::TransactionNotFound { id: transaction.id })?;
        Ok(BillUpload {
            bill,
            transaction: Some(transaction),
        })
    }

    /// Upload a bill directly against an existing CREDIT transaction that
    /// has no bill yet.
    ///
    /// # Errors
    ///
    /// - `TransactionNotFound` if the transaction is unknown.
    /// - `NotACreditTransaction` if it is a deposit entry.
    /// - `BillAlreadyLinked` if it already has a bill.
    ///
    /// No bill record is persisted on any rejection.
    pub fn attach_bill_to_transaction(
        &self,
        performed_by: Option<&str>,
        transaction_id: TransactionId,
        new: NewBill,
    ) -> Result<Bill> {
        let transaction = self
            .store
            .get_transaction(transaction_id)?
            .ok_or(LedgerError::TransactionNotFound { id: transaction_id })?;
        if !transaction.kind.is_credit() {
            return Err(LedgerError::NotACreditTransaction { transaction_id });
        }
        if transaction.bill_id.is_some() {
            return Err(LedgerError::BillAlreadyLinked { transaction_id });
        }

        let bill = self.create_bill(performed_by, new)?;
        self.link_bill_to_transaction(bill.id, transaction_id)?;
        self.store
            .get_bill(bill.id)?
            .ok_or(LedgerError::BillNotFound { id: bill.id })
    }

    // =========================================================================
    // Activity Operations
    // =========================================================================

    /// The audit trail, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend is unusable.
    pub fn activities(&self) -> Result<Vec<Activity>> {
        Ok(self.store.list_activities()?)
    }

    // =========================================================================
    // User Operations
    // =========================================================================

    /// Create a user with a pre-hashed password.
    ///
    /// # Errors
    ///
    /// `Validation` if the username is empty or already taken.
    pub fn create_user(&self, new: NewUser) -> Result<User> {
        if new.username.trim().is_empty() {
            return Err(LedgerError::validation(vec![FieldError::new(
                "username",
                "is required",
            )]));
        }
        if self.store.find_user_by_username(&new.username)?.is_some() {
            return Err(LedgerError::validation(vec![FieldError::new(
                "username",
                "is already taken",
            )]));
        }
        Ok(self.store.create_user(new)?)
    }

    /// Look up a user by username.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend is unusable.
    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.store.find_user_by_username(username)?)
    }
}

fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
}
