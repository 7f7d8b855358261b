//! Ledger transaction types for khata.
//!
//! Every balance change against a party is recorded as a transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BillId, PartyId, TransactionId};

/// A ledger entry against a party.
///
/// Amounts are always stored positive; only [`TransactionKind`] determines
/// the sign of the balance effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID.
    pub id: TransactionId,

    /// The party whose balance this entry affects.
    pub party_id: PartyId,

    /// Whether the entry increases (credit) or decreases (deposit) what the
    /// party owes.
    pub kind: TransactionKind,

    /// Amount in paise, always positive.
    pub amount_paise: i64,

    /// Entry date as supplied by the user. May differ from `created_at`
    /// when entries are recorded after the fact.
    pub date: DateTime<Utc>,

    /// Optional reference string (invoice number, cheque number, ...).
    pub reference: Option<String>,

    /// Optional free-form notes.
    pub notes: Option<String>,

    /// The bill evidencing this entry, once one is linked.
    /// If set, that bill's `transaction_id` points back here.
    pub bill_id: Option<BillId>,

    /// When the transaction was created.
    pub created_at: DateTime<Utc>,

    /// When the transaction was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Kind of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// The party owes more (goods/services given on credit).
    Credit,

    /// The party paid something back (partial or full repayment).
    Deposit,
}

impl TransactionKind {
    /// Check if this kind adds to the party's balance.
    #[must_use]
    pub const fn is_credit(self) -> bool {
        matches!(self, Self::Credit)
    }
}

/// Input for creating a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    /// The party this entry is against.
    pub party_id: PartyId,

    /// Credit or deposit.
    pub kind: TransactionKind,

    /// Amount in paise, must be positive.
    pub amount_paise: i64,

    /// Entry date; defaults to now when absent.
    pub date: Option<DateTime<Utc>>,

    /// Optional reference string.
    pub reference: Option<String>,

    /// Optional notes.
    pub notes: Option<String>,
}

/// Partial update for a transaction. Absent fields are left untouched.
///
/// Applying a patch never touches `bill_id`; bill links are managed by the
/// ledger's linking operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionPatch {
    /// New entry kind.
    pub kind: Option<TransactionKind>,

    /// New amount in paise.
    pub amount_paise: Option<i64>,

    /// New entry date.
    pub date: Option<DateTime<Utc>>,

    /// New reference string.
    pub reference: Option<String>,

    /// New notes.
    pub notes: Option<String>,
}

impl Transaction {
    /// Create a new transaction record.
    #[must_use]
    pub fn create(id: TransactionId, new: NewTransaction) -> Self {
        let now = Utc::now();
        Self {
            id,
            party_id: new.party_id,
            kind: new.kind,
            amount_paise: new.amount_paise,
            date: new.date.unwrap_or(now),
            reference: new.reference,
            notes: new.notes,
            bill_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The signed balance effect of this entry: positive for credit,
    /// negative for deposit.
    #[must_use]
    pub const fn signed_amount(&self) -> i64 {
        match self.kind {
            TransactionKind::Credit => self.amount_paise,
            TransactionKind::Deposit => -self.amount_paise,
        }
    }

    /// Merge a partial update into this transaction and refresh `updated_at`.
    ///
    /// The party balance is NOT recomputed when `kind` or `amount_paise`
    /// change; the balance keeps the creation-time effect.
    pub fn apply(&mut self, patch: TransactionPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(amount_paise) = patch.amount_paise {
            self.amount_paise = amount_paise;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(reference) = patch.reference {
            self.reference = Some(reference);
        }
        if let Some(notes) = patch.notes {
            self.notes = Some(notes);
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_tx(kind: TransactionKind, amount_paise: i64) -> NewTransaction {
        NewTransaction {
            party_id: PartyId::FIRST,
            kind,
            amount_paise,
            date: None,
            reference: None,
            notes: None,
        }
    }

    #[test]
    fn credit_signed_amount_is_positive() {
        let tx = Transaction::create(TransactionId::FIRST, new_tx(TransactionKind::Credit, 500));
        assert_eq!(tx.signed_amount(), 500);
        assert!(tx.kind.is_credit());
    }

    #[test]
    fn deposit_signed_amount_is_negative() {
        let tx = Transaction::create(TransactionId::FIRST, new_tx(TransactionKind::Deposit, 200));
        assert_eq!(tx.signed_amount(), -200);
        assert!(!tx.kind.is_credit());
    }

    #[test]
    fn missing_date_defaults_to_creation_time() {
        let tx = Transaction::create(TransactionId::FIRST, new_tx(TransactionKind::Credit, 100));
        assert_eq!(tx.date, tx.created_at);
    }

    #[test]
    fn apply_leaves_bill_link_untouched() {
        let mut tx = Transaction::create(TransactionId::FIRST, new_tx(TransactionKind::Credit, 100));
        tx.bill_id = Some(BillId::FIRST);
        tx.apply(TransactionPatch {
            amount_paise: Some(250),
            notes: Some("revised".into()),
            ..TransactionPatch::default()
        });
        assert_eq!(tx.amount_paise, 250);
        assert_eq!(tx.notes.as_deref(), Some("revised"));
        assert_eq!(tx.bill_id, Some(BillId::FIRST));
    }

    #[test]
    fn kind_serde_is_snake_case() {
        let json = serde_json::to_string(&TransactionKind::Credit).unwrap();
        assert_eq!(json, "\"credit\"");
        let parsed: TransactionKind = serde_json::from_str("\"deposit\"").unwrap();
        assert_eq!(parsed, TransactionKind::Deposit);
    }
}
