//! Bill types for khata.
//!
//! A bill is an uploaded document (typically a scanned PDF) evidencing a
//! transaction. The file itself lives on disk at `filepath`; upload and
//! download handling belong to the HTTP collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BillId, PartyId, TransactionId};

/// An uploaded bill document.
///
/// At most one bill may be linked to a given transaction; the ledger's
/// linking operations enforce that, not the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    /// Unique bill ID.
    pub id: BillId,

    /// The party this bill belongs to.
    pub party_id: PartyId,

    /// The transaction this bill evidences, once linked.
    /// If set, that transaction's `bill_id` points back here.
    pub transaction_id: Option<TransactionId>,

    /// Original filename as uploaded.
    pub filename: String,

    /// Server-local storage path of the document.
    pub filepath: String,

    /// Optional reference string (bill/invoice number).
    pub reference: Option<String>,

    /// Bill amount in paise, when known.
    pub amount_paise: Option<i64>,

    /// When the document was uploaded.
    pub uploaded_at: DateTime<Utc>,

    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a bill record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBill {
    /// The party this bill belongs to.
    pub party_id: PartyId,

    /// Original filename as uploaded.
    pub filename: String,

    /// Server-local storage path of the document.
    pub filepath: String,

    /// Optional reference string.
    pub reference: Option<String>,

    /// Bill amount in paise, when known.
    pub amount_paise: Option<i64>,

    /// Upload time; defaults to now when absent.
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl Bill {
    /// Create a new, unlinked bill record.
    #[must_use]
    pub fn create(id: BillId, new: NewBill) -> Self {
        let now = Utc::now();
        Self {
            id,
            party_id: new.party_id,
            transaction_id: None,
            filename: new.filename,
            filepath: new.filepath,
            reference: new.reference,
            amount_paise: new.amount_paise,
            uploaded_at: new.uploaded_at.unwrap_or(now),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bill_is_unlinked() {
        let bill = Bill::create(
            BillId::FIRST,
            NewBill {
                party_id: PartyId::FIRST,
                filename: "inv-042.pdf".into(),
                filepath: "uploads/inv-042.pdf".into(),
                reference: Some("INV-042".into()),
                amount_paise: Some(125_000),
                uploaded_at: None,
            },
        );
        assert!(bill.transaction_id.is_none());
        assert_eq!(bill.uploaded_at, bill.created_at);
        assert_eq!(bill.amount_paise, Some(125_000));
    }
}
