//! Error types for khata.

use serde::{Deserialize, Serialize};

use crate::ids::IdError;
use crate::{BillId, PartyId, TransactionId};

/// Result type for khata operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// A single field-level validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field.
    pub field: String,

    /// What was wrong with it.
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur in khata ledger operations.
///
/// Validation, not-found, and conflict failures are reported before any
/// mutation is performed. Storage failures in the file-backed store are
/// handled best-effort inside the store and only surface here when an
/// operation cannot proceed at all.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// One or more input fields failed validation.
    #[error("validation failed: {}", format_fields(.errors))]
    Validation {
        /// Field-level details for the caller.
        errors: Vec<FieldError>,
    },

    /// Party not found.
    #[error("party not found: {id}")]
    PartyNotFound {
        /// The party ID that was not found.
        id: PartyId,
    },

    /// Transaction not found.
    #[error("transaction not found: {id}")]
    TransactionNotFound {
        /// The transaction ID that was not found.
        id: TransactionId,
    },

    /// Bill not found.
    #[error("bill not found: {id}")]
    BillNotFound {
        /// The bill ID that was not found.
        id: BillId,
    },

    /// The transaction already has a bill linked to it.
    #[error("transaction {transaction_id} already has a bill linked")]
    BillAlreadyLinked {
        /// The transaction that is already billed.
        transaction_id: TransactionId,
    },

    /// Bills may only be attached to credit transactions.
    #[error("transaction {transaction_id} is not a credit entry")]
    NotACreditTransaction {
        /// The offending transaction.
        transaction_id: TransactionId,
    },

    /// Another party already carries this GSTIN.
    #[error("GSTIN already registered: {gstin}")]
    DuplicateGstin {
        /// The duplicated tax identifier.
        gstin: String,
    },

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}

impl LedgerError {
    /// Build a validation error from field-level details.
    #[must_use]
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors }
    }
}

fn format_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_fields() {
        let err = LedgerError::validation(vec![
            FieldError::new("name", "is required"),
            FieldError::new("amount_paise", "must be positive"),
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: name: is required, amount_paise: must be positive"
        );
    }

    #[test]
    fn not_found_messages_carry_ids() {
        let err = LedgerError::PartyNotFound {
            id: PartyId::new(9),
        };
        assert_eq!(err.to_string(), "party not found: 9");
    }
}
