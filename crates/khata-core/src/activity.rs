//! Activity audit-trail types for khata.
//!
//! Every party/transaction/bill mutation appends one activity record. The
//! trail is append-only: records are never rewritten or removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ActivityId, Bill, Party, Transaction, TransactionKind};

/// The actor recorded when no authenticated user context reaches the ledger.
pub const SYSTEM_ACTOR: &str = "system";

/// An immutable audit-log entry describing a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity ID.
    pub id: ActivityId,

    /// Username of the actor, or `"system"` when unknown.
    pub performed_by: String,

    /// Human-readable summary of the mutation.
    pub description: String,

    /// Kind of entity the mutation touched, when applicable.
    pub entity: Option<EntityKind>,

    /// Raw ID of the touched entity.
    pub entity_id: Option<u64>,

    /// Display name of the touched entity.
    pub entity_name: Option<String>,

    /// Extra detail text (amounts, references).
    pub details: Option<String>,

    /// When the mutation happened.
    pub at: DateTime<Utc>,
}

/// Kind of entity an activity refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A counterparty.
    Party,

    /// A ledger transaction.
    Transaction,

    /// An uploaded bill.
    Bill,
}

/// Input for appending an activity. The store assigns the ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActivity {
    /// Username of the actor, or `"system"`.
    pub performed_by: String,

    /// Human-readable summary.
    pub description: String,

    /// Kind of entity touched.
    pub entity: Option<EntityKind>,

    /// Raw ID of the touched entity.
    pub entity_id: Option<u64>,

    /// Display name of the touched entity.
    pub entity_name: Option<String>,

    /// Extra detail text.
    pub details: Option<String>,
}

impl Activity {
    /// Create a stored activity record, stamping the current time.
    #[must_use]
    pub fn create(id: ActivityId, new: NewActivity) -> Self {
        Self {
            id,
            performed_by: new.performed_by,
            description: new.description,
            entity: new.entity,
            entity_id: new.entity_id,
            entity_name: new.entity_name,
            details: new.details,
            at: Utc::now(),
        }
    }
}

impl NewActivity {
    fn actor(performed_by: Option<&str>) -> String {
        performed_by.unwrap_or(SYSTEM_ACTOR).to_string()
    }

    /// Record the creation of a party.
    #[must_use]
    pub fn party_created(performed_by: Option<&str>, party: &Party) -> Self {
        Self {
            performed_by: Self::actor(performed_by),
            description: format!("Created party {}", party.name),
            entity: Some(EntityKind::Party),
            entity_id: Some(party.id.value()),
            entity_name: Some(party.name.clone()),
            details: party.gstin.as_ref().map(|g| format!("GSTIN {g}")),
        }
    }

    /// Record an update to a party.
    #[must_use]
    pub fn party_updated(performed_by: Option<&str>, party: &Party) -> Self {
        Self {
            performed_by: Self::actor(performed_by),
            description: format!("Updated party {}", party.name),
            entity: Some(EntityKind::Party),
            entity_id: Some(party.id.value()),
            entity_name: Some(party.name.clone()),
            details: None,
        }
    }

    /// Record the creation of a transaction against a party.
    #[must_use]
    pub fn transaction_created(
        performed_by: Option<&str>,
        transaction: &Transaction,
        party_name: &str,
    ) -> Self {
        let kind = kind_label(transaction.kind);
        Self {
            performed_by: Self::actor(performed_by),
            description: format!(
                "Recorded {kind} of {} for {party_name}",
                rupees(transaction.amount_paise)
            ),
            entity: Some(EntityKind::Transaction),
            entity_id: Some(transaction.id.value()),
            entity_name: Some(party_name.to_string()),
            details: transaction.reference.as_ref().map(|r| format!("Ref {r}")),
        }
    }

    /// Record an update to a transaction.
    #[must_use]
    pub fn transaction_updated(
        performed_by: Option<&str>,
        transaction: &Transaction,
        party_name: &str,
    ) -> Self {
        let kind = kind_label(transaction.kind);
        Self {
            performed_by: Self::actor(performed_by),
            description: format!(
                "Updated {kind} of {} for {party_name}",
                rupees(transaction.amount_paise)
            ),
            entity: Some(EntityKind::Transaction),
            entity_id: Some(transaction.id.value()),
            entity_name: Some(party_name.to_string()),
            details: transaction.reference.as_ref().map(|r| format!("Ref {r}")),
        }
    }

    /// Record the creation of a bill.
    #[must_use]
    pub fn bill_created(performed_by: Option<&str>, bill: &Bill, party_name: &str) -> Self {
        Self {
            performed_by: Self::actor(performed_by),
            description: format!("Uploaded bill {} for {party_name}", bill.filename),
            entity: Some(EntityKind::Bill),
            entity_id: Some(bill.id.value()),
            entity_name: Some(party_name.to_string()),
            details: bill.amount_paise.map(|a| format!("Amount {}", rupees(a))),
        }
    }
}

const fn kind_label(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Credit => "credit",
        TransactionKind::Deposit => "deposit",
    }
}

/// Format a paise amount as rupees for audit text, e.g. `Rs 500.00`.
#[must_use]
pub fn rupees(paise: i64) -> String {
    let sign = if paise < 0 { "-" } else { "" };
    let abs = paise.unsigned_abs();
    format!("Rs {sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewParty, NewTransaction, Party, PartyId, Transaction, TransactionId};

    fn party() -> Party {
        Party::create(
            PartyId::FIRST,
            NewParty {
                name: "Sharma Traders".into(),
                ..NewParty::default()
            },
        )
    }

    #[test]
    fn rupees_formatting() {
        assert_eq!(rupees(50_000), "Rs 500.00");
        assert_eq!(rupees(5), "Rs 0.05");
        assert_eq!(rupees(-12_345), "Rs -123.45");
    }

    #[test]
    fn default_actor_is_system() {
        let activity = NewActivity::party_created(None, &party());
        assert_eq!(activity.performed_by, SYSTEM_ACTOR);
        assert_eq!(activity.description, "Created party Sharma Traders");
    }

    #[test]
    fn transaction_activity_embeds_amount_and_party() {
        let tx = Transaction::create(
            TransactionId::FIRST,
            NewTransaction {
                party_id: PartyId::FIRST,
                kind: TransactionKind::Credit,
                amount_paise: 50_000,
                date: None,
                reference: Some("INV-042".into()),
                notes: None,
            },
        );
        let activity = NewActivity::transaction_created(Some("ramesh"), &tx, "Sharma Traders");
        assert_eq!(activity.performed_by, "ramesh");
        assert_eq!(
            activity.description,
            "Recorded credit of Rs 500.00 for Sharma Traders"
        );
        assert_eq!(activity.details.as_deref(), Some("Ref INV-042"));
        assert_eq!(activity.entity, Some(EntityKind::Transaction));
    }
}
