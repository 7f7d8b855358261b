//! Party types for khata.
//!
//! A party is a counterparty (customer or vendor) carrying a running balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::PartyId;

/// A counterparty with a running balance.
///
/// The balance is the algebraic sum of all linked transactions' signed
/// amounts: CREDIT entries add to it, DEPOSIT entries subtract from it.
/// Only the ledger's balance path mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Unique party ID, assigned at creation and never changed.
    pub id: PartyId,

    /// Display name of the party.
    pub name: String,

    /// Optional free-form description.
    pub description: Option<String>,

    /// Optional GSTIN tax identifier. Unique among parties when present.
    pub gstin: Option<String>,

    /// Current running balance in paise.
    /// 1 rupee = 100 paise. Stored as `i64` integer paise to avoid
    /// floating point precision issues. Positive = the party owes us.
    pub balance_paise: i64,

    /// When the party's balance last changed, if ever.
    pub last_activity_at: Option<DateTime<Utc>>,

    /// When the party was created.
    pub created_at: DateTime<Utc>,

    /// When the party was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a party.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewParty {
    /// Display name (required, non-empty).
    pub name: String,

    /// Optional free-form description.
    pub description: Option<String>,

    /// Optional GSTIN tax identifier.
    pub gstin: Option<String>,
}

/// Partial update for a party. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartyPatch {
    /// New display name.
    pub name: Option<String>,

    /// New description.
    pub description: Option<String>,

    /// New GSTIN tax identifier.
    pub gstin: Option<String>,
}

impl Party {
    /// Create a new party with zero balance.
    #[must_use]
    pub fn create(id: PartyId, new: NewParty) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: new.name,
            description: new.description,
            gstin: new.gstin,
            balance_paise: 0,
            last_activity_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial update into this party and refresh `updated_at`.
    pub fn apply(&mut self, patch: PartyPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(gstin) = patch.gstin {
            self.gstin = Some(gstin);
        }
        self.updated_at = Utc::now();
    }

    /// Add to the balance (a CREDIT entry) and stamp the activity time.
    pub fn credit(&mut self, amount_paise: i64) {
        self.balance_paise += amount_paise;
        self.touch_activity();
    }

    /// Subtract from the balance (a DEPOSIT entry) and stamp the activity time.
    pub fn debit(&mut self, amount_paise: i64) {
        self.balance_paise -= amount_paise;
        self.touch_activity();
    }

    fn touch_activity(&mut self) {
        let now = Utc::now();
        self.last_activity_at = Some(now);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_party_has_zero_balance() {
        let party = Party::create(
            PartyId::FIRST,
            NewParty {
                name: "Sharma Traders".into(),
                ..NewParty::default()
            },
        );
        assert_eq!(party.balance_paise, 0);
        assert!(party.last_activity_at.is_none());
        assert!(party.gstin.is_none());
    }

    #[test]
    fn credit_and_debit_adjust_balance() {
        let mut party = Party::create(
            PartyId::FIRST,
            NewParty {
                name: "Sharma Traders".into(),
                ..NewParty::default()
            },
        );
        party.credit(50_000);
        assert_eq!(party.balance_paise, 50_000);
        party.debit(20_000);
        assert_eq!(party.balance_paise, 30_000);
        assert!(party.last_activity_at.is_some());
    }

    #[test]
    fn apply_merges_present_fields_only() {
        let mut party = Party::create(
            PartyId::FIRST,
            NewParty {
                name: "Sharma Traders".into(),
                description: Some("wholesale".into()),
                gstin: None,
            },
        );
        let before = party.updated_at;
        party.apply(PartyPatch {
            gstin: Some("27AAPFU0939F1ZV".into()),
            ..PartyPatch::default()
        });
        assert_eq!(party.name, "Sharma Traders");
        assert_eq!(party.description.as_deref(), Some("wholesale"));
        assert_eq!(party.gstin.as_deref(), Some("27AAPFU0939F1ZV"));
        assert!(party.updated_at >= before);
    }
}
