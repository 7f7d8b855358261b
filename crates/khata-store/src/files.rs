//! Persisted file layout for the JSON-backed store.
//!
//! Each entity collection is one JSON array file; the id counters live in a
//! single JSON object file alongside them.

/// File names inside the store's data directory.
pub mod file {
    /// Party records, as a JSON array.
    pub const PARTIES: &str = "parties.json";

    /// Transaction records, as a JSON array.
    pub const TRANSACTIONS: &str = "transactions.json";

    /// Bill records, as a JSON array.
    pub const BILLS: &str = "bills.json";

    /// Activity records, as a JSON array.
    pub const ACTIVITIES: &str = "activities.json";

    /// User records, as a JSON array.
    pub const USERS: &str = "users.json";

    /// The five next-id counters, as a JSON object.
    pub const COUNTERS: &str = "counters.json";
}

/// Returns all data file names the store reads on open.
#[must_use]
pub fn all_files() -> Vec<&'static str> {
    vec![
        file::PARTIES,
        file::TRANSACTIONS,
        file::BILLS,
        file::ACTIVITIES,
        file::USERS,
        file::COUNTERS,
    ]
}
