//! Identifier types for khata.
//!
//! This module provides strongly-typed identifiers for parties, transactions,
//! bills, activities, and users.
//!
//! # Macro-based ID Types
//!
//! Every entity type is keyed by a per-type auto-incrementing counter, so all
//! identifiers are `u64` newtypes. The `int_id_type!` macro reduces
//! boilerplate for these types, ensuring consistent implementation of
//! serialization, parsing, and display traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Macro to define an integer-based identifier type with standard trait
/// implementations.
///
/// This macro generates a newtype wrapper around `u64` with implementations
/// for:
/// - `Clone`, `Copy`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - `Serialize`, `Deserialize` (as a plain number)
/// - `FromStr`, `Display`, `Debug`
/// - `From<u64>`, `From<Self> for u64`
///
/// # Example
///
/// ```ignore
/// int_id_type!(MyId, "A custom identifier type.");
/// let id = MyId::FIRST;
/// let parsed: MyId = "1".parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
macro_rules! int_id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// The first identifier a fresh counter hands out.
            pub const FIRST: Self = Self(1);

            /// Create an identifier from its raw counter value.
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Return the raw counter value.
            #[must_use]
            pub const fn value(self) -> u64 {
                self.0
            }

            /// Return the successor identifier.
            #[must_use]
            pub const fn next(self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s.parse::<u64>().map_err(|_| IdError::InvalidInteger)?;
                Ok(Self(value))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define integer identifier types using the macro
int_id_type!(PartyId, "A party (counterparty) identifier.");
int_id_type!(TransactionId, "A ledger transaction identifier.");
int_id_type!(BillId, "An uploaded bill identifier.");
int_id_type!(ActivityId, "An audit-trail activity identifier.");
int_id_type!(UserId, "A user identifier.");

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not a valid unsigned integer.
    #[error("invalid integer identifier")]
    InvalidInteger,
}
