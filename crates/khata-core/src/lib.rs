//! Core types and utilities for khata.
//!
//! This crate provides the foundational types used throughout the khata
//! bookkeeping core:
//!
//! - **Identifiers**: `PartyId`, `TransactionId`, `BillId`, `ActivityId`, `UserId`
//! - **Parties**: `Party`, `NewParty`, `PartyPatch`
//! - **Transactions**: `Transaction`, `TransactionKind`, `NewTransaction`, `TransactionPatch`
//! - **Bills**: `Bill`, `NewBill`
//! - **Activities**: `Activity`, `NewActivity`, `EntityKind`
//! - **Users**: `User`, `NewUser`
//!
//! # Money Unit
//!
//! **All amounts are integer paise. 1 rupee = 100 paise.**
//!
//! - A credit entry of Rs 500 is stored as `amount_paise = 50_000`
//! - Balances are signed paise: positive means the party owes us
//! - Stored as `i64` to avoid floating point precision issues

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod activity;
pub mod bill;
pub mod error;
pub mod ids;
pub mod party;
pub mod transaction;
pub mod user;

pub use activity::{rupees, Activity, EntityKind, NewActivity, SYSTEM_ACTOR};
pub use bill::{Bill, NewBill};
pub use error::{FieldError, LedgerError, Result};
pub use ids::{ActivityId, BillId, IdError, PartyId, TransactionId, UserId};
pub use party::{NewParty, Party, PartyPatch};
pub use transaction::{NewTransaction, Transaction, TransactionKind, TransactionPatch};
pub use user::{NewUser, User};
