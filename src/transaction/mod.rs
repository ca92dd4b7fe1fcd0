//! Transaction records for the tracker.
//!
//! This module contains the `Transaction` model, its `Category`, and
//! `NewTransaction`, which validates entry form input before a transaction
//! is added to the ledger.

mod core;

pub use self::core::{Category, NewTransaction, Transaction, parse_date};
