//! Persistence for the ledger.
//!
//! [TransactionLog] is the contract the ledger writes through to. Two back
//! ends implement it:
//! - [KeyValueTransactionLog] serializes the whole sequence as one JSON array
//!   in a [KeyValueStore] on every change.
//! - [SqliteTransactionLog] keeps one row per transaction.

mod key_value;
mod log;
mod table;

pub use key_value::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use log::{KeyValueTransactionLog, NEXT_ID_KEY, TRANSACTIONS_KEY, TransactionLog};
pub use table::SqliteTransactionLog;
