//! Database ID type definition.

/// Alias for the integer type used for transaction IDs.
///
/// IDs are assigned when a transaction is created and are never reused, so
/// they stay valid regardless of how a view filters or sorts the ledger.
pub type TransactionId = i64;
