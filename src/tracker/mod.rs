//! Tracker module
//!
//! Renders the counters, charts, entry form and transaction table, and
//! re-derives all of them from the ledger after every change.

mod aggregation;
mod charts;
mod counters;
mod handlers;
mod rows;
mod view;

pub use aggregation::{CategoryFilter, SortOrder, Totals, ViewOptions, monthly_expenses};
pub use counters::{COUNTER_DURATION_MS, CounterKind, CounterTransition, Counters};
pub use handlers::{
    TrackerState, TransactionForm, create_transaction_endpoint, delete_transaction_endpoint,
    export_transactions, get_tracker_content, get_tracker_page,
};
