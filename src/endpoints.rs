//! The endpoint URIs served by the tracker.
//!
//! For endpoints that take a parameter, e.g., '/transactions/{transaction_id}', use [format_endpoint].

/// The tracker page with the counters, charts, entry form and transaction table.
pub const ROOT: &str = "/";
/// The swappable tracker content, requested when the filter or sort order changes.
pub const TRACKER_CONTENT: &str = "/tracker";
/// The route for creating transactions from the entry form.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for deleting a single transaction.
pub const DELETE_TRANSACTION: &str = "/transactions/{transaction_id}";
/// The JSON export of every stored transaction.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The page to display when an unexpected error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/internal-server-error";

/// Replace the first `{parameter}` in `endpoint_path` with `id`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |end| param_start + end + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
