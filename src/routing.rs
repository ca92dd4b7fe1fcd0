//! Application router configuration.

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::{
    AppState, endpoints,
    error_page::{get_404_not_found, get_internal_server_error_page},
    tracker::{
        create_transaction_endpoint, delete_transaction_endpoint, export_transactions,
        get_tracker_content, get_tracker_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_tracker_page))
        .route(endpoints::TRACKER_CONTENT, get(get_tracker_content))
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(
            endpoints::DELETE_TRANSACTION,
            delete(delete_transaction_endpoint),
        )
        .route(endpoints::TRANSACTIONS_API, get(export_transactions))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}
