//! A personal finance tracker.
//!
//! Records income, expense and investment transactions, persists them, and
//! serves a single page with running totals, animated counters, charts and a
//! filterable, sortable transaction table.
//!
//! This library provides a REST API that directly serves HTML pages. Every
//! change to the ledger re-derives the totals, monthly trend and charts from
//! the full transaction sequence, and htmx swaps the result into the page.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod database_id;
mod endpoints;
mod error;
mod error_page;
mod html;
mod ledger;
mod logging;
mod routing;
pub mod storage;
mod timezone;
pub mod tracker;
pub mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, TrackerSession};
pub use database_id::TransactionId;
pub use error::Error;
pub use ledger::Ledger;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
