//! Tracker HTTP handlers.
//!
//! Every handler that changes the ledger or the view options responds with
//! the re-derived tracker content, which htmx swaps into the page.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRequest;
use serde::Deserialize;

use crate::{
    AppState, Error,
    app_state::{TrackerSession, lock_session},
    database_id::TransactionId,
    timezone::local_today,
    tracker::{
        aggregation::{CategoryFilter, SortOrder, ViewOptions},
        view::{TrackerView, tracker_content, tracker_page},
    },
    transaction::{Category, NewTransaction, Transaction},
};

/// The state needed to render and change the tracker.
#[derive(Debug, Clone)]
pub struct TrackerState {
    /// The ledger and counters.
    pub session: Arc<Mutex<TrackerSession>>,
    /// The symbol shown before every amount, e.g. "₹".
    pub currency_symbol: String,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for TrackerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            session: state.session.clone(),
            currency_symbol: state.currency_symbol.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for adding a transaction.
///
/// Every field is optional so that incomplete submissions reach the handler
/// and are ignored there instead of being rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionForm {
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
    /// The amount as typed. Anything that does not parse counts as zero.
    #[serde(default)]
    pub amount: String,
    /// The category label, e.g. "income".
    #[serde(default)]
    pub category: String,
    /// The date the transaction happened, e.g. "2024-01-15".
    #[serde(default)]
    pub date: String,
    /// The table filter in effect when the form was submitted.
    #[serde(default)]
    pub filter: CategoryFilter,
    /// The table sort order in effect when the form was submitted.
    #[serde(default)]
    pub sort: SortOrder,
}

impl TransactionForm {
    fn to_new_transaction(&self) -> Option<NewTransaction> {
        let amount = self.amount.trim().parse::<f64>().unwrap_or(0.0);

        NewTransaction::new(
            &self.description,
            amount,
            Category::from_label(&self.category),
            &self.date,
        )
    }

    fn view_options(&self) -> ViewOptions {
        ViewOptions {
            filter: self.filter,
            sort: self.sort,
        }
    }
}

/// Display the tracker page.
///
/// A full page load starts every counter from zero. Requests made by htmx get
/// just the tracker content.
pub async fn get_tracker_page(
    State(state): State<TrackerState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(options): Query<ViewOptions>,
) -> Result<Response, Error> {
    let mut session = lock_session(&state.session)?;

    if is_htmx_request {
        return render_content(&state, &mut session, options);
    }

    session.counters.reset();
    let view = derive_view(&state, &mut session, options)?;

    Ok(tracker_page(&view).into_response())
}

/// Render the tracker content for a new filter or sort order.
pub async fn get_tracker_content(
    State(state): State<TrackerState>,
    Query(options): Query<ViewOptions>,
) -> Response {
    lock_session(&state.session)
        .and_then(|mut session| render_content(&state, &mut session, options))
        .unwrap_or_else(Error::into_alert_response)
}

/// A route handler for adding a transaction, responds with the tracker content.
///
/// Invalid input is ignored: the response is empty and the ledger is unchanged.
pub async fn create_transaction_endpoint(
    State(state): State<TrackerState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let Some(new_transaction) = form.to_new_transaction() else {
        tracing::debug!("ignoring invalid transaction {form:?}");
        return StatusCode::NO_CONTENT.into_response();
    };

    lock_session(&state.session)
        .and_then(|mut session| {
            session.ledger.add(new_transaction)?;
            render_content(&state, &mut session, form.view_options())
        })
        .unwrap_or_else(Error::into_alert_response)
}

/// A route handler for deleting a transaction, responds with the tracker
/// content or an alert if the transaction does not exist.
pub async fn delete_transaction_endpoint(
    State(state): State<TrackerState>,
    Path(transaction_id): Path<TransactionId>,
    Query(options): Query<ViewOptions>,
) -> Response {
    lock_session(&state.session)
        .and_then(|mut session| {
            session
                .ledger
                .delete(transaction_id)
                .inspect_err(|error| {
                    tracing::warn!("could not delete transaction {transaction_id}: {error}")
                })?;
            render_content(&state, &mut session, options)
        })
        .unwrap_or_else(Error::into_alert_response)
}

/// Export every transaction in append order as JSON.
pub async fn export_transactions(
    State(state): State<TrackerState>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let session = lock_session(&state.session)?;

    Ok(Json(session.ledger.transactions().to_vec()))
}

fn derive_view<'a>(
    state: &'a TrackerState,
    session: &mut TrackerSession,
    options: ViewOptions,
) -> Result<TrackerView<'a>, Error> {
    let today = local_today(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let TrackerSession { ledger, counters } = session;

    Ok(TrackerView::derive(
        ledger.transactions(),
        options,
        counters,
        &state.currency_symbol,
        Some(today),
    ))
}

fn render_content(
    state: &TrackerState,
    session: &mut TrackerSession,
    options: ViewOptions,
) -> Result<Response, Error> {
    let view = derive_view(state, session, options)?;

    Ok(tracker_content(&view).into_response())
}
