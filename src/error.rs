//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, error_page::ErrorPage};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while serializing the transactions as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// The persisted transactions could not be read back.
    ///
    /// Holds the parsing error so the operator can repair or remove the
    /// stored value by hand.
    #[error("the stored transactions are corrupt: {0}")]
    CorruptStore(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the ledger lock.
    #[error("could not acquire the ledger lock")]
    LedgerLockError,

    /// Tried to delete a transaction that does not exist, either by an
    /// unknown ID or by a position past the end of the ledger.
    #[error("tried to delete a transaction that is not in the ledger")]
    DeleteMissingTransaction,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::DeleteMissingTransaction => {
                ErrorPage::not_found().into_response()
            }
            Error::InvalidTimezoneError(timezone) => ErrorPage::internal_error_with(
                "The server's timezone is invalid.",
                &timezone_fix(&timezone),
            )
            .into_response(),
            Error::CorruptStore(reason) => {
                tracing::error!("Could not read the stored transactions: {reason}");
                ErrorPage::internal_error_with(
                    "Your saved transactions could not be read.",
                    "The stored data is corrupt. Check the server logs for the parsing error.",
                )
                .into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                ErrorPage::internal_error().into_response()
            }
        }
    }
}

fn timezone_fix(timezone: &str) -> String {
    format!(
        "Could not get local timezone \"{timezone}\". Start the server with a canonical \
        timezone name such as \"Asia/Kolkata\" or \"Etc/UTC\"."
    )
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert {
                    message: "Could not delete transaction".to_owned(),
                    details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: timezone_fix(&timezone),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn missing_transaction_alert_is_not_found() {
        let response = Error::DeleteMissingTransaction.into_alert_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn lock_error_renders_internal_error_page() {
        let response = Error::LedgerLockError.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
