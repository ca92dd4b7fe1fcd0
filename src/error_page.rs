//! Full-page responses for missing routes and unexpected failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{endpoints, html::base};

/// A page that explains an error and links back to the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPage {
    /// The status code the page is sent with.
    pub status: StatusCode,
    /// A one-line summary, e.g. "Something's missing."
    pub headline: String,
    /// What the user or operator can do about it.
    pub fix: String,
}

impl ErrorPage {
    /// The page for routes and resources that do not exist.
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            headline: "Something's missing.".to_owned(),
            fix: "There is nothing at this address. Your transactions are on the tracker page."
                .to_owned(),
        }
    }

    /// The generic page for failures the user cannot fix.
    pub fn internal_error() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            headline: "Sorry, something went wrong.".to_owned(),
            fix: "Try again later or check the server logs.".to_owned(),
        }
    }

    /// An internal error page with a specific explanation.
    pub fn internal_error_with(headline: &str, fix: &str) -> Self {
        Self {
            headline: headline.to_owned(),
            fix: fix.to_owned(),
            ..Self::internal_error()
        }
    }

    fn markup(&self) -> Markup {
        let code = self.status.as_u16();
        let title = self.status.canonical_reason().unwrap_or("Error");

        let content = html!(
            section class="flex flex-col items-center px-4 py-16 mx-auto max-w-screen-sm text-center"
            {
                p class="mb-4 text-7xl lg:text-9xl font-extrabold text-emerald-600 dark:text-emerald-500"
                {
                    (code)
                }

                h1 class="mb-4 text-3xl md:text-4xl font-bold" { (self.headline) }

                p class="mb-8 text-lg text-gray-600 dark:text-gray-300" { (self.fix) }

                a
                    href=(endpoints::ROOT)
                    class="px-5 py-2.5 rounded-lg text-sm font-medium text-white
                        bg-emerald-600 hover:bg-emerald-700"
                {
                    "Back to the tracker"
                }
            }
        );

        base(title, &[], &content)
    }
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        (self.status, self.markup()).into_response()
    }
}

/// The fallback handler for unknown routes.
pub async fn get_404_not_found() -> Response {
    ErrorPage::not_found().into_response()
}

/// Display the generic internal error page.
pub async fn get_internal_server_error_page() -> Response {
    ErrorPage::internal_error().into_response()
}
