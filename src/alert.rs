//! Error alerts that htmx swaps into the page's alert container.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// A dismissable error message shown at the bottom of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// The headline of the alert.
    pub message: String,
    /// Extra text explaining what went wrong and how to fix it.
    pub details: String,
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Html<String> {
        Html(self.markup().into_string())
    }

    fn markup(&self) -> Markup {
        html!(
            div
                role="alert"
                class="flex items-start gap-3 p-4 mb-4 text-sm text-red-800 rounded-lg
                    bg-red-50 dark:bg-gray-800 dark:text-red-400 shadow-lg"
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="mt-1" { (self.details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="font-bold"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        )
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn renders_message_and_details() {
        let alert = Alert {
            message: "Could not delete transaction".to_owned(),
            details: "Try again.".to_owned(),
        };

        let html = Html::parse_fragment(&alert.into_html().0);
        let selector = Selector::parse("div[role=alert] p").unwrap();
        let text: Vec<String> = html
            .select(&selector)
            .map(|p| p.text().collect::<String>())
            .collect();

        assert_eq!(text, vec!["Could not delete transaction", "Try again."]);
    }
}
