//! The shared page layout, Tailwind class lists and number formatting.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};

pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 rounded-lg font-medium text-white \
    bg-emerald-600 hover:bg-emerald-700 dark:bg-emerald-500 dark:hover:bg-emerald-600 \
    disabled:bg-emerald-800";

pub const BUTTON_DELETE_STYLE: &str = "text-rose-600 hover:text-rose-500 \
    dark:text-rose-400 dark:hover:text-rose-300 underline bg-transparent cursor-pointer";

pub const FORM_LABEL_STYLE: &str = "block mb-1 text-sm font-medium text-slate-700 dark:text-slate-200";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2 rounded-lg text-sm \
    text-slate-900 dark:text-white bg-white dark:bg-slate-700 \
    border border-slate-300 dark:border-slate-600 \
    focus:ring-emerald-500 focus:border-emerald-500";

pub const TABLE_HEADER_STYLE: &str = "text-xs uppercase text-slate-600 dark:text-slate-300 \
    bg-slate-100 dark:bg-slate-700";
pub const TABLE_ROW_STYLE: &str =
    "border-b border-slate-200 dark:border-slate-700 bg-white dark:bg-slate-800";
pub const TABLE_CELL_STYLE: &str = "px-4 py-3";

pub const CATEGORY_BADGE_STYLE: &str = "px-2 py-0.5 rounded-full text-xs font-semibold \
    text-emerald-800 bg-emerald-100 dark:text-emerald-200 dark:bg-emerald-900";

pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col gap-6 w-full max-w-5xl px-4 py-6 mx-auto text-slate-900 dark:text-white";

const HTMX_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/htmx.org@2.0.8/dist/htmx.min.js";
const HTMX_RESPONSE_TARGETS_SCRIPT: &str =
    "https://cdn.jsdelivr.net/npm/htmx-ext-response-targets@2.0.4/dist/response-targets.min.js";
const TAILWIND_SCRIPT: &str = "https://cdn.tailwindcss.com";

/// Extra `<head>` content a page needs on top of Tailwind and htmx.
pub enum HeadElement {
    /// The URL of a JavaScript file.
    ScriptLink(String),
    /// Inline JavaScript.
    ScriptSource(PreEscaped<String>),
}

/// Wrap `content` in the document shell shared by every full page.
///
/// The page title is suffixed with the app name. Alerts returned by htmx
/// requests are swapped into `#alert-container`.
pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Finance Tracker" }

                script src=(TAILWIND_SCRIPT) {}
                script src=(HTMX_SCRIPT) {}
                script src=(HTMX_RESPONSE_TARGETS_SCRIPT) {}

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptLink(url) => script src=(url) {}
                        HeadElement::ScriptSource(source) => script { (source) }
                    }
                }
            }

            body hx-ext="response-targets" class="min-h-screen bg-slate-50 dark:bg-slate-900"
            {
                header class="px-4 py-3 bg-emerald-700 text-white shadow"
                {
                    a href="/" class="text-lg font-semibold" { "Finance Tracker" }
                }

                main { (content) }

                div
                    id="alert-container"
                    class="fixed bottom-4 left-1/2 -translate-x-1/2 z-50 w-full max-w-md px-4"
                {}
            }
        }
    }
}

/// Format `amount` as the currency symbol followed by the raw number, e.g. "₹1234.5".
///
/// No thousands separators are applied. Large amounts are written out in
/// full rather than in exponent form, e.g. `1e21` is "₹1000000000000000000000".
pub fn format_currency(currency_symbol: &str, amount: f64) -> String {
    format!("{currency_symbol}{amount}")
}

/// Format `number` with thousands separators and at most three decimal
/// places, e.g. "-12,000" or "1,234.25".
pub fn format_grouped(number: f64) -> String {
    static GROUPED: OnceLock<Option<Formatter>> = OnceLock::new();

    let millis = (number.abs() * 1000.0).round();
    if millis == 0.0 {
        // Also keeps "-0" out of the output.
        return "0".to_owned();
    }

    let whole = (millis / 1000.0).trunc();
    let fraction = millis - whole * 1000.0;

    let grouped = GROUPED.get_or_init(|| {
        Formatter::currency("")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(0)))
    });
    let whole_text = match grouped {
        Some(formatter) if whole > 0.0 => formatter.fmt_string(whole),
        _ => format!("{whole:.0}"),
    };

    let sign = if number < 0.0 { "-" } else { "" };

    if fraction == 0.0 {
        format!("{sign}{whole_text}")
    } else {
        let fraction_text = format!("{fraction:03.0}");
        format!("{sign}{whole_text}.{}", fraction_text.trim_end_matches('0'))
    }
}
