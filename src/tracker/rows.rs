//! Turns projected transactions into display-ready table rows.

use time::{format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::format_currency,
    tracker::aggregation::Projected,
    transaction::parse_date,
};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[day] [month repr:short] [year]");

/// A transaction formatted for the table.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct TransactionRow {
    pub id: TransactionId,
    /// Index in the unfiltered, unsorted sequence.
    pub position: usize,
    pub description: String,
    /// The full description when `description` was truncated.
    pub full_description: Option<String>,
    pub amount: String,
    pub amount_is_negative: bool,
    pub category: String,
    pub date: String,
    pub delete_url: String,
}

impl TransactionRow {
    pub fn new(projected: &Projected<'_>, currency_symbol: &str) -> Self {
        let transaction = projected.transaction;
        let (description, full_description) = format_description(&transaction.description);

        Self {
            id: transaction.id,
            position: projected.position,
            description,
            full_description: full_description.map(str::to_owned),
            amount: format_currency(currency_symbol, transaction.amount),
            amount_is_negative: transaction.amount < 0.0,
            category: capitalize(transaction.category.as_str()),
            date: format_date(&transaction.date),
            delete_url: format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id),
        }
    }
}

/// Format a stored date as e.g. "05 Jan 2024".
///
/// Dates that do not parse are returned unchanged, so an empty date stays empty.
pub(super) fn format_date(date: &str) -> String {
    parse_date(date)
        .and_then(|date| date.format(DISPLAY_DATE_FORMAT).ok())
        .unwrap_or_else(|| date.to_owned())
}

/// Uppercase the first character and leave the rest unchanged.
pub(super) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        (truncated + "...", Some(description))
    }
}
