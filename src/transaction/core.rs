//! Defines the core data models for transactions.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::database_id::TransactionId;

const ISO_DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

// ============================================================================
// MODELS
// ============================================================================

/// Which total a transaction counts towards.
///
/// Any label other than "income" or "expense" is read as [Category::Investment],
/// which doubles as the bucket for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Category {
    /// Money earned, e.g. a salary.
    Income,
    /// Money spent, e.g. rent.
    Expense,
    /// Money invested, or anything that is neither income nor expense.
    Investment,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 3] = [Category::Income, Category::Expense, Category::Investment];

    /// The lowercase label used in forms, query strings and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Income => "income",
            Category::Expense => "expense",
            Category::Investment => "investment",
        }
    }

    /// Read a category label, treating anything unrecognised as [Category::Investment].
    pub fn from_label(label: &str) -> Self {
        match label {
            "income" => Category::Income,
            "expense" => Category::Expense,
            _ => Category::Investment,
        }
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An income, expense or investment recorded in the ledger.
///
/// To create a new `Transaction`, build a [NewTransaction] and add it to a
/// [Ledger](crate::Ledger).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, stable for the life of the ledger.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money earned, spent or invested.
    pub amount: f64,
    /// Which total the amount counts towards.
    pub category: Category,
    /// When the transaction happened, as submitted, e.g. "2024-01-15".
    pub date: String,
}

impl Transaction {
    /// The calendar date of the transaction, or `None` if `date` does not parse.
    pub fn parsed_date(&self) -> Option<Date> {
        parse_date(&self.date)
    }
}

/// A validated transaction that has not been assigned an ID yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    description: String,
    amount: f64,
    category: Category,
    date: String,
}

impl NewTransaction {
    /// Validate the fields of a transaction entry.
    ///
    /// The description and date are trimmed. Returns `None` if the
    /// description or date is empty, or if `amount` is zero or not finite.
    pub fn new(description: &str, amount: f64, category: Category, date: &str) -> Option<Self> {
        let description = description.trim();
        let date = date.trim();

        if description.is_empty() || date.is_empty() || amount == 0.0 || !amount.is_finite() {
            return None;
        }

        Some(Self {
            description: description.to_owned(),
            amount,
            category,
            date: date.to_owned(),
        })
    }

    /// The trimmed description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The non-zero, finite amount.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// The trimmed date string.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Attach `id` to create the stored transaction.
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            description: self.description,
            amount: self.amount,
            category: self.category,
            date: self.date,
        }
    }
}

/// Parse a calendar date from either "YYYY-MM-DD" or an RFC 3339 date-time.
pub fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();

    Date::parse(text, ISO_DATE_FORMAT).ok().or_else(|| {
        OffsetDateTime::parse(text, &Rfc3339)
            .ok()
            .map(|date_time| date_time.date())
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{Category, NewTransaction, Transaction, parse_date};

    #[test]
    fn category_reads_unknown_labels_as_investment() {
        assert_eq!(Category::from_label("income"), Category::Income);
        assert_eq!(Category::from_label("expense"), Category::Expense);
        assert_eq!(Category::from_label("investment"), Category::Investment);
        assert_eq!(Category::from_label("savings"), Category::Investment);
        assert_eq!(Category::from_label(""), Category::Investment);
    }

    #[test]
    fn category_round_trips_through_json() {
        let json = serde_json::to_string(&Category::ALL).unwrap();
        assert_eq!(json, r#"["income","expense","investment"]"#);

        let other: Category = serde_json::from_str(r#""stocks""#).unwrap();
        assert_eq!(other, Category::Investment);
    }

    #[test]
    fn new_transaction_trims_fields() {
        let new = NewTransaction::new("  Salary ", 50000.0, Category::Income, " 2024-01-15 ")
            .expect("valid input should be accepted");

        assert_eq!(new.description(), "Salary");
        assert_eq!(new.date(), "2024-01-15");
    }

    #[test]
    fn new_transaction_rejects_invalid_input() {
        let cases = [
            ("", 10.0, "2024-01-15"),
            ("   ", 10.0, "2024-01-15"),
            ("Rent", 0.0, "2024-01-15"),
            ("Rent", f64::NAN, "2024-01-15"),
            ("Rent", f64::INFINITY, "2024-01-15"),
            ("Rent", 10.0, ""),
        ];

        for (description, amount, date) in cases {
            assert_eq!(
                NewTransaction::new(description, amount, Category::Expense, date),
                None,
                "want ({description:?}, {amount}, {date:?}) to be rejected"
            );
        }
    }

    #[test]
    fn negative_amounts_are_accepted() {
        assert!(NewTransaction::new("Refund", -20.0, Category::Expense, "2024-02-01").is_some());
    }

    #[test]
    fn parses_iso_and_rfc3339_dates() {
        assert_eq!(parse_date("2024-01-15"), Some(date!(2024 - 01 - 15)));
        assert_eq!(
            parse_date("2024-03-09T10:30:00+05:30"),
            Some(date!(2024 - 03 - 09))
        );
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn unparseable_date_is_kept_verbatim() {
        let transaction = NewTransaction::new("Gift", 5.0, Category::Income, "someday")
            .unwrap()
            .into_transaction(1);

        assert_eq!(transaction.date, "someday");
        assert_eq!(Transaction::parsed_date(&transaction), None);
    }
}
