//! The derivation pipeline: filtering, sorting, totals and monthly buckets.
//!
//! Everything here is a pure function of the transaction slice, so the
//! tracker can recompute it from scratch after every change.

use serde::Deserialize;

use crate::transaction::{Category, Transaction};

/// Three-letter month labels, January first.
pub(crate) const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Which transactions the table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum CategoryFilter {
    /// Show every transaction.
    #[default]
    All,
    /// Show only transactions in one category.
    Only(Category),
}

impl CategoryFilter {
    /// The value used for this filter in query strings and select options.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }

    fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => transaction.category == *category,
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        match value.as_str() {
            "all" | "" => CategoryFilter::All,
            label => CategoryFilter::Only(Category::from_label(label)),
        }
    }
}

/// How the table orders transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum SortOrder {
    /// Keep append order.
    #[default]
    None,
    /// Smallest amount first.
    Ascending,
    /// Largest amount first.
    Descending,
}

impl SortOrder {
    /// The value used for this order in query strings and select options.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::None => "none",
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

impl From<String> for SortOrder {
    fn from(value: String) -> Self {
        match value.as_str() {
            "asc" => SortOrder::Ascending,
            "desc" => SortOrder::Descending,
            _ => SortOrder::None,
        }
    }
}

/// The filter and sort order selected on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ViewOptions {
    /// The category filter, "all" by default.
    #[serde(default)]
    pub filter: CategoryFilter,
    /// The sort order, append order by default.
    #[serde(default)]
    pub sort: SortOrder,
}

/// A transaction selected for display along with its true position in the
/// unfiltered sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Projected<'a> {
    pub position: usize,
    pub transaction: &'a Transaction,
}

/// Filter then sort `transactions` for display.
///
/// Sorting is stable, so transactions with equal amounts keep their append order.
pub(crate) fn project(transactions: &[Transaction], options: ViewOptions) -> Vec<Projected<'_>> {
    let mut projected: Vec<Projected<'_>> = transactions
        .iter()
        .enumerate()
        .filter(|(_, transaction)| options.filter.matches(transaction))
        .map(|(position, transaction)| Projected {
            position,
            transaction,
        })
        .collect();

    match options.sort {
        SortOrder::None => {}
        SortOrder::Ascending => projected
            .sort_by(|a, b| a.transaction.amount.total_cmp(&b.transaction.amount)),
        SortOrder::Descending => projected
            .sort_by(|a, b| b.transaction.amount.total_cmp(&a.transaction.amount)),
    }

    projected
}

/// Sums of the transaction amounts in each category.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    /// Sum of income amounts.
    pub income: f64,
    /// Sum of expense amounts.
    pub expense: f64,
    /// Sum of everything that is neither income nor expense.
    pub investment: f64,
}

impl Totals {
    /// Sum every transaction, ignoring any filter on the page.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        transactions
            .iter()
            .fold(Totals::default(), |mut totals, transaction| {
                match transaction.category {
                    Category::Income => totals.income += transaction.amount,
                    Category::Expense => totals.expense += transaction.amount,
                    Category::Investment => totals.investment += transaction.amount,
                }

                totals
            })
    }

    /// Net balance: income minus expenses plus investments.
    pub fn balance(&self) -> f64 {
        self.income - self.expense + self.investment
    }
}

/// Sum expense amounts by calendar month across all years, January at index 0.
///
/// Transactions whose date does not parse are skipped.
pub fn monthly_expenses(transactions: &[Transaction]) -> [f64; 12] {
    let mut months = [0.0; 12];

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.category == Category::Expense)
    {
        if let Some(date) = transaction.parsed_date() {
            // `Month` is 1-based.
            months[date.month() as usize - 1] += transaction.amount;
        }
    }

    months
}

#[cfg(test)]
mod tests {
    use crate::transaction::{Category, NewTransaction, Transaction};

    use super::{
        CategoryFilter, SortOrder, Totals, ViewOptions, monthly_expenses, project,
    };

    fn transaction(
        id: i64,
        description: &str,
        amount: f64,
        category: Category,
        date: &str,
    ) -> Transaction {
        NewTransaction::new(description, amount, category, date)
            .unwrap()
            .into_transaction(id)
    }

    fn sample() -> Vec<Transaction> {
        vec![
            transaction(1, "Salary", 50000.0, Category::Income, "2024-01-15"),
            transaction(2, "Rent", 12000.0, Category::Expense, "2024-01-05"),
            transaction(3, "Index fund", 5000.0, Category::Investment, "2024-02-01"),
            transaction(4, "Food", 300.0, Category::Expense, "2023-01-20"),
            transaction(5, "Cinema", 300.0, Category::Expense, "2024-03-11"),
            transaction(6, "Gift", 1000.0, Category::Expense, "whenever"),
        ]
    }

    fn ids(projected: &[super::Projected<'_>]) -> Vec<i64> {
        projected.iter().map(|p| p.transaction.id).collect()
    }

    #[test]
    fn default_options_keep_everything_in_order() {
        let transactions = sample();

        let projected = project(&transactions, ViewOptions::default());

        assert_eq!(ids(&projected), vec![1, 2, 3, 4, 5, 6]);
        assert!(projected.iter().enumerate().all(|(i, p)| p.position == i));
    }

    #[test]
    fn filter_keeps_true_positions() {
        let transactions = sample();
        let options = ViewOptions {
            filter: CategoryFilter::Only(Category::Expense),
            sort: SortOrder::None,
        };

        let projected = project(&transactions, options);

        assert_eq!(ids(&projected), vec![2, 4, 5, 6]);
        let positions: Vec<usize> = projected.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![1, 3, 4, 5]);
    }

    #[test]
    fn sorts_are_stable_for_equal_amounts() {
        let transactions = sample();
        let ascending = ViewOptions {
            filter: CategoryFilter::Only(Category::Expense),
            sort: SortOrder::Ascending,
        };
        let descending = ViewOptions {
            sort: SortOrder::Descending,
            ..ascending
        };

        // Food and Cinema are both 300 and keep their append order either way.
        assert_eq!(ids(&project(&transactions, ascending)), vec![4, 5, 6, 2]);
        assert_eq!(ids(&project(&transactions, descending)), vec![2, 6, 4, 5]);
    }

    #[test]
    fn sorts_without_ties_are_exact_reverses() {
        let transactions = vec![
            transaction(1, "A", 30.0, Category::Expense, "2024-01-01"),
            transaction(2, "B", -10.0, Category::Expense, "2024-01-01"),
            transaction(3, "C", 20.0, Category::Income, "2024-01-01"),
            transaction(4, "D", 5.5, Category::Investment, "2024-01-01"),
        ];
        let options = |sort| ViewOptions {
            filter: CategoryFilter::All,
            sort,
        };

        let mut ascending = ids(&project(&transactions, options(SortOrder::Ascending)));
        let descending = ids(&project(&transactions, options(SortOrder::Descending)));

        assert_eq!(ascending, vec![2, 4, 3, 1]);
        ascending.reverse();
        assert_eq!(ascending, descending);
    }

    #[test]
    fn totals_ignore_the_filter_and_balance_adds_up() {
        let transactions = sample();

        let totals = Totals::from_transactions(&transactions);

        assert_eq!(totals.income, 50000.0);
        assert_eq!(totals.expense, 13600.0);
        assert_eq!(totals.investment, 5000.0);
        assert_eq!(totals.balance(), 41400.0);
        assert_eq!(
            totals.income + totals.expense + totals.investment - 2.0 * totals.expense,
            totals.balance()
        );
    }

    #[test]
    fn monthly_expenses_bucket_across_years_and_skip_bad_dates() {
        let transactions = sample();

        let months = monthly_expenses(&transactions);

        assert_eq!(months[0], 12300.0);
        assert_eq!(months[1], 0.0);
        assert_eq!(months[2], 300.0);
        assert_eq!(months.iter().sum::<f64>(), 12600.0);
    }

    #[test]
    fn salary_and_rent_scenario() {
        let transactions = vec![
            transaction(1, "Salary", 50000.0, Category::Income, "2024-01-15"),
            transaction(2, "Rent", 12000.0, Category::Expense, "2024-01-05"),
        ];

        let totals = Totals::from_transactions(&transactions);
        let months = monthly_expenses(&transactions);

        assert_eq!(totals.balance(), 38000.0);
        assert_eq!(totals.income, 50000.0);
        assert_eq!(totals.expense, 12000.0);
        assert_eq!(totals.investment, 0.0);
        assert_eq!(months[0], 12000.0);
    }

    #[test]
    fn view_options_parse_from_query_strings() {
        let options: ViewOptions = serde_html_form::from_str("filter=income&sort=desc").unwrap();
        assert_eq!(
            options,
            ViewOptions {
                filter: CategoryFilter::Only(Category::Income),
                sort: SortOrder::Descending,
            }
        );

        let options: ViewOptions = serde_html_form::from_str("").unwrap();
        assert_eq!(options, ViewOptions::default());

        let options: ViewOptions = serde_html_form::from_str("filter=all&sort=bogus").unwrap();
        assert_eq!(options, ViewOptions::default());
    }
}
