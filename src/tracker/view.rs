//! HTML rendering for the tracker page and its swappable content.

use maud::{Markup, PreEscaped, html};
use time::Date;

use crate::{
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
    },
    tracker::{
        aggregation::{CategoryFilter, SortOrder, Totals, ViewOptions, monthly_expenses, project},
        charts::{
            CHART_RESIZE_SCRIPT, ECHARTS_SCRIPT, TrackerChart, build_charts, charts_script,
            charts_view,
        },
        counters::{COUNTER_SCRIPT, CounterTransition, Counters, counters_script, counters_view},
        rows::{TransactionRow, capitalize},
    },
    transaction::{Category, Transaction},
};

/// The ID of the element that htmx swaps on every change.
pub(super) const TRACKER_CONTENT_ID: &str = "tracker-content";

/// Everything derived from the ledger for one render.
pub(super) struct TrackerView<'a> {
    pub options: ViewOptions,
    pub rows: Vec<TransactionRow>,
    pub transitions: [CounterTransition; 4],
    pub charts: [TrackerChart; 3],
    pub currency_symbol: &'a str,
    /// Prefills the date input of the entry form.
    pub today: Option<Date>,
}

impl<'a> TrackerView<'a> {
    /// Run the derivation pipeline over `transactions`.
    ///
    /// Totals, monthly buckets and charts always cover every transaction;
    /// only the table rows follow `options`.
    pub fn derive(
        transactions: &[Transaction],
        options: ViewOptions,
        counters: &mut Counters,
        currency_symbol: &'a str,
        today: Option<Date>,
    ) -> Self {
        let rows = project(transactions, options)
            .iter()
            .map(|projected| TransactionRow::new(projected, currency_symbol))
            .collect();

        let totals = Totals::from_transactions(transactions);
        let monthly_expenses = monthly_expenses(transactions);

        Self {
            options,
            rows,
            transitions: counters.retarget(&totals),
            charts: build_charts(&totals, &monthly_expenses, currency_symbol),
            currency_symbol,
            today,
        }
    }
}

/// Renders the full tracker page.
pub(super) fn tracker_page(view: &TrackerView) -> Markup {
    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="mb-6 text-3xl font-bold" { "Finance Tracker" }

            (tracker_content(view))
        }
    );

    let head_elements = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        HeadElement::ScriptSource(PreEscaped(format!(
            "{COUNTER_SCRIPT}\n{CHART_RESIZE_SCRIPT}"
        ))),
    ];

    base("Tracker", &head_elements, &content)
}

/// Renders the content that is swapped after every mutation and every
/// filter or sort change.
///
/// The trailing script replays the counter transitions and redraws the charts.
pub(super) fn tracker_content(view: &TrackerView) -> Markup {
    html!(
        div id=(TRACKER_CONTENT_ID) class="w-full max-w-screen-xl"
        {
            (counters_view(&view.transitions, view.currency_symbol))

            (charts_view(&view.charts))

            div class="grid grid-cols-1 lg:grid-cols-3 gap-4 w-full"
            {
                (entry_form(view.today))

                section class="lg:col-span-2 overflow-x-auto"
                {
                    (view_options_form(&view.options))

                    (transactions_table(&view.rows))
                }
            }

            script
            {
                (counters_script(&view.transitions))
                "\n"
                (charts_script(&view.charts))
            }
        }
    )
}

fn entry_form(today: Option<Date>) -> Markup {
    let content_target = format!("#{TRACKER_CONTENT_ID}");
    let today = today.map(|today| today.to_string());

    html!(
        form
            id="transaction-form"
            hx-post=(endpoints::TRANSACTIONS)
            hx-target=(content_target)
            hx-target-error="#alert-container"
            hx-swap="outerHTML"
            hx-include="#view-options"
            class="space-y-4 p-4 rounded-lg bg-white dark:bg-gray-800"
        {
            h2 class="text-xl font-semibold" { "Add Transaction" }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="Description"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="any"
                    placeholder="0"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for category in Category::ALL {
                        option value=(category.as_str()) { (capitalize(category.as_str())) }
                    }
                }
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    value=[today]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                "Add Transaction"
            }
        }
    )
}

fn view_options_form(options: &ViewOptions) -> Markup {
    let content_target = format!("#{TRACKER_CONTENT_ID}");
    let filters = std::iter::once(CategoryFilter::All).chain(Category::ALL.map(CategoryFilter::Only));
    let sort_orders = [
        (SortOrder::None, "Date added"),
        (SortOrder::Ascending, "Amount: low to high"),
        (SortOrder::Descending, "Amount: high to low"),
    ];

    html!(
        form
            id="view-options"
            hx-get=(endpoints::TRACKER_CONTENT)
            hx-trigger="change"
            hx-target=(content_target)
            hx-target-error="#alert-container"
            hx-swap="outerHTML"
            class="flex flex-wrap gap-4 mb-4"
        {
            div
            {
                label for="filter" class=(FORM_LABEL_STYLE) { "Category" }

                select name="filter" id="filter" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for filter in filters {
                        option value=(filter.as_str()) selected[filter == options.filter]
                        {
                            (capitalize(filter.as_str()))
                        }
                    }
                }
            }

            div
            {
                label for="sort" class=(FORM_LABEL_STYLE) { "Sort" }

                select name="sort" id="sort" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (order, label) in sort_orders {
                        option value=(order.as_str()) selected[order == options.sort]
                        {
                            (label)
                        }
                    }
                }
            }
        }
    )
}

fn amount_class(is_negative: bool) -> &'static str {
    if is_negative {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    }
}

fn transactions_table(rows: &[TransactionRow]) -> Markup {
    let content_target = format!("#{TRACKER_CONTENT_ID}");

    html!(
        table id="transactions-table" class="w-full text-sm text-left"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                }
            }

            tbody
            {
                @for row in rows {
                    tr class=(TABLE_ROW_STYLE) data-transaction-id=(row.id) data-position=(row.position)
                    {
                        td class=(TABLE_CELL_STYLE) title=[row.full_description.as_deref()]
                        {
                            (row.description)
                        }

                        td class={ (TABLE_CELL_STYLE) " " (amount_class(row.amount_is_negative)) }
                        {
                            (row.amount)
                        }

                        td class=(TABLE_CELL_STYLE)
                        {
                            span class=(CATEGORY_BADGE_STYLE) { (row.category) }
                        }

                        td class=(TABLE_CELL_STYLE) { (row.date) }

                        td class=(TABLE_CELL_STYLE)
                        {
                            button
                                type="button"
                                hx-delete=(row.delete_url)
                                hx-include="#view-options"
                                hx-target=(content_target)
                                hx-target-error="#alert-container"
                                hx-swap="outerHTML"
                                class=(BUTTON_DELETE_STYLE)
                            {
                                "Delete"
                            }
                        }
                    }
                }

                @if rows.is_empty() {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td colspan="5" class={ (TABLE_CELL_STYLE) " text-center" }
                        {
                            "No transactions yet."
                        }
                    }
                }
            }
        }
    )
}
