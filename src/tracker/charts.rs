//! Chart generation and rendering for the tracker.
//!
//! Three ECharts visualizations are built from the ledger on every render:
//! - **Category Breakdown**: pie of the income, expense and investment totals
//! - **Monthly Expenses**: line of expense totals per calendar month
//! - **Income vs Expenses**: bar comparing the two totals
//!
//! Each chart is generated as JSON configuration for the ECharts library.
//! A redraw disposes the chart instance previously drawn in the same
//! container before initialising a new one.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    datatype::DataPointItem,
    element::{
        AreaStyle, AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, ItemStyle,
        JsFunction, Tooltip, Trigger,
    },
    series::{Bar, Line, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::tracker::aggregation::{MONTH_LABELS, Totals};

/// URL of the ECharts build the chart options are written for.
pub(super) const ECHARTS_SCRIPT: &str =
    "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js";

const INCOME_COLOR: &str = "#10b981";
const EXPENSE_COLOR: &str = "#ef4444";
const INVESTMENT_COLOR: &str = "#2563eb";

/// A tracker chart with its HTML container ID and ECharts configuration.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct TrackerChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Build the three tracker charts from the unfiltered totals and monthly buckets.
pub(super) fn build_charts(
    totals: &Totals,
    monthly_expenses: &[f64; 12],
    currency_symbol: &str,
) -> [TrackerChart; 3] {
    [
        TrackerChart {
            id: "category-chart",
            options: category_chart(totals, currency_symbol).to_string(),
        },
        TrackerChart {
            id: "monthly-expenses-chart",
            options: monthly_expenses_chart(monthly_expenses, currency_symbol).to_string(),
        },
        TrackerChart {
            id: "income-expense-chart",
            options: income_expense_chart(totals, currency_symbol).to_string(),
        },
    ]
}

/// Renders the HTML containers for the charts.
pub(super) fn charts_view(charts: &[TrackerChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-3 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[320px] rounded bg-white dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the JavaScript that (re)draws each chart into its container.
///
/// Chart instances are kept in `window.trackerCharts` keyed by container ID
/// so that the instance from the previous render is disposed first.
pub(super) fn charts_script(charts: &[TrackerChart]) -> PreEscaped<String> {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    window.trackerCharts = window.trackerCharts || {{}};
                    const previous = window.trackerCharts["{id}"];
                    if (previous) {{
                        previous.dispose();
                    }}

                    const chartDom = document.getElementById("{id}");
                    const chart = echarts.init(chartDom);
                    const option = {options};
                    chart.setOption(option);
                    window.trackerCharts["{id}"] = chart;
                }})();"#,
                id = chart.id,
                options = chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    PreEscaped(script_content)
}

/// Resizes every live chart with the window. Only needs to run once per page.
pub(super) const CHART_RESIZE_SCRIPT: &str = r#"window.addEventListener('resize', function() {
    Object.values(window.trackerCharts || {}).forEach(function(chart) {
        chart.resize();
    });
});"#;

fn category_chart(totals: &Totals, currency_symbol: &str) -> Chart {
    Chart::new()
        .title(Title::new().text("Category Breakdown"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter(currency_symbol)),
        )
        .legend(Legend::new().top("bottom"))
        .color(vec![
            Color::from(INCOME_COLOR),
            Color::from(EXPENSE_COLOR),
            Color::from(INVESTMENT_COLOR),
        ])
        .series(
            Pie::new()
                .name("Total")
                .radius(vec!["40%", "70%"])
                .data(vec![
                    (totals.income, "Income"),
                    (totals.expense, "Expense"),
                    (totals.investment, "Investment"),
                ]),
        )
}

fn monthly_expenses_chart(monthly_expenses: &[f64; 12], currency_symbol: &str) -> Chart {
    Chart::new()
        .title(
            Title::new()
                .text("Monthly Expenses")
                .subtext("All years, by calendar month"),
        )
        .tooltip(currency_tooltip(currency_symbol))
        .grid(default_grid())
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(MONTH_LABELS.to_vec()),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter(currency_symbol))),
        )
        .series(
            Line::new()
                .name("Expenses")
                .smooth(true)
                .area_style(AreaStyle::new())
                .item_style(ItemStyle::new().color(EXPENSE_COLOR))
                .data(monthly_expenses.to_vec()),
        )
}

fn income_expense_chart(totals: &Totals, currency_symbol: &str) -> Chart {
    Chart::new()
        .title(Title::new().text("Income vs Expenses"))
        .tooltip(currency_tooltip(currency_symbol))
        .grid(default_grid())
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(vec!["Income", "Expense"]),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter(currency_symbol))),
        )
        .series(Bar::new().name("Total").data(vec![
            DataPointItem::new(totals.income).item_style(ItemStyle::new().color(INCOME_COLOR)),
            DataPointItem::new(totals.expense).item_style(ItemStyle::new().color(EXPENSE_COLOR)),
        ]))
}

fn default_grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .top(70)
        .contain_label(true)
}

/// Formats chart values the same way as the table: symbol then raw number.
fn currency_formatter(currency_symbol: &str) -> JsFunction {
    // The symbol is embedded as a JSON string literal so quotes cannot break out.
    let symbol = serde_json::Value::from(currency_symbol).to_string();

    JsFunction::new_with_args(
        "number",
        &format!("return (number === undefined || number === null) ? \"-\" : {symbol} + number;"),
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip(currency_symbol: &str) -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter(currency_symbol))
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use crate::tracker::aggregation::Totals;

    use super::{EXPENSE_COLOR, INCOME_COLOR, INVESTMENT_COLOR, build_charts, charts_script};

    fn totals() -> Totals {
        Totals {
            income: 50000.0,
            expense: 12000.0,
            investment: 0.0,
        }
    }

    fn monthly() -> [f64; 12] {
        let mut months = [0.0; 12];
        months[0] = 12000.0;
        months
    }

    #[test]
    fn builds_three_charts_with_unique_ids() {
        let charts = build_charts(&totals(), &monthly(), "₹");

        let ids: Vec<_> = charts.iter().map(|chart| chart.id).collect();
        assert_eq!(
            ids,
            vec!["category-chart", "monthly-expenses-chart", "income-expense-chart"]
        );
    }

    #[test]
    fn pie_contains_each_category_total() {
        let charts = build_charts(&totals(), &monthly(), "₹");
        let pie = &charts[0].options;

        for name in ["Income", "Expense", "Investment"] {
            assert!(pie.contains(&format!("\"{name}\"")), "missing {name} in {pie}");
        }
        assert!(pie.contains("50000"));
        assert!(pie.contains("12000"));
    }

    #[test]
    fn pie_colors_follow_category_order() {
        let charts = build_charts(&totals(), &monthly(), "₹");
        let pie = &charts[0].options;

        let positions: Vec<usize> = [INCOME_COLOR, EXPENSE_COLOR, INVESTMENT_COLOR]
            .iter()
            .map(|color| pie.find(color).unwrap())
            .collect();
        assert!(positions.is_sorted(), "colors out of order in {pie}");
    }

    #[test]
    fn line_has_twelve_month_labels() {
        let charts = build_charts(&totals(), &monthly(), "₹");
        let line = &charts[1].options;

        for month in ["Jan", "Jun", "Dec"] {
            assert!(line.contains(&format!("\"{month}\"")), "missing {month} in {line}");
        }
        assert_eq!(line.matches("\"Expenses\"").count(), 1);
    }

    #[test]
    fn formatter_uses_currency_symbol() {
        let charts = build_charts(&totals(), &monthly(), "$");

        assert!(charts[2].options.contains("+ number"));
        assert!(charts[2].options.contains('$'));
    }

    #[test]
    fn script_disposes_previous_chart_before_init() {
        let charts = build_charts(&totals(), &monthly(), "₹");

        let script = charts_script(&charts).into_string();

        for chart in &charts {
            let dispose = script
                .find(&format!("window.trackerCharts[\"{}\"];", chart.id))
                .unwrap();
            let init = script
                .find(&format!("document.getElementById(\"{}\")", chart.id))
                .unwrap();
            assert!(dispose < init, "{} is initialised before disposal", chart.id);
        }
        assert_eq!(script.matches("previous.dispose()").count(), 3);
    }
}
