//! Animated counters for the balance and the category totals.
//!
//! The server decides where each counter starts and ends; the browser only
//! plays the transition. Each counter has at most one transition in flight,
//! and a new one replaces it starting from the replaced transition's target.

use maud::{Markup, PreEscaped, html};

use crate::{html::format_grouped, tracker::aggregation::Totals};

/// How long a counter takes to reach its new value.
pub const COUNTER_DURATION_MS: f64 = 650.0;

/// One of the four counters shown above the charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    /// Income minus expenses plus investments.
    Balance,
    /// Total income.
    Income,
    /// Total expenses.
    Expense,
    /// Total investments.
    Investment,
}

impl CounterKind {
    /// Every counter in display order.
    pub const ALL: [CounterKind; 4] = [
        CounterKind::Balance,
        CounterKind::Income,
        CounterKind::Expense,
        CounterKind::Investment,
    ];

    /// The ID of the element that displays the counter.
    pub fn element_id(&self) -> &'static str {
        match self {
            CounterKind::Balance => "balance-counter",
            CounterKind::Income => "income-counter",
            CounterKind::Expense => "expense-counter",
            CounterKind::Investment => "investment-counter",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            CounterKind::Balance => "Balance",
            CounterKind::Income => "Income",
            CounterKind::Expense => "Expenses",
            CounterKind::Investment => "Investments",
        }
    }

    fn target(&self, totals: &Totals) -> f64 {
        match self {
            CounterKind::Balance => totals.balance(),
            CounterKind::Income => totals.income,
            CounterKind::Expense => totals.expense,
            CounterKind::Investment => totals.investment,
        }
    }

    fn index(&self) -> usize {
        match self {
            CounterKind::Balance => 0,
            CounterKind::Income => 1,
            CounterKind::Expense => 2,
            CounterKind::Investment => 3,
        }
    }
}

/// A linear transition of a counter from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterTransition {
    /// The counter being animated.
    pub kind: CounterKind,
    /// The value shown on the first frame.
    pub start: f64,
    /// The value shown once the transition finishes.
    pub end: f64,
}

impl CounterTransition {
    /// Whether the counter should be set to `end` without animating.
    pub fn is_immediate(&self) -> bool {
        self.start == self.end
    }

    /// Linear progress after `elapsed_ms`, clamped to `[0, 1]`.
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        (elapsed_ms / COUNTER_DURATION_MS).clamp(0.0, 1.0)
    }

    /// The value to display after `elapsed_ms`.
    ///
    /// Intermediate frames are floored; the final frame shows `end` exactly.
    pub fn value_at(&self, elapsed_ms: f64) -> f64 {
        let progress = self.progress(elapsed_ms);

        if self.is_immediate() || progress >= 1.0 {
            self.end
        } else {
            (progress * (self.end - self.start) + self.start).floor()
        }
    }
}

/// The last target of each counter, used as the start of the next transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Counters {
    targets: [f64; 4],
}

impl Counters {
    /// Counters that all start from zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transition for every counter towards the values in `totals`.
    ///
    /// Each transition starts from the target of the one it replaces.
    pub fn retarget(&mut self, totals: &Totals) -> [CounterTransition; 4] {
        CounterKind::ALL.map(|kind| {
            let end = kind.target(totals);
            let start = std::mem::replace(&mut self.targets[kind.index()], end);

            CounterTransition { kind, start, end }
        })
    }

    /// Forget previous targets so the next transitions start from zero, as on
    /// a fresh page.
    pub fn reset(&mut self) {
        self.targets = [0.0; 4];
    }
}

/// Defines `animateCounter`, which plays one transition and cancels any
/// transition already playing on the same element.
pub(super) const COUNTER_SCRIPT: &str = r#"window.counterFrames = window.counterFrames || {};
function animateCounter(id, start, end, duration) {
    const element = document.getElementById(id);
    if (!element) {
        return;
    }

    if (window.counterFrames[id]) {
        cancelAnimationFrame(window.counterFrames[id]);
        delete window.counterFrames[id];
    }

    const show = (value) => {
        element.textContent = value.toLocaleString('en-US', { maximumFractionDigits: 3 });
    };

    if (start === end) {
        show(end);
        return;
    }

    let startTime = null;
    const step = (timestamp) => {
        if (startTime === null) {
            startTime = timestamp;
        }
        const progress = Math.min((timestamp - startTime) / duration, 1);

        if (progress < 1) {
            show(Math.floor(progress * (end - start) + start));
            window.counterFrames[id] = requestAnimationFrame(step);
        } else {
            show(end);
            delete window.counterFrames[id];
        }
    };
    window.counterFrames[id] = requestAnimationFrame(step);
}"#;

/// Renders the counter cards. Each shows its final value until the script runs.
pub(super) fn counters_view(transitions: &[CounterTransition], currency_symbol: &str) -> Markup {
    html!(
        section
            id="counters"
            class="grid grid-cols-2 lg:grid-cols-4 gap-4 w-full mb-4"
        {
            @for transition in transitions {
                div class="p-4 rounded-lg shadow-sm bg-white dark:bg-gray-800"
                {
                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        (transition.kind.label())
                    }

                    p class="text-2xl font-bold"
                    {
                        span class="mr-1" { (currency_symbol) }
                        span id=(transition.kind.element_id()) { (format_grouped(transition.end)) }
                    }
                }
            }
        }
    )
}

/// Calls `animateCounter` for each transition.
pub(super) fn counters_script(transitions: &[CounterTransition]) -> PreEscaped<String> {
    let calls = transitions
        .iter()
        .map(|transition| {
            format!(
                "animateCounter(\"{}\", {}, {}, {});",
                transition.kind.element_id(),
                js_number(transition.start),
                js_number(transition.end),
                COUNTER_DURATION_MS
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    PreEscaped(calls)
}

fn js_number(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        "0".to_owned()
    }
}
