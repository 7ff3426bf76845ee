//! Stat Card Component
//!
//! Summary figures for the current selection.

use leptos::*;
use overdose_dashboard::chart::format_count;
use overdose_dashboard::{Dataset, Summary};

use crate::state::global::GlobalState;

/// Row of summary cards
#[component]
pub fn SummaryCards() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let summary = create_memo(move |_| {
        state
            .selection
            .with(|selection| Summary::for_selection(Dataset::builtin(), selection))
    });

    let latest_label = move || {
        summary
            .with(|s| s.latest_month.map(|m| m.label()))
            .map(|label| format!("Latest month ({})", label))
            .unwrap_or_else(|| "Latest month".to_string())
    };

    view! {
        <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
            <StatCard
                label=Signal::derive(|| "Total deaths".to_string())
                value=Signal::derive(move || format_count(summary.with(|s| s.grand_total)))
            />
            <StatCard
                label=Signal::derive(latest_label)
                value=Signal::derive(move || format_count(summary.with(|s| s.latest_month_total)))
            />
            <StatCard
                label=Signal::derive(|| "Average per month".to_string())
                value=Signal::derive(move || format_count(summary.with(|s| s.average_per_month)))
            />
            <StatCard
                label=Signal::derive(|| "Series selected".to_string())
                value=Signal::derive(move || summary.with(|s| s.series_count).to_string())
            />
        </div>
    }
}

/// A single labelled figure
#[component]
pub fn StatCard(
    #[prop(into)]
    label: Signal<String>,
    #[prop(into)]
    value: Signal<String>,
) -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-lg p-4 border border-gray-700">
            <div class="text-gray-400 text-sm">{move || label.get()}</div>
            <div class="text-3xl font-bold mt-2">{move || value.get()}</div>
        </div>
    }
}
