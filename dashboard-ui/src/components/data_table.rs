//! Data Table Component
//!
//! The filtered dataset rows.

use leptos::*;
use overdose_dashboard::analytics::filter_rows;
use overdose_dashboard::chart::format_count;
use overdose_dashboard::{Dataset, DatasetRow};

use crate::state::global::GlobalState;

#[component]
pub fn DataTable() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let rows = create_memo(move |_| {
        state.selection.with(|selection| {
            filter_rows(Dataset::builtin(), selection)
                .into_iter()
                .cloned()
                .collect::<Vec<DatasetRow>>()
        })
    });

    view! {
        {move || {
            if rows.with(|r| r.is_empty()) {
                view! {
                    <p class="text-gray-500 text-sm">"No drugs selected"</p>
                }.into_view()
            } else {
                view! {
                    <div class="max-h-96 overflow-y-auto">
                        <table class="w-full text-sm">
                            <thead class="sticky top-0 bg-gray-800 text-gray-400">
                                <tr>
                                    <th class="text-left py-2">"Month"</th>
                                    <th class="text-left py-2">"Drug"</th>
                                    <th class="text-right py-2">"Deaths"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || rows.get()
                                    key=|row| (row.month, row.drug.clone())
                                    children=|row| view! {
                                        <tr class="border-t border-gray-700">
                                            <td class="py-1">{row.month.label()}</td>
                                            <td class="py-1">{row.drug}</td>
                                            <td class="py-1 text-right tabular-nums">{format_count(row.deaths)}</td>
                                        </tr>
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                }.into_view()
            }
        }}
    }
}
