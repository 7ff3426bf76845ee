//! Drug Filter Component
//!
//! One checkbox per drug, plus "Select all" and "Clear".

use leptos::*;
use overdose_dashboard::Dataset;

use crate::state::global::GlobalState;

#[component]
pub fn DrugFilter() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let checkboxes = Dataset::builtin()
        .palette()
        .into_iter()
        .map(|entry| {
            let drug = entry.drug.clone();
            let toggled = entry.drug.clone();
            view! {
                <label class="flex items-center space-x-2 cursor-pointer select-none">
                    <input
                        type="checkbox"
                        class="accent-blue-500"
                        prop:checked=move || state.selection.with(|s| s.contains(&drug))
                        on:change=move |_| state.toggle_drug(&toggled)
                    />
                    <span
                        class="inline-block w-3 h-3 rounded-sm"
                        style=format!("background-color: {}", entry.color)
                    />
                    <span class="text-sm">{entry.drug}</span>
                </label>
            }
        })
        .collect_view();

    view! {
        <div class="space-y-3">
            <div class="flex flex-wrap gap-x-6 gap-y-2">{checkboxes}</div>
            <div class="flex space-x-2">
                <button
                    class="px-3 py-1 text-sm bg-gray-700 hover:bg-gray-600 rounded"
                    on:click=move |_| state.select_all()
                >
                    "Select all"
                </button>
                <button
                    class="px-3 py-1 text-sm bg-gray-700 hover:bg-gray-600 rounded"
                    on:click=move |_| state.clear_selection()
                >
                    "Clear"
                </button>
            </div>
        </div>
    }
}
