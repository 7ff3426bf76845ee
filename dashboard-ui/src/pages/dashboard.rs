//! Dashboard Page
//!
//! Chart and filter, summary figures, the auth panel and the data table.

use leptos::*;

use crate::components::{AuthPanel, Chart, DataTable, DrugFilter, SummaryCards};

#[component]
pub fn Dashboard() -> impl IntoView {
    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Overdose deaths by drug"</h1>
                <p class="text-gray-400 mt-1">"Monthly provisional counts"</p>
            </div>

            <section>
                <SummaryCards />
            </section>

            <section class="bg-gray-800 rounded-xl p-6 space-y-4">
                <h2 class="text-xl font-semibold">"Trends"</h2>
                <DrugFilter />
                <Chart />
            </section>

            <div class="grid md:grid-cols-2 gap-8">
                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">"Data"</h2>
                    <DataTable />
                </section>

                <section>
                    <AuthPanel />
                </section>
            </div>
        </div>
    }
}
