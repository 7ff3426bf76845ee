//! App Root Component
//!
//! Provides global state, opens the session subscription and lays out the page.

use leptos::*;

use crate::api;
use crate::components::Toast;
use crate::pages::Dashboard;
use crate::state::global::{provide_global_state, GlobalState};
use crate::state::session::subscribe_session;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let state = provide_global_state();
    subscribe_session(state, &api::get_api_base());

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex flex-col">
            <Header />

            <main class="flex-1 container mx-auto px-4 py-8">
                <Dashboard />
            </main>

            <Footer />

            <Toast />
        </div>
    }
}

#[component]
fn Header() -> impl IntoView {
    view! {
        <header class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4 flex items-center justify-between h-16">
                <span class="text-xl font-bold">"Overdose Dashboard"</span>
                <a
                    href=overdose_dashboard::DATASET_URL
                    target="_blank"
                    rel="noopener noreferrer"
                    class="text-sm text-blue-400 hover:text-blue-300"
                >
                    "Source dataset"
                </a>
            </div>
        </header>
    }
}

/// Footer showing the session status
#[component]
fn Footer() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <footer class="bg-gray-800 border-t border-gray-700 py-3 px-4">
            <div class="container mx-auto flex items-center justify-between text-sm text-gray-400">
                <span>"Monthly provisional counts, twelve months"</span>
                {move || {
                    let session = state.session.get();
                    match (session.loading, session.user) {
                        (true, _) => view! {
                            <span class="flex items-center space-x-2">
                                <span class="inline-block loading-spinner w-4 h-4" />
                                <span>"Checking session..."</span>
                            </span>
                        }.into_view(),
                        (false, Some(user)) => view! {
                            <span class="text-green-400">{format!("Signed in as {}", user.email)}</span>
                        }.into_view(),
                        (false, None) => view! { <span>"Not signed in"</span> }.into_view(),
                    }
                }}
            </div>
        </footer>
    }
}
