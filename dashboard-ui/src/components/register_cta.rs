//! Register-to-vote call-to-action, only rendered for signed-in users

use leptos::*;

/// Voter registration page
pub const REGISTER_URL: &str = "https://vote.gov/";

#[component]
pub fn RegisterCta() -> impl IntoView {
    view! {
        <div class="bg-blue-900/40 border border-blue-700 rounded-lg p-4">
            <p class="font-semibold">"Make your voice count on drug policy."</p>
            <p class="text-sm text-gray-300 mt-1">
                "Check your registration status or register in a few minutes."
            </p>
            <a
                href=REGISTER_URL
                target="_blank"
                rel="noopener noreferrer"
                class="inline-block mt-3 px-4 py-2 bg-blue-600 hover:bg-blue-700 rounded font-medium"
            >
                "Register to vote"
            </a>
        </div>
    }
}
