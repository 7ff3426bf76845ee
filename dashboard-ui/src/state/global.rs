//! Global Application State
//!
//! Reactive state management using Leptos signals. The selection and tooltip
//! reuse the core library's types so the page derives exactly what the API
//! serves.

use leptos::*;
use overdose_dashboard::{Dataset, Selection, TooltipState};

/// Signed-in user as reported by the session stream
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct SessionUser {
    pub uid: String,
    pub email: String,
}

/// Local view of the provider's session
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct SessionView {
    /// True until the first session event arrives
    pub loading: bool,
    pub user: Option<SessionUser>,
}

impl Default for SessionView {
    fn default() -> Self {
        Self {
            loading: true,
            user: None,
        }
    }
}

impl SessionView {
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Drugs currently plotted and aggregated
    pub selection: RwSignal<Selection>,
    /// Chart hover tooltip
    pub tooltip: RwSignal<TooltipState>,
    /// Latest session reported by the server
    pub session: RwSignal<SessionView>,
    /// Last identity-service rejection, shown verbatim
    pub auth_error: RwSignal<Option<String>>,
    /// An auth request is in flight
    pub auth_pending: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() -> GlobalState {
    let state = GlobalState::new();
    provide_context(state);
    state
}

impl GlobalState {
    /// Every drug selected, no tooltip, session still loading
    pub fn new() -> Self {
        Self {
            selection: create_rw_signal(Selection::all(Dataset::builtin())),
            tooltip: create_rw_signal(TooltipState::new()),
            session: create_rw_signal(SessionView::default()),
            auth_error: create_rw_signal(None),
            auth_pending: create_rw_signal(false),
            error: create_rw_signal(None),
            success: create_rw_signal(None),
        }
    }

    /// Add or remove a drug from the selection
    pub fn toggle_drug(&self, drug: &str) {
        let mut result = Ok(false);
        self.selection.update(|selection| {
            result = selection.toggle(Dataset::builtin(), drug);
        });
        if let Err(e) = result {
            self.show_error(&e.to_string());
        }
        // A hidden series can't keep its tooltip
        self.tooltip.update(|t| t.pointer_leave());
    }

    pub fn select_all(&self) {
        self.selection
            .update(|selection| selection.select_all(Dataset::builtin()));
    }

    pub fn clear_selection(&self) {
        self.selection.update(|selection| selection.clear());
        self.tooltip.update(|t| t.pointer_leave());
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_toggle_twice_restores_selection() {
        let runtime = create_runtime();
        let state = GlobalState::new();
        let before = state.selection.get_untracked();

        state.toggle_drug("Heroin");
        assert!(!state.selection.with_untracked(|s| s.contains("Heroin")));
        state.toggle_drug("Heroin");
        assert_eq!(state.selection.get_untracked(), before);

        state.clear_selection();
        assert!(state.selection.with_untracked(|s| s.is_empty()));
        state.select_all();
        assert_eq!(state.selection.get_untracked(), before);

        runtime.dispose();
    }
}
