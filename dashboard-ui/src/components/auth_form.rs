//! Auth Panel Component
//!
//! Email/password form while signed out; the user's e-mail, "Sign out" and
//! the register-to-vote call-to-action while signed in. Identity-service
//! rejections are shown exactly as the service worded them.

use leptos::*;

use crate::api;
use crate::components::{Loading, RegisterCta};
use crate::state::global::{GlobalState, SessionView};

#[derive(Clone, Copy, PartialEq, Eq)]
enum AuthAction {
    SignUp,
    SignIn,
}

#[component]
pub fn AuthPanel() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div class="bg-gray-800 rounded-xl p-6 border border-gray-700">
            {move || {
                let session = state.session.get();
                if session.loading {
                    view! { <Loading /> }.into_view()
                } else if let Some(user) = session.user {
                    view! { <SignedIn email=user.email /> }.into_view()
                } else {
                    view! { <AuthForm /> }.into_view()
                }
            }}
        </div>
    }
}

#[component]
fn AuthForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());

    let run = move |action: AuthAction| {
        if state.auth_pending.get_untracked() {
            return;
        }
        state.auth_pending.set(true);
        state.auth_error.set(None);

        let email = email.get_untracked();
        let password = password.get_untracked();

        spawn_local(async move {
            let result = match action {
                AuthAction::SignUp => api::sign_up(&email, &password).await,
                AuthAction::SignIn => api::sign_in(&email, &password).await,
            };

            match result {
                Ok(view) => {
                    apply_session(state, view);
                    set_password.set(String::new());
                    state.show_success(match action {
                        AuthAction::SignUp => "Account created",
                        AuthAction::SignIn => "Signed in",
                    });
                }
                Err(message) => state.auth_error.set(Some(message)),
            }

            state.auth_pending.set(false);
        });
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        run(AuthAction::SignIn);
    };

    view! {
        <form class="space-y-4" on:submit=on_submit>
            <h2 class="text-lg font-semibold">"Sign in to register to vote"</h2>

            <input
                type="email"
                placeholder="Email"
                autocomplete="email"
                class="w-full px-3 py-2 bg-gray-900 border border-gray-700 rounded"
                prop:value=email
                on:input=move |ev| set_email.set(event_target_value(&ev))
            />
            <input
                type="password"
                placeholder="Password"
                autocomplete="current-password"
                class="w-full px-3 py-2 bg-gray-900 border border-gray-700 rounded"
                prop:value=password
                on:input=move |ev| set_password.set(event_target_value(&ev))
            />

            {move || state.auth_error.get().map(|message| view! {
                <p class="text-sm text-red-400" role="alert">{message}</p>
            })}

            <div class="flex space-x-2">
                <button
                    type="button"
                    class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded disabled:opacity-50"
                    prop:disabled=move || state.auth_pending.get()
                    on:click=move |_| run(AuthAction::SignUp)
                >
                    "Create account"
                </button>
                <button
                    type="submit"
                    class="px-4 py-2 bg-blue-600 hover:bg-blue-700 rounded disabled:opacity-50"
                    prop:disabled=move || state.auth_pending.get()
                >
                    "Sign in"
                </button>
            </div>
        </form>
    }
}

#[component]
fn SignedIn(email: String) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let sign_out = move |_: ev::MouseEvent| {
        state.auth_pending.set(true);
        spawn_local(async move {
            match api::sign_out().await {
                Ok(view) => apply_session(state, view),
                Err(message) => state.show_error(&message),
            }
            state.auth_pending.set(false);
        });
    };

    view! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <span class="text-sm text-gray-300">{format!("Signed in as {}", email)}</span>
                <button
                    class="px-3 py-1 text-sm bg-gray-700 hover:bg-gray-600 rounded disabled:opacity-50"
                    prop:disabled=move || state.auth_pending.get()
                    on:click=sign_out
                >
                    "Sign out"
                </button>
            </div>
            <RegisterCta />
        </div>
    }
}

/// The session stream will report the same change; applying the response too
/// keeps the form responsive when the stream is slow
fn apply_session(state: GlobalState, view: SessionView) {
    state.auth_error.set(None);
    state.session.set(view);
}
