//! Auth Routes
//!
//! Each browser is tied to its own `AuthGate` through an HTTP-only session
//! cookie. Provider rejections come back as 400 with the provider's message.
//!
//! - POST /api/v1/auth/signup - Create an account and sign in
//! - POST /api/v1/auth/signin - Sign in
//! - POST /api/v1/auth/signout - Sign out
//! - GET /api/v1/auth/session - Current session snapshot
//! - GET /api/v1/auth/events - Server-Sent Events stream of session changes

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use futures_util::stream::{Stream, StreamExt};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::auth::{AuthGate, Credentials, SessionState};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "dashboard_session";

/// SSE event name for session updates
pub const SESSION_EVENT: &str = "session";

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Gate bound to the request's cookie, registering a new session if needed
async fn gate_for(state: &AppState, jar: CookieJar) -> (CookieJar, Arc<AuthGate>) {
    let existing = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let (token, gate) = state.sessions.get_or_create(existing.as_deref()).await;

    let jar = if existing.as_deref() == Some(token.as_str()) {
        jar
    } else {
        jar.add(session_cookie(token))
    };
    (jar, gate)
}

#[derive(Clone, Copy)]
enum Attempt {
    SignUp,
    SignIn,
}

/// Run a sign-up or sign-in. A request without a live session only gets one
/// registered once the provider accepts the credentials.
async fn authenticate(
    state: &AppState,
    jar: CookieJar,
    credentials: &Credentials,
    attempt: Attempt,
) -> ApiResult<(CookieJar, Json<SessionState>)> {
    let existing = match jar.get(SESSION_COOKIE) {
        Some(cookie) => state.sessions.get(cookie.value()).await,
        None => None,
    };
    let registered = existing.is_some();
    let gate = existing.unwrap_or_else(|| state.sessions.detached());

    match attempt {
        Attempt::SignUp => gate.sign_up(credentials).await?,
        Attempt::SignIn => gate.sign_in(credentials).await?,
    };

    if registered {
        return Ok((jar, Json(gate.snapshot())));
    }
    let token = state.sessions.register(Arc::clone(&gate)).await;
    Ok((jar.add(session_cookie(token)), Json(gate.snapshot())))
}

/// POST /api/v1/auth/signup
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> ApiResult<(CookieJar, Json<SessionState>)> {
    authenticate(&state, jar, &credentials, Attempt::SignUp).await
}

/// POST /api/v1/auth/signin
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> ApiResult<(CookieJar, Json<SessionState>)> {
    authenticate(&state, jar, &credentials, Attempt::SignIn).await
}

/// POST /api/v1/auth/signout
///
/// The session is forgotten unless an event stream is still watching it;
/// those are left to the idle sweep so the stream sees the sign-out.
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<SessionState>)> {
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        return Ok((jar, Json(SessionState::resolved(None))));
    };

    let Some(gate) = state.sessions.get(&token).await else {
        return Ok((expire_cookie(jar), Json(SessionState::resolved(None))));
    };

    gate.sign_out().await?;
    let snapshot = gate.snapshot();

    if gate.subscriber_count() == 0 {
        state.sessions.remove(&token).await;
        return Ok((expire_cookie(jar), Json(snapshot)));
    }
    Ok((jar, Json(snapshot)))
}

fn expire_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// GET /api/v1/auth/session
pub async fn session(State(state): State<Arc<AppState>>, jar: CookieJar) -> Json<SessionState> {
    let gate = match jar.get(SESSION_COOKIE) {
        Some(cookie) => state.sessions.get(cookie.value()).await,
        None => None,
    };

    Json(
        gate.map(|g| g.snapshot())
            .unwrap_or_else(|| SessionState::resolved(None)),
    )
}

/// GET /api/v1/auth/events
///
/// Emits the current session immediately, then one event per change.
pub async fn session_events(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (
    CookieJar,
    Sse<impl Stream<Item = Result<Event, axum::Error>>>,
) {
    let (jar, gate) = gate_for(&state, jar).await;
    let subscription = gate.subscribe();
    tracing::debug!(subscription = %subscription.id(), "Session event stream opened");

    let events = subscription
        .into_stream()
        .map(|session| Event::default().event(SESSION_EVENT).json_data(session));

    (jar, Sse::new(events).keep_alive(KeepAlive::default()))
}
