//! HTTP API Client
//!
//! Sign-up, sign-in and sign-out against the dashboard API. The session cookie
//! is sent with every request.

use gloo_net::http::{Request, RequestBuilder, Response};
use web_sys::RequestCredentials;

use crate::state::global::SessionView;

/// Default API base URL (same origin as the bundle)
pub const DEFAULT_API_BASE: &str = "/api/v1";

/// Local storage key overriding the API base URL
pub const API_BASE_KEY: &str = "dashboard_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_BASE_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

#[derive(Debug, serde::Serialize)]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Message to show for a failed response: the server's `error.message`
/// untouched, or the status line when the body isn't an error envelope
pub fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => format!("Request failed ({})", status),
        Err(_) => format!("Request failed ({}): {}", status, body.trim()),
    }
}

fn with_credentials(builder: RequestBuilder) -> RequestBuilder {
    builder.credentials(RequestCredentials::Include)
}

async fn session_from(response: Response) -> Result<SessionView, String> {
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(error_message(status, &body));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

async fn submit(endpoint: &str, email: &str, password: &str) -> Result<SessionView, String> {
    let api_base = get_api_base();

    let response = with_credentials(Request::post(&format!("{}/auth/{}", api_base, endpoint)))
        .json(&CredentialsRequest { email, password })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    session_from(response).await
}

/// Create an account; on success the server signs the new user in
pub async fn sign_up(email: &str, password: &str) -> Result<SessionView, String> {
    submit("signup", email, password).await
}

/// Sign in to an existing account
pub async fn sign_in(email: &str, password: &str) -> Result<SessionView, String> {
    submit("signin", email, password).await
}

/// Sign out of the current session
pub async fn sign_out() -> Result<SessionView, String> {
    let api_base = get_api_base();

    let response = with_credentials(Request::post(&format!("{}/auth/signout", api_base)))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    session_from(response).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_is_verbatim() {
        let body = r#"{"error":{"code":"AUTH_REJECTED","message":"WEAK_PASSWORD : Password should be at least 6 characters"},"request_id":"r"}"#;
        assert_eq!(
            error_message(400, body),
            "WEAK_PASSWORD : Password should be at least 6 characters"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        assert_eq!(error_message(502, ""), "Request failed (502)");
        assert_eq!(
            error_message(500, "upstream down"),
            "Request failed (500): upstream down"
        );
    }
}
