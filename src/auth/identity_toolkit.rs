//! Identity Toolkit REST client
//!
//! Email/password accounts against a Firebase-compatible identity toolkit:
//! `accounts:signUp` and `accounts:signInWithPassword`, both keyed by an API
//! key. The service is stateless, so sign-out only drops the token locally.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::{AuthError, AuthResult};
use super::provider::IdentityProvider;
use super::types::{Credentials, User};

/// Configuration for the identity toolkit client
#[derive(Debug, Clone)]
pub struct IdentityToolkitConfig {
    /// Base URL, e.g. `https://identitytoolkit.googleapis.com/v1`
    pub base_url: String,
    /// Web API key of the project
    pub api_key: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for IdentityToolkitConfig {
    fn default() -> Self {
        Self {
            base_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
            api_key: String::new(),
            request_timeout_ms: 10_000,
        }
    }
}

/// REST identity provider
pub struct IdentityToolkitProvider {
    client: Client,
    config: IdentityToolkitConfig,
}

impl IdentityToolkitProvider {
    pub fn new(config: IdentityToolkitConfig) -> AuthResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AuthError::Unavailable(
                "identity toolkit API key is not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(AuthError::Request)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &IdentityToolkitConfig {
        &self.config
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/accounts:{}?key={}",
            self.config.base_url.trim_end_matches('/'),
            method,
            self.config.api_key
        )
    }

    async fn call(&self, method: &str, credentials: &Credentials) -> AuthResult<User> {
        let body = PasswordRequest {
            email: &credentials.email,
            password: &credentials.password,
            return_secure_token: true,
        };

        let response = self
            .client
            .post(self.endpoint(method))
            .json(&body)
            .send()
            .await
            .map_err(AuthError::from_transport)?;

        let status = response.status();
        if status.is_success() {
            let account: AccountResponse = response.json().await.map_err(AuthError::Request)?;
            let email = account
                .email
                .unwrap_or_else(|| credentials.email.trim().to_string());
            let mut user = User::new(account.local_id, email);
            user.id_token = account.id_token;
            Ok(user)
        } else {
            let text = response.text().await.unwrap_or_default();
            let message = rejection_message(&text)
                .unwrap_or_else(|| format!("{} {}", status.as_u16(), text.trim()));
            tracing::debug!(
                method,
                status = status.as_u16(),
                message = %message,
                "Identity toolkit rejected request"
            );
            Err(AuthError::Rejected(message))
        }
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitProvider {
    fn name(&self) -> &str {
        "identity_toolkit"
    }

    async fn create_account(&self, credentials: &Credentials) -> AuthResult<User> {
        self.call("signUp", credentials).await
    }

    async fn sign_in(&self, credentials: &Credentials) -> AuthResult<User> {
        self.call("signInWithPassword", credentials).await
    }

    async fn sign_out(&self, user: &User) -> AuthResult<()> {
        tracing::debug!(uid = %user.uid, "Dropping identity toolkit token");
        Ok(())
    }
}

/// Pull `error.message` out of an identity toolkit error body
fn rejection_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}
