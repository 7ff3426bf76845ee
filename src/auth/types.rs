//! Credentials, users and session state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Email/password pair submitted by the auth form
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signed-in user handle returned by the identity provider
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: String,
    /// Provider-issued ID token; never sent to browsers
    #[serde(skip_serializing, default)]
    pub id_token: Option<String>,
}

impl User {
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            id_token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.id_token = Some(token.into());
        self
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("id_token", &self.id_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Locally held view of the provider's session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// True until the initial session has been resolved
    pub loading: bool,
    pub user: Option<User>,
}

impl SessionState {
    /// Initial state before the provider has reported anything
    pub fn loading() -> Self {
        Self {
            loading: true,
            user: None,
        }
    }

    pub fn resolved(user: Option<User>) -> Self {
        Self {
            loading: false,
            user,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}
