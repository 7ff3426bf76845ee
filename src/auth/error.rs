//! Authentication error types

use thiserror::Error;

/// Errors returned by identity-provider operations
#[derive(Error, Debug)]
pub enum AuthError {
    /// The identity service refused the operation; the message is shown verbatim
    #[error("{0}")]
    Rejected(String),

    /// The identity service could not be reached or is misconfigured
    #[error("Identity service unavailable: {0}")]
    Unavailable(String),

    /// Request timed out
    #[error("Identity service request timed out")]
    Timeout,

    /// HTTP transport failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl AuthError {
    /// Map a reqwest failure the way the REST clients do
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AuthError::Timeout
        } else if err.is_connect() {
            AuthError::Unavailable(err.to_string())
        } else {
            AuthError::Request(err)
        }
    }

    /// True when the service answered and said no
    pub fn is_rejection(&self) -> bool {
        matches!(self, AuthError::Rejected(_))
    }
}

/// Result type alias for auth operations
pub type AuthResult<T> = Result<T, AuthError>;
