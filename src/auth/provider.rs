//! Identity provider trait

use async_trait::async_trait;

use super::error::AuthResult;
use super::types::{Credentials, User};

/// An external identity service keyed by email and password
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Short name for logs and health output
    fn name(&self) -> &str;

    /// Create an account and sign it in
    async fn create_account(&self, credentials: &Credentials) -> AuthResult<User>;

    /// Sign in to an existing account
    async fn sign_in(&self, credentials: &Credentials) -> AuthResult<User>;

    /// End the user's session with the provider
    async fn sign_out(&self, user: &User) -> AuthResult<()>;
}
