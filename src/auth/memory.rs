//! In-process identity provider
//!
//! Keeps accounts in memory for development servers and tests. It speaks the
//! same rejection vocabulary as the REST identity toolkit, so the UI behaves
//! identically whichever provider is configured.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use rand_core::OsRng;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::{AuthError, AuthResult};
use super::provider::IdentityProvider;
use super::types::{Credentials, User};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

pub const EMAIL_EXISTS: &str = "EMAIL_EXISTS";
pub const INVALID_EMAIL: &str = "INVALID_EMAIL";
pub const INVALID_LOGIN_CREDENTIALS: &str = "INVALID_LOGIN_CREDENTIALS";
pub const MISSING_PASSWORD: &str = "MISSING_PASSWORD";
pub const WEAK_PASSWORD: &str = "WEAK_PASSWORD : Password should be at least 6 characters";

struct Account {
    uid: String,
    email: String,
    password_hash: String,
}

/// Identity provider backed by an in-memory account table
#[derive(Default)]
pub struct MemoryProvider {
    /// Accounts keyed by normalized email
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered accounts
    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }

    fn hash_password(password: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Unavailable(format!("password hashing failed: {}", e)))
    }

    fn verify_password(password: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    fn issue(account: &Account) -> User {
        User::new(account.uid.clone(), account.email.clone()).with_token(Uuid::new_v4().to_string())
    }
}

/// Lowercase and trim an email, rejecting anything without a local part and a dotted domain
fn normalize_email(email: &str) -> AuthResult<String> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(AuthError::Rejected(INVALID_EMAIL.to_string()))
    }
}

fn require_password(password: &str) -> AuthResult<()> {
    if password.is_empty() {
        return Err(AuthError::Rejected(MISSING_PASSWORD.to_string()));
    }
    Ok(())
}

#[async_trait]
impl IdentityProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn create_account(&self, credentials: &Credentials) -> AuthResult<User> {
        let email = normalize_email(&credentials.email)?;
        require_password(&credentials.password)?;
        if credentials.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Rejected(WEAK_PASSWORD.to_string()));
        }

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&email) {
            return Err(AuthError::Rejected(EMAIL_EXISTS.to_string()));
        }

        let account = Account {
            uid: Uuid::new_v4().simple().to_string(),
            email: email.clone(),
            password_hash: Self::hash_password(&credentials.password)?,
        };
        let user = Self::issue(&account);
        accounts.insert(email, account);

        tracing::info!(uid = %user.uid, email = %user.email, "Account created");
        Ok(user)
    }

    async fn sign_in(&self, credentials: &Credentials) -> AuthResult<User> {
        let email = normalize_email(&credentials.email)?;
        require_password(&credentials.password)?;

        let accounts = self.accounts.read().await;
        match accounts.get(&email) {
            Some(account) if Self::verify_password(&credentials.password, &account.password_hash) => {
                Ok(Self::issue(account))
            }
            _ => Err(AuthError::Rejected(INVALID_LOGIN_CREDENTIALS.to_string())),
        }
    }

    async fn sign_out(&self, user: &User) -> AuthResult<()> {
        tracing::debug!(uid = %user.uid, "Signed out of memory provider");
        Ok(())
    }
}
