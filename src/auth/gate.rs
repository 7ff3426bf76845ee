//! Auth Gate
//!
//! Holds the identity-provider handle and the observable session. The session
//! lives in a `watch` channel: the gate is the only writer, and every
//! subscriber sees the latest `SessionState`. A successful operation
//! publishes a new state. A failed one leaves the session untouched and
//! hands the provider's error back to the caller.

use futures_util::stream::{self, Stream};
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

use super::error::AuthResult;
use super::provider::IdentityProvider;
use super::types::{Credentials, SessionState, User};

/// Wrapper around an identity provider with a locally observable session
pub struct AuthGate {
    provider: Arc<dyn IdentityProvider>,
    session: watch::Sender<SessionState>,
}

impl AuthGate {
    /// Create a gate whose session is still loading
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (session, _) = watch::channel(SessionState::loading());
        Self { provider, session }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Report the initial session and clear the loading flag
    pub fn resolve_initial(&self, user: Option<User>) {
        self.session.send_replace(SessionState::resolved(user));
    }

    /// Current session state
    pub fn snapshot(&self) -> SessionState {
        self.session.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.session.borrow().loading
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.session.receiver_count()
    }

    /// Subscribe to session changes; dropping the handle unsubscribes
    pub fn subscribe(&self) -> SessionSubscription {
        let subscription = SessionSubscription {
            id: Uuid::new_v4().simple().to_string(),
            receiver: self.session.subscribe(),
        };
        tracing::debug!(subscription = %subscription.id, "Session subscription opened");
        subscription
    }

    /// Create an account and make it the current user
    pub async fn sign_up(&self, credentials: &Credentials) -> AuthResult<User> {
        let result = self.provider.create_account(credentials).await;
        self.settle("sign_up", &credentials.email, result)
    }

    /// Sign in and make the account the current user
    pub async fn sign_in(&self, credentials: &Credentials) -> AuthResult<User> {
        let result = self.provider.sign_in(credentials).await;
        self.settle("sign_in", &credentials.email, result)
    }

    /// Sign out the current user, if any
    pub async fn sign_out(&self) -> AuthResult<()> {
        let Some(user) = self.current_user() else {
            self.session.send_if_modified(|state| {
                let was_loading = state.loading;
                state.loading = false;
                was_loading
            });
            return Ok(());
        };

        if let Err(e) = self.provider.sign_out(&user).await {
            tracing::warn!(email = %user.email, error = %e, "Sign-out failed");
            return Err(e);
        }

        self.session.send_replace(SessionState::resolved(None));
        tracing::info!(email = %user.email, "Signed out");
        Ok(())
    }

    fn settle(&self, operation: &str, email: &str, result: AuthResult<User>) -> AuthResult<User> {
        match result {
            Ok(user) => {
                self.session
                    .send_replace(SessionState::resolved(Some(user.clone())));
                tracing::info!(operation, email = %user.email, "Session started");
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(operation, email = %email, error = %e, "Auth operation failed");
                Err(e)
            }
        }
    }
}

/// Live view of a gate's session
pub struct SessionSubscription {
    id: String,
    receiver: watch::Receiver<SessionState>,
}

impl SessionSubscription {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Latest state, marking it as seen
    pub fn current(&mut self) -> SessionState {
        self.receiver.borrow_and_update().clone()
    }

    /// Wait for the next change; `None` once the gate is gone
    pub async fn changed(&mut self) -> Option<SessionState> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// The current state followed by every later change
    pub fn into_stream(self) -> impl Stream<Item = SessionState> + Send + 'static {
        stream::unfold((self, true), |(mut subscription, first)| async move {
            let state = if first {
                subscription.current()
            } else {
                subscription.changed().await?
            };
            Some((state, (subscription, false)))
        })
    }
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        tracing::debug!(subscription = %self.id, "Session subscription closed");
    }
}
