//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{AuthGate, IdentityProvider};
use crate::config::Config;
use crate::data::Dataset;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// The static dataset
    pub dataset: &'static Dataset,
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// Per-browser auth gates
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(config: Config, provider: Arc<dyn IdentityProvider>) -> Self {
        let idle = Duration::from_secs(config.auth.session_idle_secs);
        Self {
            dataset: Dataset::builtin(),
            config: Arc::new(config),
            start_time: Instant::now(),
            sessions: Arc::new(SessionRegistry::with_idle_timeout(provider, idle)),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Default idle lifetime of a session with no open event stream
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(3600);

struct SessionEntry {
    gate: Arc<AuthGate>,
    last_seen: Instant,
}

impl SessionEntry {
    fn is_idle(&self, timeout: Duration) -> bool {
        self.gate.subscriber_count() == 0 && self.last_seen.elapsed() >= timeout
    }
}

/// Auth gates keyed by session cookie
///
/// Every browser gets its own gate over the shared provider, so one
/// visitor's sign-in never shows up in another visitor's session. Gates with
/// no open event stream are swept once they have been idle for the timeout.
pub struct SessionRegistry {
    provider: Arc<dyn IdentityProvider>,
    idle_timeout: Duration,
    gates: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionRegistry {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self::with_idle_timeout(provider, DEFAULT_SESSION_IDLE)
    }

    pub fn with_idle_timeout(provider: Arc<dyn IdentityProvider>, idle_timeout: Duration) -> Self {
        Self {
            provider,
            idle_timeout,
            gates: RwLock::new(HashMap::new()),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Gate for an existing session token, marking the session as seen
    pub async fn get(&self, token: &str) -> Option<Arc<AuthGate>> {
        let mut gates = self.gates.write().await;
        let entry = gates.get_mut(token)?;
        entry.last_seen = Instant::now();
        Some(Arc::clone(&entry.gate))
    }

    /// A gate that is not registered yet, resolved to "nobody signed in".
    /// Pass it to [`register`](Self::register) once it is worth keeping.
    pub fn detached(&self) -> Arc<AuthGate> {
        let gate = Arc::new(AuthGate::new(Arc::clone(&self.provider)));
        gate.resolve_initial(None);
        gate
    }

    /// Register a gate under a fresh token
    pub async fn register(&self, gate: Arc<AuthGate>) -> String {
        let token = Uuid::new_v4().simple().to_string();

        let mut gates = self.gates.write().await;
        Self::sweep_locked(&mut gates, self.idle_timeout);
        gates.insert(
            token.clone(),
            SessionEntry {
                gate,
                last_seen: Instant::now(),
            },
        );

        tracing::debug!(session = %token, sessions = gates.len(), "Session registered");
        token
    }

    /// Gate for `token`, or a freshly registered one under a new token
    pub async fn get_or_create(&self, token: Option<&str>) -> (String, Arc<AuthGate>) {
        if let Some(token) = token {
            if let Some(gate) = self.get(token).await {
                return (token.to_string(), gate);
            }
        }

        let gate = self.detached();
        let token = self.register(Arc::clone(&gate)).await;
        (token, gate)
    }

    /// Forget a session
    pub async fn remove(&self, token: &str) -> Option<Arc<AuthGate>> {
        let removed = self.gates.write().await.remove(token).map(|e| e.gate);
        if removed.is_some() {
            tracing::debug!(session = %token, "Session removed");
        }
        removed
    }

    /// Drop idle sessions; returns how many were removed
    pub async fn sweep(&self) -> usize {
        let mut gates = self.gates.write().await;
        Self::sweep_locked(&mut gates, self.idle_timeout)
    }

    fn sweep_locked(gates: &mut HashMap<String, SessionEntry>, timeout: Duration) -> usize {
        let before = gates.len();
        gates.retain(|_, entry| !entry.is_idle(timeout));
        let removed = before - gates.len();
        if removed > 0 {
            tracing::debug!(removed, "Idle sessions swept");
        }
        removed
    }

    /// Number of registered sessions
    pub async fn len(&self) -> usize {
        self.gates.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.gates.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Credentials, MemoryProvider};

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Arc::new(MemoryProvider::new()))
    }

    #[tokio::test]
    async fn test_get_or_create() {
        let registry = registry();
        assert!(registry.is_empty().await);

        let (token, gate) = registry.get_or_create(None).await;
        assert!(!gate.is_loading());
        assert_eq!(registry.len().await, 1);

        let (same, again) = registry.get_or_create(Some(&token)).await;
        assert_eq!(same, token);
        assert!(Arc::ptr_eq(&gate, &again));

        let (other, _) = registry.get_or_create(Some("stale-token")).await;
        assert_ne!(other, "stale-token");
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = registry();
        let (_, alice) = registry.get_or_create(None).await;
        let (_, bob) = registry.get_or_create(None).await;

        alice
            .sign_up(&Credentials::new("alice@example.org", "correct-horse"))
            .await
            .unwrap();

        assert!(alice.current_user().is_some());
        assert!(bob.current_user().is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let registry = registry();
        let (token, _) = registry.get_or_create(None).await;
        assert!(registry.remove(&token).await.is_some());
        assert!(registry.get(&token).await.is_none());
        assert!(registry.remove(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_detached_gate_is_not_registered() {
        let registry = registry();
        let gate = registry.detached();
        assert!(!gate.is_loading());
        assert!(registry.is_empty().await);

        let token = registry.register(Arc::clone(&gate)).await;
        let found = registry.get(&token).await.unwrap();
        assert!(Arc::ptr_eq(&gate, &found));
    }

    #[tokio::test]
    async fn test_idle_sessions_are_swept() {
        let registry =
            SessionRegistry::with_idle_timeout(Arc::new(MemoryProvider::new()), Duration::ZERO);

        registry.get_or_create(None).await;
        let (_, watched) = registry.get_or_create(None).await;
        let _subscription = watched.subscribe();

        // Each registration sweeps sessions idle past the timeout
        registry.get_or_create(None).await;
        assert_eq!(registry.len().await, 2);

        // Only the session with an open stream survives an explicit sweep
        assert_eq!(registry.sweep().await, 1);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_recent_sessions_are_kept() {
        let registry = registry();
        for _ in 0..3 {
            registry.get_or_create(None).await;
        }
        assert_eq!(registry.sweep().await, 0);
        assert_eq!(registry.len().await, 3);
    }
}
