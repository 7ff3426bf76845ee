//! Authentication Gate
//!
//! Email/password accounts against an external identity service:
//!
//! - **provider**: the `IdentityProvider` trait
//! - **identity_toolkit**: REST client for a Firebase-compatible identity toolkit
//! - **memory**: in-process provider for development and tests
//! - **gate**: `AuthGate`, the provider handle plus an observable session
//!
//! Provider rejections surface verbatim through `AuthError::Rejected`.

pub mod error;
pub mod gate;
pub mod identity_toolkit;
pub mod memory;
pub mod provider;
pub mod types;

pub use error::{AuthError, AuthResult};
pub use gate::{AuthGate, SessionSubscription};
pub use identity_toolkit::{IdentityToolkitConfig, IdentityToolkitProvider};
pub use memory::MemoryProvider;
pub use provider::IdentityProvider;
pub use types::{Credentials, SessionState, User};
