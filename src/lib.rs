//! # Overdose Dashboard
//!
//! Monthly overdose death counts by drug: a static dataset, selection and
//! summary statistics, a multi-series line chart, and an email/password auth
//! gate in front of a "register to vote" call-to-action.
//!
//! ## Modules
//!
//! - [`data`]: The built-in dataset, months and palette
//! - [`analytics`]: Selection, filtered rows and summary figures
//! - [`chart`]: Line chart geometry, tooltips and SVG output
//! - [`auth`]: Identity providers and the auth gate (feature `server`)
//! - [`api`]: REST API server with Axum (feature `server`)
//! - [`config`]: TOML + environment configuration (feature `server`)
//!
//! The core modules build without the `server` feature so the browser UI
//! can share them.
//!
//! ## Quick Start
//!
//! ```rust
//! use overdose_dashboard::{Dataset, Selection, Summary};
//!
//! let dataset = Dataset::builtin();
//! let summary = Summary::for_selection(dataset, &Selection::all(dataset));
//!
//! assert_eq!(summary.grand_total, 160_899);
//! assert_eq!(summary.average_per_month, 13_408);
//! ```

pub mod analytics;
pub mod chart;
pub mod data;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod config;

// Re-export top-level types for convenience
pub use data::{Dataset, DatasetRow, Month, PaletteEntry, Series, DATASET_URL};

pub use analytics::{AnalyticsError, AnalyticsResult, MonthTotal, Selection, Summary};

pub use chart::{ChartGeometry, ChartLayout, LineChart, Tooltip, TooltipState};

#[cfg(feature = "server")]
pub use api::{build_router, serve, ApiError, AppState};

#[cfg(feature = "server")]
pub use auth::{
    AuthError, AuthGate, Credentials, IdentityProvider, IdentityToolkitProvider, MemoryProvider,
    SessionState, User,
};

#[cfg(feature = "server")]
pub use config::{Config, ConfigError, ProviderKind};
