//! Filtering & Derived Statistics
//!
//! - **selection**: the set of drugs chosen for display
//! - **summary**: filtered rows, chart series and summary figures
//!
//! # Example
//!
//! ```rust
//! use overdose_dashboard::analytics::{Selection, Summary};
//! use overdose_dashboard::data::Dataset;
//!
//! let dataset = Dataset::builtin();
//! let mut selection = Selection::all(dataset);
//! selection.toggle(dataset, "Fentanyl").unwrap();
//!
//! let summary = Summary::for_selection(dataset, &selection);
//! assert_eq!(summary.series_count, 4);
//! ```

pub mod error;
pub mod selection;
pub mod summary;

pub use error::{AnalyticsError, AnalyticsResult};
pub use selection::Selection;
pub use summary::{filter_rows, line_chart, max_value, series_points, MonthTotal, Summary};
