//! Chart Renderer
//!
//! Linear-scale line chart over the month axis:
//!
//! - **scale**: `LinearScale` and the fixed `ChartLayout`
//! - **line**: series input, polylines, hit targets, gridlines
//! - **tooltip**: pointer-enter / pointer-leave state
//! - **svg**: standalone SVG rendering
//!
//! # Example
//!
//! ```rust
//! use overdose_dashboard::analytics::{series_points, Selection, Summary};
//! use overdose_dashboard::chart::{svg, LineChart};
//! use overdose_dashboard::data::Dataset;
//!
//! let dataset = Dataset::builtin();
//! let selection = Selection::all(dataset);
//! let summary = Summary::for_selection(dataset, &selection);
//!
//! let chart = LineChart::new(
//!     dataset.months().to_vec(),
//!     series_points(dataset, &selection),
//!     summary.max_value as f64,
//! )
//! .expect("non-empty selection");
//!
//! let document = svg::render(&chart, None);
//! assert!(document.starts_with("<svg"));
//! ```

pub mod line;
pub mod scale;
pub mod svg;
pub mod tooltip;

pub use line::{
    AxisTick, ChartGeometry, ChartPoint, Gridline, HitTarget, LineChart, Polyline, SeriesPoints,
    GRIDLINE_COUNT,
};
pub use scale::{ChartLayout, LinearScale, Margins};
pub use tooltip::{format_count, Bounds, HoverError, Tooltip, TooltipState};
