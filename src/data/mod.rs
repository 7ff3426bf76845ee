//! Dataset
//!
//! The static monthly overdose table:
//!
//! - **types**: `Month`, `DatasetRow`, `PaletteEntry`
//! - **dataset**: the built-in series table and the rows generated from it

pub mod dataset;
pub mod types;

pub use dataset::{Dataset, Series, DATASET_URL, MONTH_COUNT};
pub use types::{DatasetRow, Month, MonthParseError, PaletteEntry};
