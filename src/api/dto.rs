//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsResult, Selection, Summary};
use crate::data::{Dataset, DatasetRow, Month, PaletteEntry};

// ============================================
// SELECTION
// ============================================

/// `?drugs=a,b` query parameter shared by the dataset endpoints
#[derive(Debug, Default, Deserialize)]
pub struct SelectionParams {
    /// Comma-separated drug names. Absent selects every drug; empty selects none.
    #[serde(default)]
    pub drugs: Option<String>,
}

impl SelectionParams {
    pub fn selection(&self, dataset: &Dataset) -> AnalyticsResult<Selection> {
        match &self.drugs {
            None => Ok(Selection::all(dataset)),
            Some(list) => Selection::parse(dataset, list),
        }
    }
}

// ============================================
// DATASET DTOs
// ============================================

/// Series catalogue
#[derive(Debug, Serialize, Deserialize)]
pub struct DrugsResponse {
    /// Drugs and their colours, in palette order
    pub drugs: Vec<PaletteEntry>,
    /// Month axis
    pub months: Vec<Month>,
    /// Public catalog page the data comes from
    pub dataset_url: String,
}

/// Filtered rows
#[derive(Debug, Serialize, Deserialize)]
pub struct RowsResponse {
    pub drugs: Vec<String>,
    pub count: usize,
    pub rows: Vec<DatasetRow>,
}

/// Summary figures for a selection
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Selected drugs in palette order
    pub drugs: Vec<String>,
    #[serde(flatten)]
    pub summary: Summary,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy
    pub status: String,
    /// Configured identity provider
    pub auth_provider: String,
    /// Registered browser sessions
    pub sessions: usize,
    /// Series in the dataset
    pub series: usize,
    /// Rows in the dataset
    pub rows: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
