//! Analytics error types

use thiserror::Error;

/// Errors raised while building a selection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// Drug name is not part of the dataset
    #[error("Unknown drug: {0}")]
    UnknownDrug(String),
}

/// Result type alias for analytics operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalyticsError::UnknownDrug("Kratom".to_string());
        assert_eq!(err.to_string(), "Unknown drug: Kratom");
    }
}
