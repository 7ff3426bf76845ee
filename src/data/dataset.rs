//! Built-in dataset
//!
//! Monthly overdose death counts per drug for calendar year 2023. The table is
//! expanded once into rows and shared for the lifetime of the process.

use serde::Serialize;
use std::sync::OnceLock;

use super::types::{DatasetRow, Month, PaletteEntry};

/// Public catalog page the counts are drawn from
pub const DATASET_URL: &str =
    "https://data.cdc.gov/NCHS/VSRR-Provisional-Drug-Overdose-Death-Counts/xkb8-kh2a";

const FIRST_MONTH: Month = Month {
    year: 2023,
    month: 1,
};

/// Number of months in every series
pub const MONTH_COUNT: usize = 12;

/// (drug, colour, monthly deaths)
const SERIES_TABLE: [(&str, &str, [u64; MONTH_COUNT]); 5] = [
    (
        "Fentanyl",
        "#e6194b",
        [6412, 5921, 6598, 6487, 6702, 6615, 6834, 6901, 6523, 6644, 6390, 6712],
    ),
    (
        "Methamphetamine",
        "#3cb44b",
        [2874, 2655, 2990, 2941, 3050, 3012, 3121, 3176, 2985, 3034, 2908, 3067],
    ),
    (
        "Cocaine",
        "#4363d8",
        [2190, 2034, 2287, 2245, 2318, 2290, 2356, 2389, 2260, 2301, 2211, 2330],
    ),
    (
        "Heroin",
        "#f58231",
        [512, 468, 521, 497, 505, 489, 476, 470, 451, 443, 428, 437],
    ),
    (
        "Prescription Opioids",
        "#911eb4",
        [1103, 1021, 1134, 1110, 1142, 1128, 1151, 1163, 1117, 1129, 1095, 1146],
    ),
];

/// One drug's monthly series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    pub drug: String,
    pub color: String,
    pub deaths: Vec<u64>,
}

/// The immutable dataset: months, series and the rows derived from them
#[derive(Debug, Clone)]
pub struct Dataset {
    months: Vec<Month>,
    series: Vec<Series>,
    rows: Vec<DatasetRow>,
}

impl Dataset {
    /// The process-wide built-in dataset
    pub fn builtin() -> &'static Dataset {
        static DATASET: OnceLock<Dataset> = OnceLock::new();
        DATASET.get_or_init(|| {
            let series = SERIES_TABLE
                .iter()
                .map(|(drug, color, deaths)| Series {
                    drug: drug.to_string(),
                    color: color.to_string(),
                    deaths: deaths.to_vec(),
                })
                .collect();
            let dataset = Dataset::from_series(FIRST_MONTH, series);
            tracing::debug!(
                rows = dataset.rows.len(),
                series = dataset.series.len(),
                "Built-in dataset initialised"
            );
            dataset
        })
    }

    /// Build a dataset from series that all start at `start`
    ///
    /// The month axis is as long as the longest series. Rows are laid out
    /// month-major in series order.
    pub fn from_series(start: Month, series: Vec<Series>) -> Self {
        let month_count = series.iter().map(|s| s.deaths.len()).max().unwrap_or(0);

        let mut months = Vec::with_capacity(month_count);
        let mut month = start;
        for _ in 0..month_count {
            months.push(month);
            month = month.succ();
        }

        let mut rows = Vec::with_capacity(month_count * series.len());
        for (idx, month) in months.iter().enumerate() {
            for s in &series {
                if let Some(&deaths) = s.deaths.get(idx) {
                    rows.push(DatasetRow {
                        month: *month,
                        drug: s.drug.clone(),
                        deaths,
                    });
                }
            }
        }

        Self {
            months,
            series,
            rows,
        }
    }

    /// Months in chronological order
    pub fn months(&self) -> &[Month] {
        &self.months
    }

    /// The most recent month, if any
    pub fn latest_month(&self) -> Option<Month> {
        self.months.last().copied()
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Series for a single drug
    pub fn series_for(&self, drug: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.drug == drug)
    }

    /// Drug names in palette order
    pub fn drugs(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.drug.as_str())
    }

    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    pub fn contains(&self, drug: &str) -> bool {
        self.series.iter().any(|s| s.drug == drug)
    }

    /// Display colour for a drug; unknown drugs fall back to grey
    pub fn color(&self, drug: &str) -> &str {
        self.series_for(drug)
            .map(|s| s.color.as_str())
            .unwrap_or("#9ca3af")
    }

    pub fn palette(&self) -> Vec<PaletteEntry> {
        self.series
            .iter()
            .map(|s| PaletteEntry {
                drug: s.drug.clone(),
                color: s.color.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_shape() {
        let ds = Dataset::builtin();
        assert_eq!(ds.months().len(), MONTH_COUNT);
        assert_eq!(ds.series().len(), 5);
        assert_eq!(ds.rows().len(), MONTH_COUNT * 5);
        assert_eq!(ds.months()[0].to_string(), "2023-01");
        assert_eq!(ds.latest_month().map(|m| m.to_string()), Some("2023-12".into()));
    }

    #[test]
    fn test_rows_reference_known_drugs() {
        let ds = Dataset::builtin();
        assert!(ds.rows().iter().all(|r| ds.contains(&r.drug)));
        assert_eq!(ds.palette().len(), ds.series().len());
    }

    #[test]
    fn test_literal_total() {
        let ds = Dataset::builtin();
        let from_table: u64 = SERIES_TABLE.iter().flat_map(|(_, _, d)| d.iter()).sum();
        let from_rows: u64 = ds.rows().iter().map(|r| r.deaths).sum();
        assert_eq!(from_table, 160_899);
        assert_eq!(from_rows, from_table);
    }

    #[test]
    fn test_color_lookup() {
        let ds = Dataset::builtin();
        assert_eq!(ds.color("Heroin"), "#f58231");
        assert_eq!(ds.color("Kratom"), "#9ca3af");
    }

    #[test]
    fn test_from_series_ragged() {
        let start = Month::new(2024, 11).unwrap();
        let ds = Dataset::from_series(
            start,
            vec![
                Series {
                    drug: "A".into(),
                    color: "#000".into(),
                    deaths: vec![1, 2, 3],
                },
                Series {
                    drug: "B".into(),
                    color: "#fff".into(),
                    deaths: vec![4],
                },
            ],
        );
        assert_eq!(ds.months().len(), 3);
        assert_eq!(ds.months()[2], Month::new(2025, 1).unwrap());
        assert_eq!(ds.rows().len(), 4);
        assert_eq!(ds.rows()[1].drug, "B");
    }
}
