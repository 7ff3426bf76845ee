//! Derived statistics
//!
//! Everything here is a pure function of (dataset, selection): filtered rows,
//! per-series chart points, the plot maximum and the summary figures.

use serde::{Deserialize, Serialize};

use super::selection::Selection;
use crate::chart::{ChartPoint, LineChart, SeriesPoints};
use crate::data::{Dataset, DatasetRow, Month};

/// Rows whose drug is in the selection, in dataset order
pub fn filter_rows<'a>(dataset: &'a Dataset, selection: &Selection) -> Vec<&'a DatasetRow> {
    dataset
        .rows()
        .iter()
        .filter(|row| selection.contains(&row.drug))
        .collect()
}

/// One point list per selected series, in palette order
pub fn series_points(dataset: &Dataset, selection: &Selection) -> Vec<SeriesPoints> {
    dataset
        .series()
        .iter()
        .filter(|s| selection.contains(&s.drug))
        .map(|s| SeriesPoints {
            name: s.drug.clone(),
            color: s.color.clone(),
            points: dataset
                .months()
                .iter()
                .zip(&s.deaths)
                .map(|(month, deaths)| ChartPoint {
                    month: *month,
                    value: *deaths as f64,
                })
                .collect(),
        })
        .collect()
}

/// Chart of the selected series scaled to their largest count; `None` when
/// nothing is selected
pub fn line_chart(dataset: &Dataset, selection: &Selection) -> Option<LineChart> {
    let rows = filter_rows(dataset, selection);
    LineChart::new(
        dataset.months().to_vec(),
        series_points(dataset, selection),
        max_value(&rows) as f64,
    )
}

/// Largest single monthly count among the rows, 0 when there are none
pub fn max_value(rows: &[&DatasetRow]) -> u64 {
    rows.iter().map(|r| r.deaths).max().unwrap_or(0)
}

/// Deaths summed over one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTotal {
    pub month: Month,
    pub deaths: u64,
}

/// Summary figures for a selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Sum of deaths over all filtered rows
    pub grand_total: u64,
    /// Per-month totals in month order (zero for months with no rows)
    pub monthly_totals: Vec<MonthTotal>,
    /// Last month of the dataset's fixed month order
    pub latest_month: Option<Month>,
    pub latest_month_total: u64,
    /// Grand total divided by month count, rounded
    pub average_per_month: u64,
    /// Largest single monthly count, used as the chart maximum
    pub max_value: u64,
    pub row_count: usize,
    pub series_count: usize,
}

impl Summary {
    /// Compute the summary for a selection
    pub fn for_selection(dataset: &Dataset, selection: &Selection) -> Self {
        let rows = filter_rows(dataset, selection);
        Self::from_rows(dataset, &rows, selection.len())
    }

    /// Compute the summary from already filtered rows
    pub fn from_rows(dataset: &Dataset, rows: &[&DatasetRow], series_count: usize) -> Self {
        let grand_total: u64 = rows.iter().map(|r| r.deaths).sum();

        let monthly_totals: Vec<MonthTotal> = dataset
            .months()
            .iter()
            .map(|month| MonthTotal {
                month: *month,
                deaths: rows
                    .iter()
                    .filter(|r| r.month == *month)
                    .map(|r| r.deaths)
                    .sum(),
            })
            .collect();

        let latest_month = dataset.latest_month();
        let latest_month_total = latest_month
            .and_then(|latest| monthly_totals.iter().find(|t| t.month == latest))
            .map(|t| t.deaths)
            .unwrap_or(0);

        let month_count = dataset.months().len();
        let average_per_month = if month_count == 0 {
            0
        } else {
            (grand_total as f64 / month_count as f64).round() as u64
        };

        Self {
            grand_total,
            monthly_totals,
            latest_month,
            latest_month_total,
            average_per_month,
            max_value: max_value(rows),
            row_count: rows.len(),
            series_count,
        }
    }

    /// True when nothing is selected and there is nothing to show
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}
