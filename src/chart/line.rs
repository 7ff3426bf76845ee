//! Line chart geometry
//!
//! Turns per-series point lists into screen coordinates: one polyline per
//! series, a hit target per point and five gridlines from zero to the maximum.

use serde::{Deserialize, Serialize};

use super::scale::{ChartLayout, LinearScale};
use super::tooltip::{HoverError, Tooltip};
use crate::data::Month;

/// Number of horizontal gridlines, including the zero line
pub const GRIDLINE_COUNT: usize = 5;

/// A single (month, value) input point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub month: Month,
    pub value: f64,
}

/// Input points for one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoints {
    pub name: String,
    pub color: String,
    pub points: Vec<ChartPoint>,
}

/// A horizontal gridline at `value`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gridline {
    pub value: f64,
    pub y: f64,
}

/// Month label position on the x axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub month: Month,
    pub label: String,
    pub x: f64,
}

/// One drawn series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub name: String,
    pub color: String,
    pub points: Vec<(f64, f64)>,
}

impl Polyline {
    /// SVG `points` attribute
    pub fn svg_points(&self) -> String {
        self.points
            .iter()
            .map(|(x, y)| format!("{:.2},{:.2}", x, y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Pointer target for a single data point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitTarget {
    pub series: String,
    pub color: String,
    pub month: Month,
    pub value: f64,
    pub x: f64,
    pub y: f64,
}

/// Serializable snapshot of the drawn chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub max: f64,
    pub gridlines: Vec<Gridline>,
    pub ticks: Vec<AxisTick>,
    pub polylines: Vec<Polyline>,
    pub hit_targets: Vec<HitTarget>,
}

/// Multi-series line chart over a fixed month axis
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    layout: ChartLayout,
    months: Vec<Month>,
    series: Vec<SeriesPoints>,
    max: f64,
}

impl LineChart {
    /// Build a chart. Returns `None` when there is nothing to draw (no months,
    /// or no series with points); callers show a placeholder instead.
    pub fn new(months: Vec<Month>, series: Vec<SeriesPoints>, max: f64) -> Option<Self> {
        Self::with_layout(ChartLayout::default(), months, series, max)
    }

    pub fn with_layout(
        layout: ChartLayout,
        months: Vec<Month>,
        series: Vec<SeriesPoints>,
        max: f64,
    ) -> Option<Self> {
        if months.is_empty() || series.iter().all(|s| s.points.is_empty()) {
            return None;
        }

        Some(Self {
            layout,
            months,
            series,
            max,
        })
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn months(&self) -> &[Month] {
        &self.months
    }

    pub fn series(&self) -> &[SeriesPoints] {
        &self.series
    }

    /// Maximum used for scaling; non-positive maxima become 1
    pub fn effective_max(&self) -> f64 {
        if self.max > 0.0 {
            self.max
        } else {
            1.0
        }
    }

    /// Month index → horizontal position, evenly spaced across the plot width
    pub fn x_scale(&self) -> LinearScale {
        let last = self.months.len().saturating_sub(1).max(1) as f64;
        LinearScale::new(
            (0.0, last),
            (self.layout.plot_left(), self.layout.plot_right()),
        )
    }

    /// Value → vertical position, inverted so larger values sit higher
    pub fn y_scale(&self) -> LinearScale {
        LinearScale::new(
            (0.0, self.effective_max()),
            (self.layout.baseline(), self.layout.plot_top()),
        )
    }

    fn month_index(&self, month: &Month) -> Option<usize> {
        self.months.iter().position(|m| m == month)
    }

    /// Horizontal position of a month, if it is on the axis
    pub fn x_for(&self, month: &Month) -> Option<f64> {
        let scale = self.x_scale();
        self.month_index(month).map(|i| scale.map(i as f64))
    }

    pub fn gridlines(&self) -> Vec<Gridline> {
        let max = self.effective_max();
        let y = self.y_scale();
        (0..GRIDLINE_COUNT)
            .map(|k| {
                let value = max * k as f64 / (GRIDLINE_COUNT - 1) as f64;
                Gridline {
                    value,
                    y: y.map(value),
                }
            })
            .collect()
    }

    pub fn ticks(&self) -> Vec<AxisTick> {
        let x = self.x_scale();
        self.months
            .iter()
            .enumerate()
            .map(|(i, month)| AxisTick {
                month: *month,
                label: month.short_label(),
                x: x.map(i as f64),
            })
            .collect()
    }

    /// Points of one series sorted into month order; points whose month is
    /// not on the axis are dropped
    fn ordered_points(&self, series: &SeriesPoints) -> Vec<(usize, ChartPoint)> {
        let mut points: Vec<(usize, ChartPoint)> = series
            .points
            .iter()
            .filter_map(|p| self.month_index(&p.month).map(|i| (i, *p)))
            .collect();
        points.sort_by_key(|(i, _)| *i);
        points
    }

    pub fn polylines(&self) -> Vec<Polyline> {
        let (x, y) = (self.x_scale(), self.y_scale());
        self.series
            .iter()
            .filter(|s| !s.points.is_empty())
            .map(|s| Polyline {
                name: s.name.clone(),
                color: s.color.clone(),
                points: self
                    .ordered_points(s)
                    .into_iter()
                    .map(|(i, p)| (x.map(i as f64), y.map(p.value)))
                    .collect(),
            })
            .collect()
    }

    pub fn hit_targets(&self) -> Vec<HitTarget> {
        let (x, y) = (self.x_scale(), self.y_scale());
        self.series
            .iter()
            .flat_map(|s| {
                self.ordered_points(s)
                    .into_iter()
                    .map(|(i, p)| HitTarget {
                        series: s.name.clone(),
                        color: s.color.clone(),
                        month: p.month,
                        value: p.value,
                        x: x.map(i as f64),
                        y: y.map(p.value),
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Hit target for one series at one month
    pub fn hit_target(&self, series: &str, month: Month) -> Option<HitTarget> {
        self.hit_targets()
            .into_iter()
            .find(|t| t.series == series && t.month == month)
    }

    /// Tooltip anchored at the point named by a `Drug@YYYY-MM` reference
    pub fn tooltip_for(&self, hover: &str) -> Result<Tooltip, HoverError> {
        let (series, month) = Tooltip::parse_hover(hover)?;
        self.hit_target(series, month)
            .map(|target| Tooltip::at_target(&target))
            .ok_or_else(|| HoverError::NoPoint(hover.to_string()))
    }

    pub fn geometry(&self) -> ChartGeometry {
        ChartGeometry {
            width: self.layout.width,
            height: self.layout.height,
            max: self.effective_max(),
            gridlines: self.gridlines(),
            ticks: self.ticks(),
            polylines: self.polylines(),
            hit_targets: self.hit_targets(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn months(n: u32) -> Vec<Month> {
        (1..=n).filter_map(|m| Month::new(2023, m)).collect()
    }

    fn series(name: &str, values: &[f64]) -> SeriesPoints {
        SeriesPoints {
            name: name.to_string(),
            color: "#000000".to_string(),
            points: values
                .iter()
                .enumerate()
                .filter_map(|(i, v)| {
                    Month::new(2023, i as u32 + 1).map(|month| ChartPoint { month, value: *v })
                })
                .collect(),
        }
    }

    #[test]
    fn test_max_maps_to_top_and_zero_to_baseline() {
        let chart = LineChart::new(months(3), vec![series("a", &[0.0, 50.0, 100.0])], 100.0)
            .unwrap();
        let layout = *chart.layout();
        let y = chart.y_scale();
        assert_eq!(y.map(100.0), layout.plot_top());
        assert_eq!(y.map(0.0), layout.baseline());

        let line = &chart.polylines()[0];
        assert_eq!(line.points[0].1, layout.baseline());
        assert_eq!(line.points[2].1, layout.plot_top());
    }

    #[test]
    fn test_non_positive_max_is_guarded() {
        let chart = LineChart::new(months(2), vec![series("a", &[0.0, 0.0])], 0.0).unwrap();
        assert_eq!(chart.effective_max(), 1.0);
        assert!(chart.hit_targets().iter().all(|t| t.y.is_finite()));

        let chart = LineChart::new(months(2), vec![series("a", &[0.0, 0.0])], -5.0).unwrap();
        assert_eq!(chart.effective_max(), 1.0);
    }

    #[test]
    fn test_x_spacing_is_even() {
        let chart = LineChart::new(months(12), vec![series("a", &[1.0; 12])], 1.0).unwrap();
        let layout = *chart.layout();
        let xs: Vec<f64> = chart.ticks().iter().map(|t| t.x).collect();
        assert_eq!(xs[0], layout.plot_left());
        assert_eq!(xs[11], layout.plot_right());
        let step = layout.plot_width() / 11.0;
        for w in xs.windows(2) {
            assert!((w[1] - w[0] - step).abs() < 1e-9);
        }
    }

    #[test]
    fn test_five_gridlines_from_zero_to_max() {
        let chart = LineChart::new(months(2), vec![series("a", &[1.0, 2.0])], 400.0).unwrap();
        let values: Vec<f64> = chart.gridlines().iter().map(|g| g.value).collect();
        assert_eq!(values, vec![0.0, 100.0, 200.0, 300.0, 400.0]);
        let grid = chart.gridlines();
        assert_eq!(grid[0].y, chart.layout().baseline());
        assert_eq!(grid[4].y, chart.layout().plot_top());
    }

    #[test]
    fn test_points_connected_in_month_order() {
        let mut s = series("a", &[1.0, 2.0, 3.0]);
        s.points.reverse();
        let chart = LineChart::new(months(3), vec![s], 3.0).unwrap();
        let xs: Vec<f64> = chart.polylines()[0].points.iter().map(|p| p.0).collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        assert!(LineChart::new(months(3), vec![], 10.0).is_none());
        assert!(LineChart::new(months(3), vec![series("a", &[])], 10.0).is_none());
        assert!(LineChart::new(vec![], vec![series("a", &[1.0])], 10.0).is_none());
    }

    #[test]
    fn test_single_month_axis() {
        let chart = LineChart::new(months(1), vec![series("a", &[5.0])], 5.0).unwrap();
        assert_eq!(chart.hit_targets()[0].x, chart.layout().plot_left());
    }

    #[test]
    fn test_hit_targets_cover_every_point() {
        let chart = LineChart::new(
            months(3),
            vec![series("a", &[1.0, 2.0, 3.0]), series("b", &[3.0, 2.0, 1.0])],
            3.0,
        )
        .unwrap();
        let targets = chart.hit_targets();
        assert_eq!(targets.len(), 6);
        assert_eq!(targets[3].series, "b");
        assert_eq!(targets[3].value, 3.0);
    }

    #[test]
    fn test_tooltip_for_hover_reference() {
        let chart = LineChart::new(
            months(3),
            vec![series("a", &[1.0, 2.0, 3.0]), series("b b", &[3.0, 2.0, 1.0])],
            3.0,
        )
        .unwrap();

        let tip = chart.tooltip_for(" b b @2023-02").unwrap();
        assert_eq!(tip.series, "b b");
        assert_eq!(tip.value, 2.0);
        assert_eq!(Some(tip.x), chart.x_for(&Month::new(2023, 2).unwrap()));

        assert_eq!(chart.tooltip_for("a"), Err(HoverError::Malformed));
        assert_eq!(
            chart.tooltip_for("a@2023-06"),
            Err(HoverError::NoPoint("a@2023-06".to_string()))
        );
        assert!(matches!(
            chart.tooltip_for("c@2023-01x"),
            Err(HoverError::Month(_))
        ));
    }

    #[test]
    fn test_svg_points_format() {
        let line = Polyline {
            name: "a".into(),
            color: "#000".into(),
            points: vec![(60.0, 360.0), (780.5, 20.25)],
        };
        assert_eq!(line.svg_points(), "60.00,360.00 780.50,20.25");
    }
}
