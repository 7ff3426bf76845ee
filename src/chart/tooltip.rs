//! Hover tooltip state
//!
//! Pointer-enter on a hit target positions the tooltip relative to the chart's
//! bounding box; pointer-leave clears it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::line::HitTarget;
use crate::data::{Month, MonthParseError};

/// A `Drug@YYYY-MM` hover reference that cannot be drawn
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HoverError {
    #[error("hover must look like Drug@YYYY-MM")]
    Malformed,

    #[error(transparent)]
    Month(#[from] MonthParseError),

    #[error("no plotted point for '{0}'")]
    NoPoint(String),
}

/// Bounding box of the rendered chart, in client coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Visible tooltip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub series: String,
    pub color: String,
    pub month: Month,
    pub value: f64,
    /// Position relative to the chart's top-left corner
    pub x: f64,
    pub y: f64,
}

impl Tooltip {
    /// Tooltip anchored at the target itself, in view-box coordinates
    pub fn at_target(target: &HitTarget) -> Self {
        Self {
            series: target.series.clone(),
            color: target.color.clone(),
            month: target.month,
            value: target.value,
            x: target.x,
            y: target.y,
        }
    }

    /// Split a `Drug@YYYY-MM` hover reference into series name and month
    pub fn parse_hover(hover: &str) -> Result<(&str, Month), HoverError> {
        let (series, month) = hover.rsplit_once('@').ok_or(HoverError::Malformed)?;
        Ok((series.trim(), Month::parse(month)?))
    }

    pub fn month_label(&self) -> String {
        self.month.label()
    }

    pub fn value_label(&self) -> String {
        format_count(self.value.round().max(0.0) as u64)
    }

    /// Single-line text: `Fentanyl · Jan 2023: 6,412`
    pub fn text(&self) -> String {
        format!(
            "{} · {}: {}",
            self.series,
            self.month_label(),
            self.value_label()
        )
    }
}

/// Tooltip interaction state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TooltipState {
    current: Option<Tooltip>,
}

impl TooltipState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the tooltip for `target`, positioned at the pointer's client
    /// coordinates relative to `bounds`
    pub fn pointer_enter(
        &mut self,
        target: &HitTarget,
        client_x: f64,
        client_y: f64,
        bounds: Bounds,
    ) -> &Tooltip {
        let tooltip = Tooltip {
            x: client_x - bounds.left,
            y: client_y - bounds.top,
            ..Tooltip::at_target(target)
        };
        self.current.insert(tooltip)
    }

    pub fn pointer_leave(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Tooltip> {
        self.current.as_ref()
    }
}

/// Format a count with thousands separators (`160899` → `160,899`)
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> HitTarget {
        HitTarget {
            series: "Fentanyl".to_string(),
            color: "#e6194b".to_string(),
            month: Month::new(2023, 1).unwrap(),
            value: 6412.0,
            x: 60.0,
            y: 42.0,
        }
    }

    #[test]
    fn test_enter_positions_relative_to_bounds() {
        let mut state = TooltipState::new();
        let bounds = Bounds {
            left: 100.0,
            top: 250.0,
            width: 800.0,
            height: 400.0,
        };
        let tip = state.pointer_enter(&target(), 160.0, 300.0, bounds).clone();
        assert_eq!(tip.x, 60.0);
        assert_eq!(tip.y, 50.0);
        assert_eq!(tip.text(), "Fentanyl · Jan 2023: 6,412");
        assert_eq!(state.current(), Some(&tip));
    }

    #[test]
    fn test_parse_hover() {
        let (series, month) = Tooltip::parse_hover("Prescription Opioids@2023-08").unwrap();
        assert_eq!(series, "Prescription Opioids");
        assert_eq!(month, Month::new(2023, 8).unwrap());

        assert_eq!(Tooltip::parse_hover("Fentanyl"), Err(HoverError::Malformed));
        assert!(matches!(
            Tooltip::parse_hover("Fentanyl@2023-13"),
            Err(HoverError::Month(_))
        ));
    }

    #[test]
    fn test_leave_clears() {
        let mut state = TooltipState::new();
        state.pointer_enter(&target(), 0.0, 0.0, Bounds::default());
        state.pointer_leave();
        assert!(state.current().is_none());
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(160_899), "160,899");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
