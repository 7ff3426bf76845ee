//! SVG output
//!
//! Renders a [`LineChart`] as a standalone SVG document. Hit targets carry
//! `data-*` attributes and a `<title>` so the static output stays inspectable
//! without scripting.

use std::fmt::Write;

use super::line::LineChart;
use super::scale::ChartLayout;
use super::tooltip::{format_count, Tooltip};

/// Placeholder text when no series is selected
pub const EMPTY_SELECTION_MESSAGE: &str = "Select at least one drug to plot";

const GRID_COLOR: &str = "#e5e7eb";
const LABEL_COLOR: &str = "#6b7280";
const POINT_RADIUS: f64 = 4.0;

/// Render the chart, with the tooltip drawn on top when present
pub fn render(chart: &LineChart, tooltip: Option<&Tooltip>) -> String {
    let layout = chart.layout();
    let mut out = String::with_capacity(16 * 1024);

    open_svg(&mut out, layout, "Monthly overdose deaths by drug");

    // Gridlines and y labels
    out.push_str("<g class=\"grid\">");
    for line in chart.gridlines() {
        let _ = write!(
            out,
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
            layout.plot_left(),
            line.y,
            layout.plot_right(),
            line.y,
            GRID_COLOR
        );
        let _ = write!(
            out,
            "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"12\" text-anchor=\"end\" fill=\"{}\">{}</text>",
            layout.plot_left() - 8.0,
            line.y + 4.0,
            LABEL_COLOR,
            format_count(line.value.round() as u64)
        );
    }
    out.push_str("</g>");

    // X axis labels
    out.push_str("<g class=\"x-axis\">");
    for tick in chart.ticks() {
        let _ = write!(
            out,
            "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"12\" text-anchor=\"middle\" fill=\"{}\">{}</text>",
            tick.x,
            layout.baseline() + 20.0,
            LABEL_COLOR,
            escape(&tick.label)
        );
    }
    out.push_str("</g>");

    // Series
    for line in chart.polylines() {
        let _ = write!(
            out,
            "<polyline class=\"series\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\" points=\"{}\"><title>{}</title></polyline>",
            escape(&line.color),
            line.svg_points(),
            escape(&line.name)
        );
    }

    // Hit targets
    out.push_str("<g class=\"points\">");
    for target in chart.hit_targets() {
        let tip = Tooltip::at_target(&target);
        let _ = write!(
            out,
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"{}\" data-series=\"{}\" data-month=\"{}\" data-value=\"{}\"><title>{}</title></circle>",
            target.x,
            target.y,
            POINT_RADIUS,
            escape(&target.color),
            escape(&target.series),
            target.month,
            target.value,
            escape(&tip.text())
        );
    }
    out.push_str("</g>");

    render_legend(&mut out, chart);

    if let Some(tip) = tooltip {
        render_tooltip(&mut out, layout, tip);
    }

    out.push_str("</svg>");
    out
}

/// Placeholder document for when there is nothing to plot
pub fn render_placeholder(layout: &ChartLayout, message: &str) -> String {
    let mut out = String::new();
    open_svg(&mut out, layout, message);
    let _ = write!(
        out,
        "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"16\" text-anchor=\"middle\" fill=\"{}\">{}</text></svg>",
        layout.width / 2.0,
        layout.height / 2.0,
        LABEL_COLOR,
        escape(message)
    );
    out
}

fn open_svg(out: &mut String, layout: &ChartLayout, label: &str) {
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {w} {h}\" width=\"{w}\" height=\"{h}\" role=\"img\" aria-label=\"{label}\">",
        w = layout.width,
        h = layout.height,
        label = escape(label)
    );
}

fn render_legend(out: &mut String, chart: &LineChart) {
    let layout = chart.layout();
    out.push_str("<g class=\"legend\">");
    for (i, series) in chart.series().iter().enumerate() {
        let y = layout.plot_top() + 4.0 + i as f64 * 18.0;
        let x = layout.plot_right() - 170.0;
        let _ = write!(
            out,
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"10\" height=\"10\" fill=\"{}\"/><text x=\"{:.2}\" y=\"{:.2}\" font-size=\"12\" fill=\"{}\">{}</text>",
            x,
            y,
            escape(&series.color),
            x + 16.0,
            y + 9.0,
            LABEL_COLOR,
            escape(&series.name)
        );
    }
    out.push_str("</g>");
}

fn render_tooltip(out: &mut String, layout: &ChartLayout, tip: &Tooltip) {
    const WIDTH: f64 = 180.0;
    const HEIGHT: f64 = 54.0;

    // Keep the box inside the view box
    let x = (tip.x + 10.0).min(layout.width - WIDTH).max(0.0);
    let y = (tip.y - HEIGHT - 10.0).max(0.0);

    let _ = write!(
        out,
        "<g class=\"tooltip\" transform=\"translate({:.2},{:.2})\">\
         <rect width=\"{}\" height=\"{}\" rx=\"4\" fill=\"#111827\" opacity=\"0.9\"/>\
         <text x=\"8\" y=\"16\" font-size=\"12\" font-weight=\"bold\" fill=\"{}\">{}</text>\
         <text x=\"8\" y=\"32\" font-size=\"12\" fill=\"#f9fafb\">{}</text>\
         <text x=\"8\" y=\"47\" font-size=\"12\" fill=\"#f9fafb\">{} deaths</text></g>",
        x,
        y,
        WIDTH,
        HEIGHT,
        escape(&tip.color),
        escape(&tip.series),
        escape(&tip.month_label()),
        tip.value_label()
    );
}

/// Escape text for XML content and attribute values
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
