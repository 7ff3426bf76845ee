//! Chart Component
//!
//! SVG line chart of the selected series. Hovering a point shows a tooltip
//! positioned against the chart container's bounding box.

use leptos::*;
use overdose_dashboard::analytics::line_chart;
use overdose_dashboard::chart::{format_count, svg, Bounds, HitTarget, LineChart};
use overdose_dashboard::Dataset;

use crate::state::global::GlobalState;

const GRID_COLOR: &str = "#374151";
const LABEL_COLOR: &str = "#9ca3af";

/// Chart component, driven by the global selection
#[component]
pub fn Chart() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let container = create_node_ref::<html::Div>();

    let chart = create_memo(move |_| {
        state
            .selection
            .with(|selection| line_chart(Dataset::builtin(), selection))
    });

    view! {
        <div node_ref=container class="relative w-full">
            {move || match chart.get() {
                Some(chart) => view! { <ChartSvg chart=chart container=container /> }.into_view(),
                None => view! {
                    <div class="flex items-center justify-center h-64 text-gray-500">
                        {svg::EMPTY_SELECTION_MESSAGE}
                    </div>
                }.into_view(),
            }}

            {move || state.tooltip.with(|t| t.current().cloned()).map(|tip| view! {
                <div
                    class="absolute pointer-events-none bg-gray-950/90 border border-gray-700 rounded px-3 py-2 text-xs shadow-lg"
                    style=format!(
                        "left: {:.0}px; top: {:.0}px; transform: translate(10px, -110%);",
                        tip.x, tip.y
                    )
                >
                    <div class="font-semibold" style=format!("color: {}", tip.color)>
                        {tip.series.clone()}
                    </div>
                    <div class="text-gray-300">
                        {format!("{}: {}", tip.month_label(), tip.value_label())}
                    </div>
                </div>
            })}
        </div>
    }
}

#[component]
fn ChartSvg(chart: LineChart, container: NodeRef<html::Div>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let layout = *chart.layout();

    let gridlines = chart
        .gridlines()
        .into_iter()
        .map(|line| {
            view! {
                <line
                    x1=px(layout.plot_left())
                    y1=px(line.y)
                    x2=px(layout.plot_right())
                    y2=px(line.y)
                    stroke=GRID_COLOR
                    stroke-width="1"
                />
                <text
                    x=px(layout.plot_left() - 8.0)
                    y=px(line.y + 4.0)
                    font-size="12"
                    text-anchor="end"
                    fill=LABEL_COLOR
                >
                    {format_count(line.value.round() as u64)}
                </text>
            }
        })
        .collect_view();

    let ticks = chart
        .ticks()
        .into_iter()
        .map(|tick| {
            view! {
                <text
                    x=px(tick.x)
                    y=px(layout.baseline() + 20.0)
                    font-size="12"
                    text-anchor="middle"
                    fill=LABEL_COLOR
                >
                    {tick.label}
                </text>
            }
        })
        .collect_view();

    let lines = chart
        .polylines()
        .into_iter()
        .map(|line| {
            view! {
                <polyline
                    fill="none"
                    stroke=line.color.clone()
                    stroke-width="2"
                    points=line.svg_points()
                />
            }
        })
        .collect_view();

    let points = chart
        .hit_targets()
        .into_iter()
        .map(|target| {
            let (cx, cy, color) = (px(target.x), px(target.y), target.color.clone());
            view! {
                <circle
                    class="chart-point"
                    cx=cx
                    cy=cy
                    r="4"
                    fill=color
                    on:mouseenter=move |ev: ev::MouseEvent| show_tooltip(state, container, &target, &ev)
                    on:mouseleave=move |_| state.tooltip.update(|t| t.pointer_leave())
                />
            }
        })
        .collect_view();

    view! {
        <svg
            viewBox=format!("0 0 {} {}", layout.width, layout.height)
            class="w-full h-auto"
            role="img"
            aria-label="Monthly overdose deaths by drug"
        >
            <g>{gridlines}</g>
            <g>{ticks}</g>
            <g>{lines}</g>
            <g>{points}</g>
        </svg>
    }
}

fn show_tooltip(
    state: GlobalState,
    container: NodeRef<html::Div>,
    target: &HitTarget,
    ev: &ev::MouseEvent,
) {
    let Some(element) = container.get_untracked() else {
        return;
    };
    let rect = element.get_bounding_client_rect();
    let bounds = Bounds {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    };
    state.tooltip.update(|t| {
        t.pointer_enter(target, ev.client_x() as f64, ev.client_y() as f64, bounds);
    });
}

/// SVG coordinate attribute
fn px(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_rounds_to_two_places() {
        assert_eq!(px(60.0), "60.00");
        assert_eq!(px(123.456), "123.46");
    }
}
