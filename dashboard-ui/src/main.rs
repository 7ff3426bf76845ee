//! Overdose Dashboard UI
//!
//! Monthly overdose deaths by drug, built with Leptos (WASM).
//!
//! # Features
//!
//! - Multi-series line chart with hover tooltips
//! - Drug filter with summary figures and the raw data table
//! - Email/password sign-in gating the register-to-vote call-to-action
//!
//! # Architecture
//!
//! Client-side rendered. The dataset, selection, summary and chart geometry
//! come from the `overdose-dashboard` core library compiled into the bundle;
//! only authentication goes through the dashboard API (HTTP and
//! Server-Sent Events).

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
