//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod auth_form;
pub mod chart;
pub mod data_table;
pub mod drug_filter;
pub mod loading;
pub mod register_cta;
pub mod stat_card;
pub mod toast;

pub use auth_form::AuthPanel;
pub use chart::Chart;
pub use data_table::DataTable;
pub use drug_filter::DrugFilter;
pub use loading::Loading;
pub use register_cta::RegisterCta;
pub use stat_card::SummaryCards;
pub use toast::Toast;
