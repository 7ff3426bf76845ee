//! API Routes
//!
//! Route handlers organized by functionality.

pub mod auth;
pub mod chart;
pub mod dataset;
pub mod health;
