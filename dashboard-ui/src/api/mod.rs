//! Dashboard API access
//!
//! Only authentication goes over the network; everything else is derived
//! locally from the built-in dataset.

pub mod client;

pub use client::*;
