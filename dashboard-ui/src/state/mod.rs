//! Application State
//!
//! Global reactive state and the session subscription.

pub mod global;
pub mod session;
