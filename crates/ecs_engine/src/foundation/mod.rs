//! Foundation module - Core utilities
//!
//! - Math type aliases
//! - Frame timing
//! - Logging setup

pub mod logging;
pub mod math;
pub mod time;
