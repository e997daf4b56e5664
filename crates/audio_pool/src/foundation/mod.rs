//! Foundation module - Core utilities and types
//!
//! - Frame timing
//! - Logging utilities

pub mod logging;
pub mod time;
