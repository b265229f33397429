//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, endpoints)
//! - Configuration types (check parameters, pattern thresholds, logging)

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{CheckParams, LogFormat, LogLevel, PatternConfig};
