//! Configuration types.
//!
//! This module defines the per-check parameter bundle, the pattern heuristic
//! thresholds and the logging enums used for command-line argument parsing.

use std::time::Duration;

use clap::ValueEnum;

/// Logging level for the application.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    #[default]
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    #[default]
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Per-check options recognized by the orchestrator.
///
/// Each `skip_*` flag disables one signal; the remaining signals still run
/// and the analyzer works with whatever settled.
#[derive(Debug, Clone)]
pub struct CheckParams {
    /// The email address to check.
    pub email: String,
    /// Skip the disposable-list lookup.
    pub skip_disposable: bool,
    /// Timeout for the disposable lookup; `None` uses the 200 ms default.
    pub disposable_timeout: Option<Duration>,
    /// Reserved; currently unused.
    pub disposable_strict: bool,
    /// Skip the DNS validation.
    pub skip_dns: bool,
    /// Skip the well-known provider lookup.
    pub skip_well_known: bool,
    /// Skip the local-part pattern heuristic.
    pub skip_pattern_check: bool,
    /// Skip the educational-domain lookup.
    pub skip_educational: bool,
}

impl CheckParams {
    /// Parameters for a full check of `email` with every signal enabled.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            skip_disposable: false,
            disposable_timeout: None,
            disposable_strict: false,
            skip_dns: false,
            skip_well_known: false,
            skip_pattern_check: false,
            skip_educational: false,
        }
    }
}

/// Thresholds for the local-part pattern heuristic.
#[derive(Debug, Clone, Copy)]
pub struct PatternConfig {
    /// Local parts shorter than this many code points are flagged short.
    pub min_local_part_length: usize,
    /// Digit runs longer than this are flagged.
    pub max_consecutive_numbers: usize,
    /// Flag when the fraction of non-letter/digit/mark code points exceeds this.
    pub max_special_char_ratio: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            min_local_part_length: 3,
            max_consecutive_numbers: 5,
            max_special_char_ratio: 0.3,
        }
    }
}
