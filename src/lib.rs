//! mailsift library: email risk screening.
//!
//! This library answers one question per email address: how risky is it,
//! and why? Five independent signals are gathered concurrently - disposable
//! list membership, DNS posture (MX/SPF/DMARC/NS/A with parked-domain
//! detection), well-known-provider membership, educational-domain
//! membership and local-part pattern heuristics - and combined into a
//! numeric score, a coarse risk level and human-readable reasons.
//!
//! # Example
//!
//! ```no_run
//! use mailsift::{CheckParams, EmailChecker};
//!
//! # async fn example(checker: EmailChecker) -> Result<(), Box<dyn std::error::Error>> {
//! let result = checker.check(CheckParams::new("john.doe@gmail.com")).await?;
//! let analysis = result.analysis.expect("attached after every check");
//! println!("{}: {} ({:.2})", result.email, analysis.risk_level, analysis.score);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

pub mod analyzer;
pub mod app;
pub mod checker;
pub mod config;
pub mod dns;
pub mod error_handling;
pub mod initialization;
pub mod lists;
pub mod models;
pub mod pattern;
pub mod server;
pub mod storage;

// Re-export public API
pub use checker::{EmailChecker, Services};
pub use config::{CheckParams, LogFormat, LogLevel, PatternConfig};
pub use error_handling::CheckError;
pub use models::{AnalysisReport, DnsValidation, EmailCheckResult, RiskLevel};
