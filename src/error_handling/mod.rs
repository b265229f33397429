//! Error type definitions.
//!
//! This module defines the typed errors used throughout the application.
//! Per-signal failures are captured on the signal's outcome record and never
//! raised out of a check; the only user-visible check error is
//! [`CheckError::InvalidEmail`].

mod types;

pub use types::{CheckError, DnsError, InitializationError, StoreError};
