//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources:
//! - the logger (plain colored or JSON output)
//! - the HTTP client shared by DoH lookups and list fetchers
//! - concurrency-control semaphores

mod logger;

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::HTTP_CLIENT_TIMEOUT;
use crate::error_handling::InitializationError;

// Re-export public API
pub use logger::init_logger_with;

/// Initializes a semaphore for controlling concurrency.
///
/// # Arguments
///
/// * `count` - Maximum number of concurrent operations allowed
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count))
}

/// Initializes the shared HTTP client.
///
/// One client serves the DoH lookups and all three list fetchers, so they
/// share a connection pool. Rustls is the TLS backend.
pub fn init_client() -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = reqwest::ClientBuilder::new()
        .timeout(HTTP_CLIENT_TIMEOUT)
        .user_agent(concat!("mailsift/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semaphore_has_requested_permits() {
        let semaphore = init_semaphore(42);
        assert_eq!(semaphore.available_permits(), 42);
    }

    #[test]
    fn client_builds() {
        assert!(init_client().is_ok());
    }
}
