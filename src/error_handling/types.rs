//! Concrete error enums.

use log::SetLoggerError;
use thiserror::Error;

/// Errors raised out of `EmailChecker::check`.
///
/// Every other failure mode (DoH errors, store errors, fetcher errors) is
/// recorded on the affected signal instead of failing the whole check.
#[derive(Error, Debug)]
pub enum CheckError {
    /// The input is not a usable email address: the rightmost `@` is
    /// missing, leading, or trailing.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

/// Errors from the DoH client and the caching resolver.
///
/// Cloneable so a single fetch outcome can be handed to every caller waiting
/// on the same in-flight lookup.
#[derive(Error, Debug, Clone)]
pub enum DnsError {
    /// The HTTPS request itself failed (connect, timeout, TLS).
    #[error("DoH request failed: {0}")]
    Request(String),

    /// The endpoint answered with a non-200 status.
    #[error("DoH endpoint returned status {0}")]
    Status(u16),

    /// The response body was not the expected dns-json document.
    #[error("could not decode DoH response: {0}")]
    Decode(String),

    /// The shared lookup stopped without producing a result.
    #[error("DNS lookup aborted: {0}")]
    Aborted(String),
}

/// Errors from the list store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Query or transaction failure.
    #[error("database error: {0}")]
    Sql(#[from] sqlx::Error),
}

/// Errors raised while wiring up the application.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("logger initialization error: {0}")]
    Logger(#[from] SetLoggerError),

    /// Error building the shared HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Error creating or opening the database file.
    #[error("database file creation error: {0}")]
    DatabaseFile(String),

    /// Error connecting to or preparing the database.
    #[error("database initialization error: {0}")]
    Database(#[from] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_email_message_carries_input() {
        let err = CheckError::InvalidEmail("not-an-email".into());
        assert_eq!(err.to_string(), "invalid email address: not-an-email");
    }

    #[test]
    fn dns_error_is_cloneable() {
        let err = DnsError::Status(502);
        let clone = err.clone();
        assert_eq!(err.to_string(), clone.to_string());
    }
}
