//! Persistence for domain lists and the DNS cache.
//!
//! This module provides:
//! - The [`ListStore`] contract the core consumes
//! - SQLite connection pool management (WAL mode)
//! - Embedded database migrations
//! - The SQLite-backed store implementation
//!
//! All database operations use SQLite with WAL mode enabled for concurrent
//! access.

pub mod migrations;
pub mod pool;
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error_handling::StoreError;

// Re-export commonly used items
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
pub use sqlite::SqliteStore;

/// A cached DNS validation blob and the moment it was written.
#[derive(Debug, Clone)]
pub struct CachedDnsRecord {
    pub domain: String,
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

/// Storage contract consumed by the list checkers and the DNS resolver.
///
/// Implementations must be safe for concurrent use. The three `update_*`
/// operations replace their list atomically and bump the corresponding
/// refresh timestamp in the same transaction; the `*_needs_refresh`
/// operations report true when that timestamp is absent or older than
/// twelve hours.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Whether `domain` (or its registrable eTLD+1) is a disposable provider.
    async fn is_disposable(&self, domain: &str) -> Result<bool, StoreError>;

    /// Atomically replaces the disposable list.
    async fn update_disposable(&self, domains: &[String]) -> Result<(), StoreError>;

    /// Whether the disposable list is due for a refresh.
    async fn disposable_needs_refresh(&self) -> Result<bool, StoreError>;

    /// Whether `domain` is in the well-known (top ranked) set.
    async fn is_top(&self, domain: &str) -> Result<bool, StoreError>;

    /// Atomically replaces the well-known list.
    async fn update_top(&self, domains: &[String]) -> Result<(), StoreError>;

    /// Whether the well-known list is due for a refresh.
    async fn top_needs_refresh(&self) -> Result<bool, StoreError>;

    /// Whether `domain` belongs to an educational institution.
    async fn is_educational(&self, domain: &str) -> Result<bool, StoreError>;

    /// Atomically replaces the educational list.
    async fn update_educational(&self, domains: &[String]) -> Result<(), StoreError>;

    /// Whether the educational list is due for a refresh.
    async fn educational_needs_refresh(&self) -> Result<bool, StoreError>;

    /// Reads the cached DNS validation row for `domain`, if any.
    async fn dns_record(&self, domain: &str) -> Result<Option<CachedDnsRecord>, StoreError>;

    /// Writes or replaces the cached DNS validation row for `domain`.
    async fn upsert_dns_record(&self, domain: &str, data: &[u8]) -> Result<(), StoreError>;
}
