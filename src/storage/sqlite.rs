//! SQLite-backed list store.
//!
//! Implements the [`ListStore`] contract on top of a shared `sqlx` pool.
//! List replacements are performed as a shadow-table swap inside one
//! transaction so readers never observe a half-written list, and the
//! per-list refresh timestamp is bumped in the same transaction.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::warn;
use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::config::LIST_STALE_AFTER;
use crate::error_handling::StoreError;
use crate::storage::{CachedDnsRecord, ListStore};

/// Metadata keys tracking when each list was last replaced.
const DISPOSABLE_REFRESH_KEY: &str = "disposable_refreshed_at";
const TOP_REFRESH_KEY: &str = "top_domains_refreshed_at";
const EDU_REFRESH_KEY: &str = "edu_domains_refreshed_at";

/// Rows per INSERT statement during list replacement. Keeps each statement
/// well under SQLite's bind-parameter limit.
const INSERT_CHUNK_SIZE: usize = 500;

/// SQLite implementation of the list store.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteStore {
    pub fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        Self { pool }
    }

    /// Membership query against a single-column domain table.
    async fn domain_exists(&self, table: &str, domain: &str) -> Result<bool, StoreError> {
        let query = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE domain = ?)");
        let exists: bool = sqlx::query_scalar(&query)
            .bind(domain)
            .fetch_one(self.pool.as_ref())
            .await?;
        Ok(exists)
    }

    /// Replaces the contents of `table` with `domains` and bumps `key`,
    /// all inside one transaction.
    ///
    /// The new rows are staged in a shadow table which is then renamed over
    /// the live one, so concurrent readers see either the old or the new
    /// list in full.
    async fn replace_domains(
        &self,
        table: &str,
        key: &str,
        domains: &[String],
    ) -> Result<(), StoreError> {
        let new_table = format!("{table}_new");
        let old_table = format!("{table}_old");

        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!("DROP TABLE IF EXISTS {new_table}"))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!(
            "CREATE TABLE {new_table} (domain TEXT PRIMARY KEY NOT NULL)"
        ))
        .execute(&mut *tx)
        .await?;

        let mut seen: HashSet<&str> = HashSet::with_capacity(domains.len());
        let unique: Vec<&str> = domains
            .iter()
            .map(String::as_str)
            .filter(|d| !d.is_empty() && seen.insert(*d))
            .collect();

        for chunk in unique.chunks(INSERT_CHUNK_SIZE) {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new(format!("INSERT INTO {new_table} (domain) "));
            builder.push_values(chunk.iter().copied(), |mut row, domain| {
                row.push_bind(domain);
            });
            builder.build().execute(&mut *tx).await?;
        }

        sqlx::query(&format!("ALTER TABLE {table} RENAME TO {old_table}"))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!("ALTER TABLE {new_table} RENAME TO {table}"))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!("DROP TABLE {old_table}"))
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO app_metadata (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// True when `key` is absent, unparseable, or older than the staleness
    /// window.
    async fn needs_refresh(&self, key: &str) -> Result<bool, StoreError> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM app_metadata WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool.as_ref())
            .await?;

        let Some(raw) = value else {
            return Ok(true);
        };

        let last_refresh = match DateTime::parse_from_rfc3339(&raw) {
            Ok(t) => t.with_timezone(&Utc),
            Err(e) => {
                warn!("Unparseable refresh timestamp for {key}: '{raw}' ({e}); forcing refresh");
                return Ok(true);
            }
        };

        let age = Utc::now().signed_duration_since(last_refresh);
        Ok(age.num_seconds() > LIST_STALE_AFTER.as_secs() as i64)
    }
}

#[async_trait]
impl ListStore for SqliteStore {
    async fn is_disposable(&self, domain: &str) -> Result<bool, StoreError> {
        let domain = domain.trim_end_matches('.');
        let base = registrable_domain(domain);

        if domain == base {
            return self.domain_exists("disposable_domains", domain).await;
        }

        // Queried name is a subdomain: a hit on either the name or its
        // registrable parent counts.
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM disposable_domains WHERE domain IN (?, ?))",
        )
        .bind(domain)
        .bind(base)
        .fetch_one(self.pool.as_ref())
        .await?;
        Ok(exists)
    }

    async fn update_disposable(&self, domains: &[String]) -> Result<(), StoreError> {
        self.replace_domains("disposable_domains", DISPOSABLE_REFRESH_KEY, domains)
            .await
    }

    async fn disposable_needs_refresh(&self) -> Result<bool, StoreError> {
        self.needs_refresh(DISPOSABLE_REFRESH_KEY).await
    }

    async fn is_top(&self, domain: &str) -> Result<bool, StoreError> {
        self.domain_exists("top_domains", domain.trim_end_matches('.'))
            .await
    }

    async fn update_top(&self, domains: &[String]) -> Result<(), StoreError> {
        self.replace_domains("top_domains", TOP_REFRESH_KEY, domains)
            .await
    }

    async fn top_needs_refresh(&self) -> Result<bool, StoreError> {
        self.needs_refresh(TOP_REFRESH_KEY).await
    }

    async fn is_educational(&self, domain: &str) -> Result<bool, StoreError> {
        self.domain_exists("edu_domains", domain.trim_end_matches('.'))
            .await
    }

    async fn update_educational(&self, domains: &[String]) -> Result<(), StoreError> {
        self.replace_domains("edu_domains", EDU_REFRESH_KEY, domains)
            .await
    }

    async fn educational_needs_refresh(&self) -> Result<bool, StoreError> {
        self.needs_refresh(EDU_REFRESH_KEY).await
    }

    async fn dns_record(&self, domain: &str) -> Result<Option<CachedDnsRecord>, StoreError> {
        let row: Option<(Vec<u8>, DateTime<Utc>)> =
            sqlx::query_as("SELECT data, created_at FROM dns_records WHERE domain = ?")
                .bind(domain)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(row.map(|(data, created_at)| CachedDnsRecord {
            domain: domain.to_string(),
            data,
            created_at,
        }))
    }

    async fn upsert_dns_record(&self, domain: &str, data: &[u8]) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO dns_records (domain, data, created_at) VALUES (?, ?, ?) \
             ON CONFLICT(domain) DO UPDATE SET \
                 data = excluded.data, \
                 created_at = excluded.created_at",
        )
        .bind(domain)
        .bind(data)
        .bind(Utc::now())
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }
}

/// The registrable (eTLD+1) portion of `domain`, or the input unchanged when
/// the public-suffix list cannot produce one.
pub(crate) fn registrable_domain(domain: &str) -> &str {
    psl::domain_str(domain).unwrap_or(domain)
}
