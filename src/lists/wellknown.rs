//! Well-known provider list.
//!
//! Membership against the Tranco top-1M ranking. The fetch is two-step:
//! resolve the opaque list id for yesterday (UTC), then download the CSV
//! and keep the domain column.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use log::info;

use super::DomainFetcher;
use crate::checker::WellKnownCheck;
use crate::config::{TRANCO_BASE_URL, TRANCO_LIST_SIZE};
use crate::storage::ListStore;

/// Well-known-list service over the store and an upstream fetcher.
pub struct WellKnownChecker {
    store: Arc<dyn ListStore>,
    fetcher: Arc<dyn DomainFetcher>,
}

impl WellKnownChecker {
    /// Builds the service and runs one refresh attempt.
    pub async fn new(
        store: Arc<dyn ListStore>,
        fetcher: Arc<dyn DomainFetcher>,
    ) -> anyhow::Result<Self> {
        let checker = Self { store, fetcher };
        checker
            .refresh()
            .await
            .context("could not update well-known list")?;
        Ok(checker)
    }
}

#[async_trait]
impl WellKnownCheck for WellKnownChecker {
    async fn is_well_known(&self, domain: &str) -> anyhow::Result<bool> {
        Ok(self.store.is_top(domain).await?)
    }

    async fn refresh(&self) -> anyhow::Result<()> {
        if !self.store.top_needs_refresh().await? {
            return Ok(());
        }

        let domains = self
            .fetcher
            .fetch_domains()
            .await
            .context("could not fetch top domains")?;
        info!("Refreshing well-known list with {} domains", domains.len());

        self.store.update_top(&domains).await?;
        Ok(())
    }
}

/// Fetches the Tranco daily top list.
pub struct TrancoFetcher {
    http: Arc<reqwest::Client>,
    base_url: String,
}

impl TrancoFetcher {
    pub fn new(http: Arc<reqwest::Client>) -> Self {
        Self::with_base_url(http, TRANCO_BASE_URL)
    }

    pub fn with_base_url(http: Arc<reqwest::Client>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Resolves the opaque list id for `date` (YYYY-MM-DD), with subdomains
    /// enabled.
    async fn daily_list_id(&self, date: &str) -> anyhow::Result<String> {
        let response = self
            .http
            .get(format!("{}/daily_list_id", self.base_url))
            .query(&[("date", date), ("subdomains", "true")])
            .send()
            .await
            .context("failed to fetch Tranco list id")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("unexpected status code from Tranco: {status}");
        }

        let body = response
            .text()
            .await
            .context("failed to read Tranco list id")?;

        if body == "null" {
            anyhow::bail!("no Tranco list id found for date: {date}");
        }
        if body.contains("Internal Server Error") {
            anyhow::bail!("Tranco server error for date: {date}");
        }

        Ok(body)
    }

    /// Downloads `rank,domain` rows for `list_id` and keeps the domains.
    async fn download_list(&self, list_id: &str) -> anyhow::Result<Vec<String>> {
        let response = self
            .http
            .get(format!(
                "{}/download/{list_id}/{TRANCO_LIST_SIZE}",
                self.base_url
            ))
            .send()
            .await
            .context("failed to fetch Tranco list")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("unexpected status code from Tranco download: {status}");
        }

        let body = response
            .text()
            .await
            .context("failed to read Tranco list body")?;

        let domains: Vec<String> = body
            .lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| {
                // "rank,domain"; rows without a domain column are skipped.
                let (_, domain) = line.split_once(',')?;
                if domain.is_empty() {
                    None
                } else {
                    Some(domain.to_string())
                }
            })
            .collect();

        Ok(domains)
    }
}

#[async_trait]
impl DomainFetcher for TrancoFetcher {
    async fn fetch_domains(&self) -> anyhow::Result<Vec<String>> {
        let yesterday = (Utc::now() - Duration::days(1)).format("%Y-%m-%d").to_string();
        let list_id = self.daily_list_id(&yesterday).await?;
        let domains = self.download_list(&list_id).await?;

        if domains.is_empty() {
            anyhow::bail!("top list is empty");
        }

        Ok(domains)
    }
}
