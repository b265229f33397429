//! Disposable domain list.
//!
//! Membership answers "is this a throwaway provider?"; the store also folds
//! the query through its registrable eTLD+1, so `mx.mailinator.com` hits
//! when `mailinator.com` is listed.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use log::info;

use super::DomainFetcher;
use crate::checker::DisposableCheck;
use crate::config::{DISPOSABLE_LIST_URL, REFRESH_DEADLINE};
use crate::storage::ListStore;

/// Disposable-list service over the store and an upstream fetcher.
pub struct DisposableChecker {
    store: Arc<dyn ListStore>,
    fetcher: Arc<dyn DomainFetcher>,
}

impl DisposableChecker {
    /// Builds the service and runs one refresh attempt, bounded by a
    /// five-minute deadline. The disposable list is the one signal with a
    /// hard latency budget at check time, so it must exist before the first
    /// check.
    pub async fn new(
        store: Arc<dyn ListStore>,
        fetcher: Arc<dyn DomainFetcher>,
    ) -> anyhow::Result<Self> {
        let checker = Self { store, fetcher };

        tokio::time::timeout(REFRESH_DEADLINE, checker.refresh())
            .await
            .context("initial disposable list refresh timed out")??;

        Ok(checker)
    }
}

#[async_trait]
impl DisposableCheck for DisposableChecker {
    async fn is_disposable(&self, domain: &str) -> anyhow::Result<bool> {
        Ok(self.store.is_disposable(domain).await?)
    }

    async fn refresh(&self) -> anyhow::Result<()> {
        if !self.store.disposable_needs_refresh().await? {
            return Ok(());
        }

        let domains = self
            .fetcher
            .fetch_domains()
            .await
            .context("could not fetch disposable domains")?;
        info!("Refreshing disposable list with {} domains", domains.len());

        self.store.update_disposable(&domains).await?;
        Ok(())
    }
}

/// Fetches the newline-delimited disposable list from GitHub.
pub struct GithubDisposableFetcher {
    http: Arc<reqwest::Client>,
    url: String,
}

impl GithubDisposableFetcher {
    pub fn new(http: Arc<reqwest::Client>) -> Self {
        Self::with_url(http, DISPOSABLE_LIST_URL)
    }

    pub fn with_url(http: Arc<reqwest::Client>, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait]
impl DomainFetcher for GithubDisposableFetcher {
    async fn fetch_domains(&self) -> anyhow::Result<Vec<String>> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("could not fetch disposable domains")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("unexpected status code fetching disposable list: {status}");
        }

        let body = response
            .text()
            .await
            .context("could not read disposable list body")?;

        let domains: Vec<String> = body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if domains.is_empty() {
            anyhow::bail!("no domains found in disposable list response");
        }

        Ok(domains)
    }
}
