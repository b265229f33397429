//! Educational domain list.
//!
//! Membership against the world-universities dataset: a JSON array of
//! institutions, each carrying a `domains` array, flattened into one set.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use log::info;
use serde::Deserialize;

use super::DomainFetcher;
use crate::checker::EducationalCheck;
use crate::config::EDU_LIST_URL;
use crate::storage::ListStore;

/// Educational-list service over the store and an upstream fetcher.
pub struct EducationalChecker {
    store: Arc<dyn ListStore>,
    fetcher: Arc<dyn DomainFetcher>,
}

impl EducationalChecker {
    /// Builds the service and runs one refresh attempt.
    pub async fn new(
        store: Arc<dyn ListStore>,
        fetcher: Arc<dyn DomainFetcher>,
    ) -> anyhow::Result<Self> {
        let checker = Self { store, fetcher };
        checker.refresh().await?;
        Ok(checker)
    }
}

#[async_trait]
impl EducationalCheck for EducationalChecker {
    async fn is_educational(&self, domain: &str) -> anyhow::Result<bool> {
        Ok(self.store.is_educational(domain).await?)
    }

    async fn refresh(&self) -> anyhow::Result<()> {
        if !self.store.educational_needs_refresh().await? {
            return Ok(());
        }

        let domains = self
            .fetcher
            .fetch_domains()
            .await
            .context("could not fetch educational domains")?;
        info!("Refreshing educational list with {} domains", domains.len());

        self.store.update_educational(&domains).await?;
        Ok(())
    }
}

/// Fetches the university domain dataset.
pub struct UniversityListFetcher {
    http: Arc<reqwest::Client>,
    url: String,
}

impl UniversityListFetcher {
    pub fn new(http: Arc<reqwest::Client>) -> Self {
        Self::with_url(http, EDU_LIST_URL)
    }

    pub fn with_url(http: Arc<reqwest::Client>, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[derive(Deserialize)]
struct Institution {
    #[serde(default)]
    domains: Vec<String>,
}

#[async_trait]
impl DomainFetcher for UniversityListFetcher {
    async fn fetch_domains(&self) -> anyhow::Result<Vec<String>> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("could not fetch educational domains")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("unexpected status code fetching educational list: {status}");
        }

        let institutions: Vec<Institution> = response
            .json()
            .await
            .context("could not decode educational list")?;

        let domains: Vec<String> = institutions
            .into_iter()
            .flat_map(|institution| institution.domains)
            .collect();

        if domains.is_empty() {
            anyhow::bail!("no domains found in educational list response");
        }

        Ok(domains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher_for(server: &MockServer) -> UniversityListFetcher {
        UniversityListFetcher::with_url(
            Arc::new(reqwest::Client::new()),
            format!("{}/universities.json", server.uri()),
        )
    }

    #[tokio::test]
    async fn flattens_domains_arrays() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "name": "MIT", "domains": ["mit.edu"] },
                { "name": "ETH Zürich", "domains": ["ethz.ch", "ethzürich.example"] },
                { "name": "No Domains Listed" },
            ])))
            .mount(&server)
            .await;

        let domains = fetcher_for(&server).fetch_domains().await.expect("fetch");
        assert_eq!(
            domains,
            vec![
                "mit.edu".to_string(),
                "ethz.ch".to_string(),
                "ethzürich.example".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn empty_dataset_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        assert!(fetcher_for(&server).fetch_domains().await.is_err());
    }

    #[tokio::test]
    async fn malformed_json_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        assert!(fetcher_for(&server).fetch_domains().await.is_err());
    }
}
