//! Domain list services.
//!
//! Three lists share the same shape: a membership query against the list
//! store plus a refresh pipeline that re-fetches the upstream source when
//! the store reports the list stale (older than twelve hours). Each service
//! runs one refresh attempt at construction so a cold start begins with
//! populated lists.

mod disposable;
mod educational;
mod wellknown;

use async_trait::async_trait;

pub use disposable::{DisposableChecker, GithubDisposableFetcher};
pub use educational::{EducationalChecker, UniversityListFetcher};
pub use wellknown::{TrancoFetcher, WellKnownChecker};

/// Upstream source of a domain list.
#[async_trait]
pub trait DomainFetcher: Send + Sync {
    /// Downloads the full list. An empty result is an error; replacing a
    /// populated list with nothing is never intended.
    async fn fetch_domains(&self) -> anyhow::Result<Vec<String>>;
}
