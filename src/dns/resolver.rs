//! Caching DNS resolver with single-flight deduplication.
//!
//! Lookup protocol per domain:
//!
//! 1. A fresh, decodable cache row answers immediately.
//! 2. Otherwise an in-flight table is consulted under a mutex: if another
//!    caller is already fetching this domain, await its outcome.
//! 3. Otherwise this caller becomes the leader: it registers an in-flight
//!    entry and spawns the fetch on its own task, so cancelling any single
//!    caller never cancels a fetch other callers await. The fetch first
//!    takes one slot of a global semaphore bounding concurrent upstream
//!    traffic.
//! 4. The outcome is delivered to every waiter; successes are written to
//!    the cache best-effort. Errors propagate to current callers but are
//!    never cached.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use log::debug;
use tokio::sync::{watch, Mutex, Semaphore};

use super::doh::DohClient;
use crate::config::{DNS_CACHE_TTL, MAX_CONCURRENT_DNS_FETCHES};
use crate::error_handling::DnsError;
use crate::models::DnsValidation;
use crate::storage::ListStore;

type FetchOutcome = Result<DnsValidation, DnsError>;
type InFlightTable = HashMap<String, watch::Receiver<Option<FetchOutcome>>>;

/// DNS validation resolver: cache in front, single-flight in the middle,
/// the DoH aggregator at the back.
pub struct CachingResolver {
    client: Arc<DohClient>,
    store: Arc<dyn ListStore>,
    inflight: Arc<Mutex<InFlightTable>>,
    fetch_slots: Arc<Semaphore>,
}

impl CachingResolver {
    pub fn new(client: Arc<DohClient>, store: Arc<dyn ListStore>) -> Self {
        Self {
            client,
            store,
            inflight: Arc::new(Mutex::new(HashMap::new())),
            fetch_slots: Arc::new(Semaphore::new(MAX_CONCURRENT_DNS_FETCHES)),
        }
    }

    /// Returns the DNS validation for `domain`, from cache when fresh.
    ///
    /// For any number of concurrent callers on the same uncached domain,
    /// exactly one upstream fetch is issued; every caller observes that
    /// fetch's outcome.
    pub async fn validation(&self, domain: &str) -> Result<DnsValidation, DnsError> {
        if let Some(cached) = self.fresh_cached(domain).await {
            return Ok(cached);
        }

        let mut rx = {
            let mut inflight = self.inflight.lock().await;
            if let Some(rx) = inflight.get(domain) {
                rx.clone()
            } else {
                let (tx, rx) = watch::channel(None);
                inflight.insert(domain.to_string(), rx.clone());

                let client = Arc::clone(&self.client);
                let store = Arc::clone(&self.store);
                let table = Arc::clone(&self.inflight);
                let slots = Arc::clone(&self.fetch_slots);
                let domain = domain.to_string();
                tokio::spawn(async move {
                    // The slot is taken inside the task, never while the
                    // in-flight table is locked: a saturated semaphore must
                    // not block other domains' bookkeeping.
                    let outcome = match slots.acquire_owned().await {
                        Ok(_permit) => client.validate(&domain).await,
                        Err(_) => Err(DnsError::Aborted("resolver shut down".into())),
                    };

                    // Wake waiters first, then retire the entry; late
                    // arrivals between the two either hold a receiver or
                    // start a fresh fetch.
                    let _ = tx.send(Some(outcome.clone()));
                    table.lock().await.remove(&domain);

                    if let Ok(validation) = &outcome {
                        write_cache(store.as_ref(), &domain, validation).await;
                    }
                });

                rx
            }
        };

        let settled = rx
            .wait_for(|outcome| outcome.is_some())
            .await
            .map_err(|_| DnsError::Aborted("shared DNS fetch stopped unexpectedly".into()))?;

        settled
            .as_ref()
            .cloned()
            .unwrap_or_else(|| Err(DnsError::Aborted("shared DNS fetch produced no result".into())))
    }

    /// Cache lookup; `None` on miss, staleness, decode failure or store
    /// trouble. A broken row is treated as a miss so a fresh fetch repairs
    /// it.
    async fn fresh_cached(&self, domain: &str) -> Option<DnsValidation> {
        let record = match self.store.dns_record(domain).await {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(e) => {
                debug!("DNS cache read failed for {domain}: {e}");
                return None;
            }
        };

        let age = Utc::now().signed_duration_since(record.created_at);
        if age.num_seconds() < 0 || age.num_seconds() as u64 >= DNS_CACHE_TTL.as_secs() {
            return None;
        }

        serde_json::from_slice(&record.data).ok()
    }
}

#[async_trait::async_trait]
impl crate::checker::DnsCheck for CachingResolver {
    async fn dns_validation(&self, domain: &str) -> Result<DnsValidation, DnsError> {
        self.validation(domain).await
    }
}

/// Best-effort cache write; failures are logged and otherwise silent, the
/// cache is an optimization rather than a source of truth.
async fn write_cache(store: &dyn ListStore, domain: &str, validation: &DnsValidation) {
    let blob = match serde_json::to_vec(validation) {
        Ok(blob) => blob,
        Err(e) => {
            debug!("Could not serialize DNS validation for {domain}: {e}");
            return;
        }
    };

    if let Err(e) = store.upsert_dns_record(domain, &blob).await {
        debug!("DNS cache write failed for {domain}: {e}");
    }
}
