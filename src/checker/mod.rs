//! Check orchestration.
//!
//! [`EmailChecker::check`] fans the five signals of a check out as
//! concurrent tasks, records each outcome independently and feeds the
//! settled aggregate to the risk analyzer. No signal failure aborts the
//! request; the only top-level error is an unusable email address.
//!
//! The service seams are traits so the orchestrator does not care whether
//! a signal is backed by SQLite, DoH or pure computation.

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::future::join_all;
use log::warn;
use tokio::sync::Mutex;

use crate::analyzer::RiskAnalyzer;
use crate::config::{CheckParams, DEFAULT_DISPOSABLE_TIMEOUT};
use crate::error_handling::{CheckError, DnsError};
use crate::models::{DnsValidation, EmailCheckResult, PatternReport};

/// Disposable-list membership plus its refresh pipeline.
#[async_trait]
pub trait DisposableCheck: Send + Sync {
    async fn is_disposable(&self, domain: &str) -> anyhow::Result<bool>;
    async fn refresh(&self) -> anyhow::Result<()>;
}

/// DNS validation lookup (cached, single-flight).
#[async_trait]
pub trait DnsCheck: Send + Sync {
    async fn dns_validation(&self, domain: &str) -> Result<DnsValidation, DnsError>;
}

/// Well-known-provider membership plus its refresh pipeline.
#[async_trait]
pub trait WellKnownCheck: Send + Sync {
    async fn is_well_known(&self, domain: &str) -> anyhow::Result<bool>;
    async fn refresh(&self) -> anyhow::Result<()>;
}

/// Educational-domain membership plus its refresh pipeline.
#[async_trait]
pub trait EducationalCheck: Send + Sync {
    async fn is_educational(&self, domain: &str) -> anyhow::Result<bool>;
    async fn refresh(&self) -> anyhow::Result<()>;
}

/// Local-part pattern heuristic. Pure CPU, no I/O.
pub trait PatternCheck: Send + Sync {
    fn check(&self, email: &str) -> anyhow::Result<PatternReport>;
}

/// The signal services a checker is assembled from.
pub struct Services {
    pub disposable: Arc<dyn DisposableCheck>,
    pub dns: Arc<dyn DnsCheck>,
    pub well_known: Arc<dyn WellKnownCheck>,
    pub educational: Arc<dyn EducationalCheck>,
    pub pattern: Arc<dyn PatternCheck>,
}

/// Orchestrates the five signals of an email check.
pub struct EmailChecker {
    disposable: Arc<dyn DisposableCheck>,
    dns: Arc<dyn DnsCheck>,
    well_known: Arc<dyn WellKnownCheck>,
    educational: Arc<dyn EducationalCheck>,
    pattern: Arc<dyn PatternCheck>,
    analyzer: RiskAnalyzer,
}

impl EmailChecker {
    pub fn new(services: Services) -> Self {
        Self {
            disposable: services.disposable,
            dns: services.dns,
            well_known: services.well_known,
            educational: services.educational,
            pattern: services.pattern,
            analyzer: RiskAnalyzer::new(),
        }
    }

    /// Runs a full check of `params.email`.
    ///
    /// Each non-skipped signal runs on its own task; all of them settle
    /// before the analyzer sees the result, and the five outcome slots are
    /// filled in a fixed field order regardless of task completion order.
    pub async fn check(&self, params: CheckParams) -> Result<EmailCheckResult, CheckError> {
        let started = Instant::now();
        let email = params.email.clone();

        let domain = split_domain(&email)?.to_string();

        let result = Arc::new(Mutex::new(EmailCheckResult::new(email.as_str())));
        let mut tasks = Vec::with_capacity(5);

        if !params.skip_disposable {
            tasks.push(self.spawn_disposable_check(&params, &result, &domain));
        }
        if !params.skip_dns {
            tasks.push(self.spawn_dns_check(&result, &domain));
        }
        if !params.skip_well_known {
            tasks.push(self.spawn_well_known_check(&result, &domain));
        }
        if !params.skip_educational {
            tasks.push(self.spawn_educational_check(&result, &domain));
        }
        if !params.skip_pattern_check {
            tasks.push(self.spawn_pattern_check(&result, &email));
        }

        for task in tasks {
            if let Err(e) = task.await {
                warn!("Check task for {email} panicked: {e}");
            }
        }

        let mut result = match Arc::try_unwrap(result) {
            Ok(mutex) => mutex.into_inner(),
            // Every task has been awaited, so no other handle remains.
            Err(arc) => arc.lock().await.clone(),
        };

        result.elapsed = started.elapsed();
        result.analysis = Some(self.analyzer.analyze(&result));

        Ok(result)
    }

    fn spawn_disposable_check(
        &self,
        params: &CheckParams,
        result: &Arc<Mutex<EmailCheckResult>>,
        domain: &str,
    ) -> tokio::task::JoinHandle<()> {
        let service = Arc::clone(&self.disposable);
        let result = Arc::clone(result);
        let domain = domain.to_string();
        let deadline = params
            .disposable_timeout
            .unwrap_or(DEFAULT_DISPOSABLE_TIMEOUT);

        tokio::spawn(async move {
            let started = Instant::now();
            let outcome = tokio::time::timeout(deadline, service.is_disposable(&domain)).await;
            let elapsed = started.elapsed();

            let mut result = result.lock().await;
            result.disposable.checked = true;
            result.disposable.elapsed = elapsed;
            match outcome {
                Ok(Ok(value)) => result.disposable.value = Some(value),
                Ok(Err(e)) => result.disposable.err = Some(e.to_string()),
                Err(_) => {
                    result.disposable.err =
                        Some(format!("disposable lookup timed out after {deadline:?}"))
                }
            }
        })
    }

    fn spawn_dns_check(
        &self,
        result: &Arc<Mutex<EmailCheckResult>>,
        domain: &str,
    ) -> tokio::task::JoinHandle<()> {
        let dns = Arc::clone(&self.dns);
        let disposable = Arc::clone(&self.disposable);
        let result = Arc::clone(result);
        let domain = domain.to_string();

        tokio::spawn(async move {
            let started = Instant::now();
            let mut outcome = dns.dns_validation(&domain).await;

            // Secondary work: annotate each MX host with disposable-list
            // membership. Best-effort; individual failures leave the flag
            // false.
            if let Ok(validation) = &mut outcome {
                let hosts: Vec<String> = validation
                    .mx_records
                    .iter()
                    .map(|mx| mx.value.clone())
                    .collect();
                let lookups = join_all(
                    hosts
                        .iter()
                        .map(|host| disposable.is_disposable(host)),
                )
                .await;

                for (mx, lookup) in validation.mx_records.iter_mut().zip(lookups) {
                    if let Ok(is_disposable) = lookup {
                        mx.disposable = is_disposable;
                    }
                }
            }

            let elapsed = started.elapsed();
            let mut result = result.lock().await;
            result.dns.checked = true;
            result.dns.elapsed = elapsed;
            match outcome {
                Ok(validation) => result.dns.value = Some(validation),
                Err(e) => result.dns.err = Some(e.to_string()),
            }
        })
    }

    fn spawn_well_known_check(
        &self,
        result: &Arc<Mutex<EmailCheckResult>>,
        domain: &str,
    ) -> tokio::task::JoinHandle<()> {
        let service = Arc::clone(&self.well_known);
        let result = Arc::clone(result);
        let domain = domain.to_string();

        tokio::spawn(async move {
            let started = Instant::now();
            let outcome = service.is_well_known(&domain).await;
            let elapsed = started.elapsed();

            let mut result = result.lock().await;
            result.well_known.checked = true;
            result.well_known.elapsed = elapsed;
            match outcome {
                Ok(value) => result.well_known.value = Some(value),
                Err(e) => result.well_known.err = Some(e.to_string()),
            }
        })
    }

    fn spawn_educational_check(
        &self,
        result: &Arc<Mutex<EmailCheckResult>>,
        domain: &str,
    ) -> tokio::task::JoinHandle<()> {
        let service = Arc::clone(&self.educational);
        let result = Arc::clone(result);
        let domain = domain.to_string();

        tokio::spawn(async move {
            let started = Instant::now();
            let outcome = service.is_educational(&domain).await;
            let elapsed = started.elapsed();

            let mut result = result.lock().await;
            result.educational.checked = true;
            result.educational.elapsed = elapsed;
            match outcome {
                Ok(value) => result.educational.value = Some(value),
                Err(e) => result.educational.err = Some(e.to_string()),
            }
        })
    }

    fn spawn_pattern_check(
        &self,
        result: &Arc<Mutex<EmailCheckResult>>,
        email: &str,
    ) -> tokio::task::JoinHandle<()> {
        let service = Arc::clone(&self.pattern);
        let result = Arc::clone(result);
        let email = email.to_string();

        tokio::spawn(async move {
            let started = Instant::now();
            let outcome = service.check(&email);
            let elapsed = started.elapsed();

            let mut result = result.lock().await;
            result.pattern.checked = true;
            result.pattern.elapsed = elapsed;
            match outcome {
                Ok(report) => result.pattern.value = Some(report),
                Err(e) => result.pattern.err = Some(e.to_string()),
            }
        })
    }
}

/// The domain part after the rightmost `@`.
///
/// Rejects inputs where that `@` is missing, leading (empty local part) or
/// trailing (empty domain).
fn split_domain(email: &str) -> Result<&str, CheckError> {
    match email.rfind('@') {
        Some(at) if at > 0 && at < email.len() - 1 => Ok(&email[at + 1..]),
        _ => Err(CheckError::InvalidEmail(email.to_string())),
    }
}
