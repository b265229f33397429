//! Orchestrator tests with mock signal services.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::*;
use crate::models::{MxRecord, RiskLevel};

/// Disposable mock: fixed answer, optional delay, optional failure,
/// call counting.
#[derive(Default)]
struct MockDisposable {
    value: bool,
    fail: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

#[async_trait]
impl DisposableCheck for MockDisposable {
    async fn is_disposable(&self, _domain: &str) -> anyhow::Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            anyhow::bail!("store unavailable");
        }
        Ok(self.value)
    }

    async fn refresh(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

struct MockDns {
    outcome: Result<DnsValidation, DnsError>,
}

#[async_trait]
impl DnsCheck for MockDns {
    async fn dns_validation(&self, _domain: &str) -> Result<DnsValidation, DnsError> {
        self.outcome.clone()
    }
}

#[derive(Default)]
struct MockMembership {
    value: bool,
    fail: bool,
}

#[async_trait]
impl WellKnownCheck for MockMembership {
    async fn is_well_known(&self, _domain: &str) -> anyhow::Result<bool> {
        if self.fail {
            anyhow::bail!("store unavailable");
        }
        Ok(self.value)
    }

    async fn refresh(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl EducationalCheck for MockMembership {
    async fn is_educational(&self, _domain: &str) -> anyhow::Result<bool> {
        if self.fail {
            anyhow::bail!("store unavailable");
        }
        Ok(self.value)
    }

    async fn refresh(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

fn healthy_dns(domain: &str) -> DnsValidation {
    let mut dns = DnsValidation::new(domain);
    dns.has_mx = true;
    dns.mx_records = vec![
        MxRecord {
            value: "mx1.example.com.".into(),
            priority: 10,
            disposable: false,
        },
        MxRecord {
            value: "mx2.example.com.".into(),
            priority: 20,
            disposable: false,
        },
    ];
    dns.has_spf = true;
    dns.spf_record = Some("v=spf1 ~all".into());
    dns.has_dmarc = true;
    dns.dmarc_record = Some("v=DMARC1; p=none".into());
    dns
}

fn checker_with(
    disposable: MockDisposable,
    dns: MockDns,
    well_known: MockMembership,
    educational: MockMembership,
) -> EmailChecker {
    EmailChecker::new(Services {
        disposable: Arc::new(disposable),
        dns: Arc::new(dns),
        well_known: Arc::new(well_known),
        educational: Arc::new(educational),
        pattern: Arc::new(crate::pattern::PatternChecker::new()),
    })
}

fn default_checker() -> EmailChecker {
    checker_with(
        MockDisposable::default(),
        MockDns {
            outcome: Ok(healthy_dns("example.com")),
        },
        MockMembership::default(),
        MockMembership::default(),
    )
}

#[tokio::test]
async fn rejects_emails_without_usable_at_sign() {
    let checker = default_checker();

    for email in ["plainaddress", "@example.com", "user@", "", "@"] {
        let err = checker
            .check(CheckParams::new(email))
            .await
            .expect_err("should reject");
        assert!(
            matches!(err, CheckError::InvalidEmail(_)),
            "expected InvalidEmail for {email:?}"
        );
    }
}

#[tokio::test]
async fn splits_on_rightmost_at_sign() {
    // "a@b@example.com" is accepted: the domain is everything after the
    // rightmost @. The pattern signal fails (two @s) but records its error
    // instead of aborting the check.
    let checker = default_checker();
    let result = checker
        .check(CheckParams::new("a@b@example.com"))
        .await
        .expect("check should succeed");

    assert!(result.pattern.checked);
    assert!(result.pattern.err.is_some());
    assert!(result.disposable.checked);
    assert_eq!(result.disposable.value, Some(false));
}

#[tokio::test]
async fn all_signals_settle_before_analysis() {
    let checker = default_checker();
    let result = checker
        .check(CheckParams::new("john.doe@example.com"))
        .await
        .expect("check should succeed");

    for (name, checked) in [
        ("disposable", result.disposable.checked),
        ("well_known", result.well_known.checked),
        ("educational", result.educational.checked),
        ("dns", result.dns.checked),
        ("pattern", result.pattern.checked),
    ] {
        assert!(checked, "{name} signal should have run");
    }

    assert!(result.analysis.is_some(), "analysis should be attached");
    assert_eq!(result.email, "john.doe@example.com");
}

#[tokio::test]
async fn skip_flags_disable_individual_signals() {
    let checker = default_checker();
    let mut params = CheckParams::new("john.doe@example.com");
    params.skip_dns = true;
    params.skip_pattern_check = true;

    let result = checker.check(params).await.expect("check should succeed");

    assert!(!result.dns.checked);
    assert!(result.dns.value.is_none());
    assert!(!result.pattern.checked);
    assert!(result.disposable.checked);
    assert!(result.well_known.checked);
    assert!(result.educational.checked);
}

#[tokio::test]
async fn signal_failure_does_not_abort_the_check() {
    let checker = checker_with(
        MockDisposable {
            fail: true,
            ..MockDisposable::default()
        },
        MockDns {
            outcome: Err(DnsError::Status(502)),
        },
        MockMembership::default(),
        MockMembership {
            value: false,
            fail: true,
        },
    );

    let result = checker
        .check(CheckParams::new("john.doe@example.com"))
        .await
        .expect("check should still succeed");

    assert!(result.disposable.checked);
    assert_eq!(result.disposable.value, None);
    assert!(result.disposable.err.as_deref().unwrap().contains("store unavailable"));

    assert!(result.dns.checked);
    assert!(result.dns.err.as_deref().unwrap().contains("502"));

    assert!(result.educational.err.is_some());
    assert!(result.well_known.err.is_none());

    // Failed signals are invisible to the analyzer.
    let analysis = result.analysis.expect("analysis");
    assert_eq!(analysis.risk_level, RiskLevel::Low);
}

#[tokio::test]
async fn slow_disposable_lookup_times_out() {
    let checker = checker_with(
        MockDisposable {
            value: true,
            delay: Some(Duration::from_millis(200)),
            ..MockDisposable::default()
        },
        MockDns {
            outcome: Ok(DnsValidation::new("example.com")),
        },
        MockMembership::default(),
        MockMembership::default(),
    );

    let mut params = CheckParams::new("user@example.com");
    params.disposable_timeout = Some(Duration::from_millis(10));
    params.skip_dns = true; // keep the enrichment path out of this test

    let result = checker.check(params).await.expect("check should succeed");

    assert!(result.disposable.checked);
    assert_eq!(result.disposable.value, None);
    assert!(
        result
            .disposable
            .err
            .as_deref()
            .unwrap()
            .contains("timed out"),
        "timeout should be recorded: {:?}",
        result.disposable.err
    );
}

#[tokio::test]
async fn dns_task_annotates_mx_hosts_with_disposable_membership() {
    let disposable = Arc::new(MockDisposable {
        value: true,
        ..MockDisposable::default()
    });
    let checker = EmailChecker::new(Services {
        disposable: Arc::clone(&disposable) as Arc<dyn DisposableCheck>,
        dns: Arc::new(MockDns {
            outcome: Ok(healthy_dns("example.com")),
        }),
        well_known: Arc::new(MockMembership::default()),
        educational: Arc::new(MockMembership::default()),
        pattern: Arc::new(crate::pattern::PatternChecker::new()),
    });

    let mut params = CheckParams::new("user@example.com");
    params.skip_disposable = true; // enrichment runs regardless

    let result = checker.check(params).await.expect("check should succeed");

    assert!(!result.disposable.checked, "primary signal was skipped");
    let dns = result.dns.value.expect("dns value");
    assert!(dns.mx_records.iter().all(|mx| mx.disposable));
    assert_eq!(
        disposable.calls.load(Ordering::SeqCst),
        2,
        "one disposable lookup per MX record"
    );
}

#[tokio::test]
async fn mx_enrichment_failures_are_swallowed() {
    let checker = checker_with(
        MockDisposable {
            fail: true,
            ..MockDisposable::default()
        },
        MockDns {
            outcome: Ok(healthy_dns("example.com")),
        },
        MockMembership::default(),
        MockMembership::default(),
    );

    let mut params = CheckParams::new("user@example.com");
    params.skip_disposable = true;

    let result = checker.check(params).await.expect("check should succeed");

    let dns = result.dns.value.expect("dns value despite enrichment failures");
    assert!(dns.mx_records.iter().all(|mx| !mx.disposable));
    assert!(result.dns.err.is_none());
}

#[tokio::test]
async fn disposable_hit_drives_high_risk_analysis() {
    let checker = checker_with(
        MockDisposable {
            value: true,
            ..MockDisposable::default()
        },
        MockDns {
            outcome: Ok(healthy_dns("disposable.example")),
        },
        MockMembership::default(),
        MockMembership::default(),
    );

    let result = checker
        .check(CheckParams::new("user@disposable.example"))
        .await
        .expect("check should succeed");

    let analysis = result.analysis.expect("analysis");
    assert_eq!(analysis.risk_level, RiskLevel::High);
    assert_eq!(analysis.score, 1.0);
    assert_eq!(
        analysis.reasons,
        vec![crate::analyzer::REASON_DISPOSABLE_BLOCKED.to_string()]
    );
}

#[tokio::test]
async fn elapsed_covers_the_whole_check() {
    let checker = checker_with(
        MockDisposable {
            delay: Some(Duration::from_millis(20)),
            ..MockDisposable::default()
        },
        MockDns {
            outcome: Ok(healthy_dns("example.com")),
        },
        MockMembership::default(),
        MockMembership::default(),
    );

    let result = checker
        .check(CheckParams::new("user@example.com"))
        .await
        .expect("check should succeed");

    assert!(result.elapsed >= Duration::from_millis(20));
    assert!(result.disposable.elapsed >= Duration::from_millis(20));
}
