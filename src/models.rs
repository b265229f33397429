//! Core data model for email checks.
//!
//! Everything a check produces lives here: the per-signal outcome records,
//! the DNS validation aggregate, the pattern flags and the final analysis
//! report. All of it serializes to JSON for the HTTP API and CLI output;
//! `DnsValidation` additionally round-trips through the DNS cache blob.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Coarse risk classification for an email address.
///
/// Wire values are exactly `low`, `medium` and `high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// No or weak suspicion signals.
    #[default]
    Low,
    /// Several additive signals, below the high threshold.
    Medium,
    /// Short-circuited or heavily penalized.
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// Output of the risk analyzer: a score in `[0, 1]`, the derived level and
/// the human-readable reasons that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub risk_level: RiskLevel,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// A single MX record as returned by the DoH lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxRecord {
    /// Exchange host, as received (may carry a trailing dot).
    pub value: String,
    /// Preference value; 0 when the answer could not be parsed.
    pub priority: u16,
    /// Whether the exchange host itself is on the disposable list.
    /// Filled in by the orchestrator after the DNS aggregate returns.
    pub disposable: bool,
}

/// Aggregated DNS posture for one domain.
///
/// Invariants: `has_mx` iff `mx_records` is non-empty; `spf_record` is
/// `Some` iff `has_spf`; `dmarc_record` is `Some` iff `has_dmarc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsValidation {
    pub domain: String,
    pub has_mx: bool,
    pub has_spf: bool,
    pub has_dmarc: bool,
    /// True when an NS record matches the parked-NS set or an A record
    /// falls into a known parking provider's IP range.
    pub is_parked: bool,
    pub a_records: Vec<String>,
    pub ns_records: Vec<String>,
    pub mx_records: Vec<MxRecord>,
    pub spf_record: Option<String>,
    pub dmarc_record: Option<String>,
}

impl DnsValidation {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            has_mx: false,
            has_spf: false,
            has_dmarc: false,
            is_parked: false,
            a_records: Vec::new(),
            ns_records: Vec::new(),
            mx_records: Vec::new(),
            spf_record: None,
            dmarc_record: None,
        }
    }
}

/// Boolean flags produced by the local-part pattern heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatternReport {
    pub short_local_part: bool,
    pub has_random_pattern: bool,
    pub too_many_consecutive_numbers: bool,
    pub too_many_special_chars: bool,
}

/// Outcome record for one signal of a check.
///
/// A signal is in exactly one of three states: skipped (`checked` false),
/// succeeded (`value` set) or failed (`err` set). A failure in one signal
/// never aborts the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport<T> {
    /// Whether the signal ran at all.
    pub checked: bool,
    /// The signal's payload when it succeeded.
    pub value: Option<T>,
    /// Failure description when it did not.
    pub err: Option<String>,
    /// Wall time the signal took.
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

impl<T> Default for SignalReport<T> {
    fn default() -> Self {
        Self {
            checked: false,
            value: None,
            err: None,
            elapsed: Duration::ZERO,
        }
    }
}

impl<T> SignalReport<T> {
    /// The payload, but only if the signal ran and succeeded.
    ///
    /// The analyzer consumes signals exclusively through this accessor, so a
    /// failed signal behaves like one that never ran.
    pub fn ok(&self) -> Option<&T> {
        if self.checked && self.err.is_none() {
            self.value.as_ref()
        } else {
            None
        }
    }
}

/// Complete result of one email check.
///
/// The five signal slots are always present; skipped signals keep their
/// default (unchecked) state. `analysis` is attached after every signal has
/// settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailCheckResult {
    pub email: String,
    pub disposable: SignalReport<bool>,
    pub well_known: SignalReport<bool>,
    pub educational: SignalReport<bool>,
    pub dns: SignalReport<DnsValidation>,
    pub pattern: SignalReport<PatternReport>,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
    pub analysis: Option<AnalysisReport>,
}

impl EmailCheckResult {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            disposable: SignalReport::default(),
            well_known: SignalReport::default(),
            educational: SignalReport::default(),
            dns: SignalReport::default(),
            pattern: SignalReport::default(),
            elapsed: Duration::ZERO,
            analysis: None,
        }
    }
}

/// Serializes a `Duration` as integer milliseconds.
mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
