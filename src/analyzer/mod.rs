//! Risk analysis over settled check signals.
//!
//! The analyzer is a pure decision function: given the five signal outcomes
//! of a check it produces a score, a risk level and the reasons behind them.
//! It runs strictly after every signal has settled and performs no I/O, so
//! equal inputs always produce identical reports.
//!
//! Rules apply in three phases:
//!
//! 1. Hard short-circuits: disposable providers and domains without MX.
//! 2. Pattern suspicion: counted flags with an educational-domain discount;
//!    enough suspicion or a random pattern ends the analysis at high risk.
//! 3. Additive scoring: pattern, provider, educational and DNS-posture
//!    terms summed and clamped into `[0, 1]`.
//!
//! The order of phases and of reasons within a phase is part of the
//! observable contract.


use crate::models::{AnalysisReport, EmailCheckResult, RiskLevel};

pub const REASON_DISPOSABLE_BLOCKED: &str = "Disposable email provider blocked";
pub const REASON_DOMAIN_CANNOT_RECEIVE: &str = "Domain cannot receive email";
pub const REASON_SUSPICIOUS_PATTERN: &str = "Suspicious email pattern detected";
pub const REASON_SHORT_LOCAL_PART: &str = "Email has unusually short local part";
pub const REASON_TOO_MANY_CONSECUTIVE_NUMBERS: &str = "Email has too many consecutive numbers";
pub const REASON_EXCESSIVE_SPECIAL_CHARS: &str = "Email has excessive special characters";
pub const REASON_MULTIPLE_SUSPICIOUS_PATTERNS: &str =
    "Multiple suspicious patterns detected - likely automated";
pub const REASON_RANDOM_ON_WELL_KNOWN: &str =
    "Random pattern on well-known domain - likely bot generated";
pub const REASON_RANDOM_ON_UNKNOWN: &str =
    "Random pattern on unknown domain - likely bot generated";
pub const REASON_WELL_KNOWN_PROVIDER: &str = "Well-known email provider";
pub const REASON_UNKNOWN_PROVIDER: &str = "Unknown email provider";
pub const REASON_ONLY_ONE_MX: &str = "Domain has only one MX record";
pub const REASON_NO_SPF: &str = "Domain lacks SPF record";
pub const REASON_STRICT_SPF: &str = "Domain has strict SPF policy";
pub const REASON_NO_DMARC: &str = "Domain lacks DMARC record";
pub const REASON_STRONG_DMARC: &str = "Domain has strong DMARC policy";
pub const REASON_NO_SUSPICIOUS_SIGNALS: &str = "No suspicious signals detected";
pub const REASON_EDUCATIONAL_DOMAIN: &str = "Email from educational institution domain";
pub const REASON_STUDENT_ID_PATTERN: &str = "Student/Staff ID pattern detected";

/// Pattern suspicion needed to block outright.
const SUSPICION_BLOCK_THRESHOLD: usize = 3;
/// Educational domains get one extra allowance before blocking.
const SUSPICION_BLOCK_THRESHOLD_EDU: usize = 4;

/// Score at or above which the level is high.
const HIGH_RISK_THRESHOLD: f64 = 0.7;
/// Score at or above which the level is medium.
const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

/// Deterministic scorer over a settled [`EmailCheckResult`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RiskAnalyzer;

impl RiskAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Scores a settled check result.
    ///
    /// A signal that was skipped or failed contributes nothing: each rule
    /// only looks at signals that ran and succeeded.
    pub fn analyze(&self, result: &EmailCheckResult) -> AnalysisReport {
        let mut report = AnalysisReport {
            risk_level: RiskLevel::Low,
            score: 0.0,
            reasons: Vec::new(),
        };

        let is_educational = result.educational.ok() == Some(&true);

        // Phase A: hard short-circuits.
        if result.disposable.ok() == Some(&true) {
            report.score = 1.0;
            report.risk_level = RiskLevel::High;
            report.reasons.push(REASON_DISPOSABLE_BLOCKED.to_string());
            return report;
        }

        if let Some(dns) = result.dns.ok() {
            if !dns.has_mx {
                report.score = 1.0;
                report.risk_level = RiskLevel::High;
                report.reasons.push(REASON_DOMAIN_CANNOT_RECEIVE.to_string());
                return report;
            }
        }

        // Phase B: pattern suspicion count.
        let mut suspicion = 0usize;
        let mut random_pattern = false;

        if let Some(pattern) = result.pattern.ok() {
            if pattern.has_random_pattern {
                if is_educational {
                    report.reasons.push(REASON_EDUCATIONAL_DOMAIN.to_string());
                } else {
                    random_pattern = true;
                    suspicion += 1;
                    report.reasons.push(REASON_SUSPICIOUS_PATTERN.to_string());
                }
            }

            if pattern.short_local_part && !is_educational {
                suspicion += 1;
                report.reasons.push(REASON_SHORT_LOCAL_PART.to_string());
            }

            if pattern.too_many_consecutive_numbers {
                if is_educational {
                    report.reasons.push(REASON_STUDENT_ID_PATTERN.to_string());
                } else {
                    suspicion += 1;
                    report
                        .reasons
                        .push(REASON_TOO_MANY_CONSECUTIVE_NUMBERS.to_string());
                }
            }

            if pattern.too_many_special_chars {
                suspicion += 1;
                report
                    .reasons
                    .push(REASON_EXCESSIVE_SPECIAL_CHARS.to_string());
            }

            let block_threshold = if is_educational {
                SUSPICION_BLOCK_THRESHOLD_EDU
            } else {
                SUSPICION_BLOCK_THRESHOLD
            };

            if suspicion >= block_threshold {
                report.score = 0.9;
                report.risk_level = RiskLevel::High;
                report
                    .reasons
                    .push(REASON_MULTIPLE_SUSPICIOUS_PATTERNS.to_string());
                return report;
            }

            if random_pattern && !is_educational {
                report.score = 0.8;
                report.risk_level = RiskLevel::High;

                if result.well_known.ok() == Some(&true) {
                    report.reasons.push(REASON_RANDOM_ON_WELL_KNOWN.to_string());
                } else {
                    report.reasons.push(REASON_RANDOM_ON_UNKNOWN.to_string());
                }
                return report;
            }
        }

        // Phase C: additive scoring.
        let mut pattern_score: f64 = 0.0;
        if let Some(pattern) = result.pattern.ok() {
            if pattern.short_local_part && !is_educational {
                pattern_score += 0.2;
            }
            if pattern.too_many_consecutive_numbers && !is_educational {
                pattern_score += 0.2;
            }
            if pattern.too_many_special_chars {
                pattern_score += 0.15;
            }
        }

        let mut domain_score = 0.0;
        if let Some(well_known) = result.well_known.ok() {
            if *well_known {
                domain_score -= 0.15;
                report.reasons.push(REASON_WELL_KNOWN_PROVIDER.to_string());
            } else {
                domain_score += 0.25;
                report.reasons.push(REASON_UNKNOWN_PROVIDER.to_string());
            }
        }

        if is_educational {
            domain_score -= 0.2;
            report.reasons.push(REASON_EDUCATIONAL_DOMAIN.to_string());
        }

        let mut dns_score = 0.0;
        if let Some(dns) = result.dns.ok() {
            if dns.mx_records.len() == 1 {
                dns_score += 0.1;
                report.reasons.push(REASON_ONLY_ONE_MX.to_string());
            }

            if !dns.has_spf {
                dns_score += 0.1;
                report.reasons.push(REASON_NO_SPF.to_string());
            } else if dns
                .spf_record
                .as_deref()
                .is_some_and(|spf| spf.contains("-all"))
            {
                dns_score -= 0.05;
                report.reasons.push(REASON_STRICT_SPF.to_string());
            }

            if !dns.has_dmarc {
                dns_score += 0.1;
                report.reasons.push(REASON_NO_DMARC.to_string());
            } else if dns.dmarc_record.as_deref().is_some_and(|dmarc| {
                dmarc.contains("p=reject") || dmarc.contains("p=quarantine")
            }) {
                dns_score -= 0.1;
                report.reasons.push(REASON_STRONG_DMARC.to_string());
            }
        }

        report.score = (pattern_score + domain_score + dns_score).clamp(0.0, 1.0);

        report.risk_level = if report.score >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if report.score >= MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        if report.reasons.is_empty() {
            report.reasons.push(REASON_NO_SUSPICIOUS_SIGNALS.to_string());
        }

        report
    }
}
