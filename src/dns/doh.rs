//! DNS-over-HTTPS client and validation aggregator.
//!
//! One [`DohClient::lookup`] call issues a single record-type query against
//! the dns-json endpoint. [`DohClient::validate`] runs the five lookups a
//! validation needs (A, NS, MX, TXT and TXT at `_dmarc.`) in parallel and
//! composes them into a [`DnsValidation`]. Any sub-lookup failure fails the
//! whole validation with the first error; partial results never leak.

use std::sync::{Arc, Mutex};

use reqwest::header::ACCEPT;
use serde::Deserialize;

use super::parked::ParkedDomainMatcher;
use crate::config::DOH_ENDPOINT;
use crate::error_handling::DnsError;
use crate::models::{DnsValidation, MxRecord};

/// DNS rcode for a successful answer.
const RCODE_NOERROR: i32 = 0;
/// Record type codes as they appear in dns-json answers.
const TYPE_A: u16 = 1;
const TYPE_NS: u16 = 2;

/// One dns-json response document.
#[derive(Debug, Deserialize)]
pub struct DohResponse {
    #[serde(rename = "Status")]
    pub status: i32,
    #[serde(rename = "Answer", default)]
    pub answer: Vec<DohAnswer>,
}

/// One answer record of a dns-json response.
#[derive(Debug, Deserialize)]
pub struct DohAnswer {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: u16,
    #[serde(rename = "TTL")]
    pub ttl: u32,
    pub data: String,
}

/// DoH client over a shared HTTP connection pool.
pub struct DohClient {
    http: Arc<reqwest::Client>,
    endpoint: String,
    parked: ParkedDomainMatcher,
}

impl DohClient {
    pub fn new(http: Arc<reqwest::Client>) -> Self {
        Self::with_endpoint(http, DOH_ENDPOINT)
    }

    /// Client against a non-default endpoint. Used by tests to point at a
    /// mock server.
    pub fn with_endpoint(http: Arc<reqwest::Client>, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            parked: ParkedDomainMatcher::new(),
        }
    }

    /// Issues one record-type lookup for `name`.
    pub async fn lookup(&self, name: &str, record_type: &str) -> Result<DohResponse, DnsError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("name", name), ("type", record_type)])
            .header(ACCEPT, "application/dns-json")
            .send()
            .await
            .map_err(|e| DnsError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DnsError::Status(status.as_u16()));
        }

        response
            .json::<DohResponse>()
            .await
            .map_err(|e| DnsError::Decode(e.to_string()))
    }

    /// Runs the five lookups of one DNS validation in parallel and composes
    /// the aggregate as each returns.
    pub async fn validate(&self, domain: &str) -> Result<DnsValidation, DnsError> {
        let result = Mutex::new(DnsValidation::new(domain));

        tokio::try_join!(
            self.collect_a_records(domain, &result),
            self.collect_ns_records(domain, &result),
            self.collect_mx_records(domain, &result),
            self.collect_spf(domain, &result),
            self.collect_dmarc(domain, &result),
        )?;

        Ok(result.into_inner().unwrap_or_else(|e| e.into_inner()))
    }

    async fn collect_a_records(
        &self,
        domain: &str,
        result: &Mutex<DnsValidation>,
    ) -> Result<(), DnsError> {
        let response = self.lookup(domain, "A").await?;
        if response.status != RCODE_NOERROR || response.answer.is_empty() {
            return Ok(());
        }

        let mut result = result.lock().unwrap_or_else(|e| e.into_inner());
        for answer in &response.answer {
            if answer.record_type == TYPE_A {
                if self.parked.is_parked_ip(&answer.data) {
                    result.is_parked = true;
                }
                result.a_records.push(answer.data.clone());
            }
        }
        Ok(())
    }

    async fn collect_ns_records(
        &self,
        domain: &str,
        result: &Mutex<DnsValidation>,
    ) -> Result<(), DnsError> {
        let response = self.lookup(domain, "NS").await?;
        if response.status != RCODE_NOERROR || response.answer.is_empty() {
            return Ok(());
        }

        let mut result = result.lock().unwrap_or_else(|e| e.into_inner());
        for answer in &response.answer {
            if answer.record_type == TYPE_NS {
                if self.parked.is_parked_ns(&answer.data) {
                    result.is_parked = true;
                }
                result.ns_records.push(answer.data.clone());
            }
        }
        Ok(())
    }

    async fn collect_mx_records(
        &self,
        domain: &str,
        result: &Mutex<DnsValidation>,
    ) -> Result<(), DnsError> {
        let response = self.lookup(domain, "MX").await?;
        if response.status != RCODE_NOERROR || response.answer.is_empty() {
            return Ok(());
        }

        let mut result = result.lock().unwrap_or_else(|e| e.into_inner());
        result.has_mx = true;
        for answer in &response.answer {
            // MX data arrives as "<priority> <exchange>".
            let fields: Vec<&str> = answer.data.split_whitespace().collect();
            if let [priority, exchange] = fields.as_slice() {
                result.mx_records.push(MxRecord {
                    value: (*exchange).to_string(),
                    priority: priority.parse().unwrap_or(0),
                    disposable: false,
                });
            }
        }
        Ok(())
    }

    async fn collect_spf(
        &self,
        domain: &str,
        result: &Mutex<DnsValidation>,
    ) -> Result<(), DnsError> {
        let response = self.lookup(domain, "TXT").await?;
        if response.status != RCODE_NOERROR {
            return Ok(());
        }

        for answer in &response.answer {
            if answer.data.starts_with("\"v=spf1") {
                let mut result = result.lock().unwrap_or_else(|e| e.into_inner());
                result.has_spf = true;
                result.spf_record = Some(answer.data.trim_matches('"').to_string());
                break;
            }
        }
        Ok(())
    }

    async fn collect_dmarc(
        &self,
        domain: &str,
        result: &Mutex<DnsValidation>,
    ) -> Result<(), DnsError> {
        let dmarc_domain = format!("_dmarc.{domain}");
        let response = self.lookup(&dmarc_domain, "TXT").await?;
        if response.status != RCODE_NOERROR {
            return Ok(());
        }

        for answer in &response.answer {
            if answer.data.starts_with("\"v=DMARC1") {
                let mut result = result.lock().unwrap_or_else(|e| e.into_inner());
                result.has_dmarc = true;
                result.dmarc_record = Some(answer.data.trim_matches('"').to_string());
                break;
            }
        }
        Ok(())
    }
}
