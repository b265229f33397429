// Shared test helpers: in-memory stores and canned DoH responses.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mailsift::storage::{run_migrations, SqliteStore};

/// Creates an in-memory store with migrations applied, returning the pool
/// for direct seeding.
#[allow(dead_code)]
pub async fn memory_store() -> (SqliteStore, Arc<SqlitePool>) {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    let pool = Arc::new(pool);
    (SqliteStore::new(Arc::clone(&pool)), pool)
}

/// Writes a DNS cache row with an explicit creation time, bypassing the
/// store so tests can age entries at will.
#[allow(dead_code)]
pub async fn seed_dns_record(
    pool: &SqlitePool,
    domain: &str,
    data: &[u8],
    created_at: DateTime<Utc>,
) {
    sqlx::query(
        "INSERT INTO dns_records (domain, data, created_at) VALUES (?, ?, ?) \
         ON CONFLICT(domain) DO UPDATE SET data = excluded.data, created_at = excluded.created_at",
    )
    .bind(domain)
    .bind(data)
    .bind(created_at)
    .execute(pool)
    .await
    .expect("Failed to seed dns_records");
}

/// One dns-json answer record.
#[allow(dead_code)]
pub fn answer(record_type: u16, data: &str) -> serde_json::Value {
    serde_json::json!({
        "name": "example.com",
        "type": record_type,
        "TTL": 300,
        "data": data,
    })
}

/// A NOERROR dns-json document with the given answers.
#[allow(dead_code)]
pub fn dns_json(answers: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({ "Status": 0, "Answer": answers })
}

/// Mounts a dns-json response for one record type, any name.
#[allow(dead_code)]
pub async fn mount_lookup(server: &MockServer, record_type: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(query_param("type", record_type))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts all five lookups for a domain that can receive mail: two MX
/// hosts, SPF, DMARC, ordinary nameservers.
#[allow(dead_code)]
pub async fn mount_mail_domain(server: &MockServer, domain: &str) {
    mount_lookup(server, "A", dns_json(vec![answer(1, "93.184.216.34")])).await;
    mount_lookup(
        server,
        "NS",
        dns_json(vec![answer(2, "a.iana-servers.net."), answer(2, "b.iana-servers.net.")]),
    )
    .await;
    mount_lookup(
        server,
        "MX",
        dns_json(vec![
            answer(15, &format!("10 mx1.{domain}.")),
            answer(15, &format!("20 mx2.{domain}.")),
        ]),
    )
    .await;

    Mock::given(method("GET"))
        .and(query_param("type", "TXT"))
        .and(query_param("name", domain))
        .respond_with(ResponseTemplate::new(200).set_body_json(dns_json(vec![answer(
            16,
            "\"v=spf1 include:_spf.example.com -all\"",
        )])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("type", "TXT"))
        .and(query_param("name", format!("_dmarc.{domain}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(dns_json(vec![answer(
            16,
            "\"v=DMARC1; p=reject\"",
        )])))
        .mount(server)
        .await;
}
