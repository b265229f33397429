//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the
//! application, including timeouts, concurrency caps and upstream endpoints.

use std::time::Duration;

/// Default SQLite database path, overridable via `MAILSIFT_DB_PATH` or `--db-path`.
pub const DB_PATH: &str = "./mailsift.db";

/// DoH endpoint used for all DNS lookups (Cloudflare's dns-json API).
pub const DOH_ENDPOINT: &str = "https://one.one.one.one/dns-query";

/// How long a cached DNS validation stays fresh.
pub const DNS_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Global cap on simultaneous upstream DoH fetches across all requests.
pub const MAX_CONCURRENT_DNS_FETCHES: usize = 100;

/// Default per-call timeout for the disposable lookup.
/// The disposable signal is on the request's fast path, so it gets a tight
/// bound instead of inheriting the caller's deadline.
pub const DEFAULT_DISPOSABLE_TIMEOUT: Duration = Duration::from_millis(200);

/// A domain list is stale when its last refresh is older than this.
pub const LIST_STALE_AFTER: Duration = Duration::from_secs(12 * 60 * 60);

/// Interval of the background refresh task while the server runs.
pub const LIST_REFRESH_INTERVAL: Duration = Duration::from_secs(13 * 60 * 60);

/// Deadline for the construction-time refresh of the disposable list and for
/// the `update` command.
pub const REFRESH_DEADLINE: Duration = Duration::from_secs(5 * 60);

/// Maximum concurrent full checks in batch CLI mode.
pub const MAX_BATCH_CONCURRENCY: usize = 100;

/// Timeout applied to the shared HTTP client (DoH and list fetches).
pub const HTTP_CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Newline-delimited disposable domain list.
pub const DISPOSABLE_LIST_URL: &str =
    "https://raw.githubusercontent.com/disposable/disposable-email-domains/master/domains.txt";

/// Tranco daily top-list API base.
pub const TRANCO_BASE_URL: &str = "https://tranco-list.eu";

/// Number of rows to request from the Tranco download endpoint.
pub const TRANCO_LIST_SIZE: usize = 1_000_000;

/// JSON list of university domains.
pub const EDU_LIST_URL: &str =
    "https://raw.githubusercontent.com/Hipo/university-domains-list/master/world_universities_and_domains.json";

/// Default HTTP server bind port for `mailsift serve`.
pub const DEFAULT_SERVER_PORT: u16 = 8080;
