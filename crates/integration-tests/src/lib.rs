//! Integration test helpers for Plants & Co.
//!
//! The actual tests live in `tests/` and run against a live API server;
//! they are `#[ignore]`d by default. Start a server first:
//!
//! ```bash
//! cargo run -p plantsco-cli -- migrate
//! cargo run -p plantsco-cli -- seed
//! cargo run -p plantsco-api
//! cargo test -p plantsco-integration-tests -- --ignored
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A unique email per test run, so reruns don't trip the unique constraint.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@plants.co", uuid::Uuid::new_v4())
}
