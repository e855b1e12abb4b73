//! Shared HTTP client construction.

use crate::error::Result;
use std::time::Duration;

/// Build a `reqwest` client with the given request timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("vidsum/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
