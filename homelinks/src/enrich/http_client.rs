//! Shared HTTP client for enrichment requests

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

const USER_AGENT: &str = concat!("homelinks/", env!("CARGO_PKG_VERSION"));

const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Build a client whose requests are bounded by `timeout`
pub fn create_shared_client(timeout: Duration) -> anyhow::Result<Arc<Client>> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(4)
        .build()?;

    Ok(Arc::new(client))
}
