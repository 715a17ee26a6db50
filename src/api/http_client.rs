use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use super::client::ClientConfig;
use crate::error::Result;

/// Build the HTTP session shared by every query of one resolver.
///
/// The timeout is fixed here and applies uniformly to all requests.
pub fn build_session(config: &ClientConfig) -> Result<Client> {
    let client = ClientBuilder::new()
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(config.timeout))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .user_agent(config.user_agent.as_str())
        .use_rustls_tls()
        .build()?;

    Ok(client)
}
