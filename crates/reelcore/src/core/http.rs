//! Shared `reqwest::Client` construction for the outbound upstreams.

use crate::core::config;
use crate::core::error::AppError;
use crate::download::error::DownloadError;

/// Build a client with the browser user agent, standard timeouts and the
/// configured proxy, if any.
pub fn build_client() -> Result<reqwest::Client, AppError> {
    build_client_with_proxy(config::proxy::active())
}

/// Same as [`build_client`] but with an explicit proxy.
pub fn build_client_with_proxy(proxy_url: Option<&str>) -> Result<reqwest::Client, AppError> {
    let mut client_builder = reqwest::Client::builder()
        .user_agent(config::network::USER_AGENT)
        .timeout(config::network::timeout())
        .connect_timeout(config::network::connect_timeout());

    if let Some(proxy_url) = proxy_url.filter(|p| config::proxy::is_enabled(p)) {
        let proxy = reqwest::Proxy::all(proxy_url.trim())
            .map_err(|e| DownloadError::Proxy(format!("invalid proxy {}: {}", proxy_url, e)))?;
        log::info!("Using outbound proxy {}", proxy_url.trim());
        client_builder = client_builder.proxy(proxy);
    }

    Ok(client_builder.build()?)
}
