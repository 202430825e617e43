use super::error::ExtractorError;
use super::factory::ExtractorFactory;
use reqwest::Client;
use rustls::{ClientConfig, crypto::ring};
use rustls_platform_verifier::BuilderVerifierExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub(crate) const DEFAULT_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

pub fn default_client() -> Result<Client, ExtractorError> {
    create_client(None)
}

pub fn create_client(proxy_config: Option<ProxyConfig>) -> Result<Client, ExtractorError> {
    let provider = Arc::new(ring::default_provider());
    let tls_config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_platform_verifier()?
        .with_no_client_auth();

    let mut builder = Client::builder()
        .use_preconfigured_tls(tls_config)
        .timeout(DEFAULT_TIMEOUT);

    if let Some(config) = proxy_config {
        match build_proxy(&config) {
            Ok(proxy) => builder = builder.proxy(proxy),
            Err(e) => {
                warn!("Failed to configure proxy '{}': {}", config.url, e);
            }
        }
    }

    Ok(builder.build()?)
}

/// Proxy for every request; http, https and socks5 urls are accepted.
fn build_proxy(config: &ProxyConfig) -> Result<reqwest::Proxy, reqwest::Error> {
    let proxy = reqwest::Proxy::all(&config.url)?;
    Ok(match (&config.username, &config.password) {
        (Some(username), Some(password)) => proxy.basic_auth(username, password),
        _ => proxy,
    })
}

/// Returns a new `ExtractorFactory` populated with all the supported sites.
pub fn default_factory() -> Result<ExtractorFactory, ExtractorError> {
    Ok(ExtractorFactory::new(default_client()?))
}

/// Returns a new `ExtractorFactory` with proxy support.
pub fn factory_with_proxy(
    proxy_config: Option<ProxyConfig>,
) -> Result<ExtractorFactory, ExtractorError> {
    Ok(ExtractorFactory::new(create_client(proxy_config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy(url: &str) -> ProxyConfig {
        ProxyConfig {
            url: url.to_string(),
            username: Some("user".to_string()),
            password: Some("secret".to_string()),
        }
    }

    #[test]
    fn proxy_schemes() {
        assert!(build_proxy(&proxy("http://127.0.0.1:8080")).is_ok());
        assert!(build_proxy(&proxy("https://127.0.0.1:8443")).is_ok());
        assert!(build_proxy(&proxy("socks5://127.0.0.1:1080")).is_ok());
        assert!(build_proxy(&proxy("socks5h://127.0.0.1:1080")).is_ok());
        assert!(build_proxy(&proxy("ftp://127.0.0.1:21")).is_err());
    }
}
