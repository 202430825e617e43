use crate::extractor::default::DEFAULT_UA;
use crate::media::{StreamWeight, stream_weight};

use super::{super::media::media_info::MediaInfo, error::ExtractorError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

/// Shared request state of a site extractor: the page url, a client and the
/// headers every request to the site carries.
#[derive(Debug, Clone)]
pub struct Extractor {
    // page to resolve, e.g. "https://www.1tv.ru/live"
    pub url: String,
    // name of the site, e.g. "1tv"
    pub platform_name: String,
    pub client: Client,
    platform_headers: HeaderMap,
}

impl Extractor {
    pub fn new<S1: Into<String>, S2: Into<String>>(
        platform_name: S1,
        platform_url: S2,
        client: Client,
    ) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(DEFAULT_UA),
        );
        default_headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        default_headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("ru-RU,ru;q=0.8,en-US;q=0.5,en;q=0.3"),
        );

        Self {
            platform_name: platform_name.into(),
            url: platform_url.into(),
            client,
            platform_headers: default_headers,
        }
    }

    /// Adds a header to every request. Invalid names or values are skipped with a warning.
    pub fn add_header<K: AsRef<str>, V: AsRef<str>>(&mut self, key: K, value: V) {
        let (key, value) = (key.as_ref(), value.as_ref());
        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.platform_headers.insert(name, value);
            }
            _ => warn!("Ignoring invalid header {}: {}", key, value),
        }
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!("{} {}", method, url);
        self.client
            .request(method, url)
            .headers(self.platform_headers.clone())
    }

    pub fn get_platform_headers(&self) -> &HeaderMap {
        &self.platform_headers
    }

    pub fn get_platform_headers_map(&self) -> FxHashMap<String, String> {
        self.platform_headers
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (key.to_string(), value.to_string()))
            })
            .collect()
    }
}

#[async_trait]
pub trait PlatformExtractor: Send + Sync {
    fn get_extractor(&self) -> &Extractor;

    fn get_platform_headers(&self) -> &HeaderMap {
        self.get_extractor().get_platform_headers()
    }

    async fn extract(&self) -> Result<MediaInfo, ExtractorError>;

    /// Weight used by hosts to sort and pick among the extracted streams.
    fn stream_weight(&self, quality: &str) -> StreamWeight {
        stream_weight(quality)
    }
}
