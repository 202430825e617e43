use std::collections::BTreeMap;

use tracing::debug;
use url::Url;

use super::builder::OneTv;
use crate::extractor::{error::ExtractorError, utils::update_scheme};

/// Authorization tokens for one live resolution, values percent-decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCredentials(BTreeMap<String, String>);

impl SessionCredentials {
    /// Decodes every value of a raw token response.
    pub fn from_encoded(raw: BTreeMap<String, String>) -> Self {
        Self(
            raw.into_iter()
                .map(|(key, value)| {
                    let decoded = urlencoding::decode_binary(value.as_bytes());
                    (key, String::from_utf8_lossy(&decoded).into_owned())
                })
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Appends the credentials to the query of `url`, encoding them once.
    pub fn apply(&self, url: &str) -> Result<String, ExtractorError> {
        let mut url = Url::parse(url)?;
        if !self.is_empty() {
            url.query_pairs_mut().extend_pairs(self.iter());
        }
        Ok(url.to_string())
    }
}

impl OneTv {
    /// Fetches fresh hls session tokens. Nothing is cached; call again to refresh.
    pub async fn hls_session(&self) -> Result<SessionCredentials, ExtractorError> {
        let url = update_scheme(&self.request.raw_url, &self.endpoints.session_api)?;
        let body = self
            .extractor
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let raw: BTreeMap<String, String> = serde_json::from_str(&body)?;
        debug!("Got hls session with {} keys", raw.len());
        Ok(SessionCredentials::from_encoded(raw))
    }
}
