use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::HeaderMap;

use super::dash_extractor::extract_dash_streams;
use super::error::ExtractorError;
use super::hls_extractor::extract_hls_streams;
use crate::media::StreamInfo;

/// Turns a manifest url into the named stream variants it describes.
#[async_trait]
pub trait ManifestExpander: Send + Sync {
    async fn expand_hls(
        &self,
        client: &Client,
        headers: &HeaderMap,
        url: &str,
        name_fmt: &str,
    ) -> Result<Vec<StreamInfo>, ExtractorError>;

    async fn expand_dash(
        &self,
        client: &Client,
        headers: &HeaderMap,
        url: &str,
    ) -> Result<Vec<StreamInfo>, ExtractorError>;
}

/// Fetches and parses manifests over http.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpManifestExpander;

#[async_trait]
impl ManifestExpander for HttpManifestExpander {
    async fn expand_hls(
        &self,
        client: &Client,
        headers: &HeaderMap,
        url: &str,
        name_fmt: &str,
    ) -> Result<Vec<StreamInfo>, ExtractorError> {
        extract_hls_streams(client, headers, url, name_fmt).await
    }

    async fn expand_dash(
        &self,
        client: &Client,
        headers: &HeaderMap,
        url: &str,
    ) -> Result<Vec<StreamInfo>, ExtractorError> {
        extract_dash_streams(client, headers, url).await
    }
}
