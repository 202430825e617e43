use std::ops::RangeInclusive;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::channel::{Channel, ChannelRequest, classify};
use crate::{
    extractor::{
        error::ExtractorError,
        manifest::{HttpManifestExpander, ManifestExpander},
        platform_extractor::{Extractor, PlatformExtractor},
        utils::{choose_mirror, update_scheme},
    },
    media::{MediaInfo, StreamSet, StreamWeight, stream_weight},
};

/// Scheme-less api locations. The scheme of the page url is applied on use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OneTvEndpoints {
    /// Playlist of the 1tv broadcast
    pub first_channel_api: String,
    /// Playlist template of the CTC family, `{channel}` is the canonical id
    pub ctc_api: String,
    /// One-time tokens for the hls manifests
    pub session_api: String,
    /// Absolute url fetched for on-demand data instead of the request url
    pub page: Option<String>,
}

impl Default for OneTvEndpoints {
    fn default() -> Self {
        Self {
            first_channel_api: "//stream.1tv.ru/api/playlist/1tvch_as_array.json".to_string(),
            ctc_api: "//media.1tv.ru/api/v1/ctc/playlist/{channel}_as_array.json".to_string(),
            session_api: "//stream.1tv.ru/get_hls_session".to_string(),
            page: None,
        }
    }
}

pub struct OneTv {
    pub extractor: Extractor,
    pub(super) request: ChannelRequest,
    pub(super) endpoints: OneTvEndpoints,
    rng: Mutex<StdRng>,
    pub(super) expander: Arc<dyn ManifestExpander>,
}

impl OneTv {
    pub(super) const LIVE_NAME_FMT: &'static str = "{pixels}_{bitrate}";
    pub(super) const CACHE_BUST_PARAM: &'static str = "r";
    const CACHE_BUST_RANGE: RangeInclusive<u32> = 1..=100_000;

    // Site specific labels, placed among the pixel labels of the manifests.
    const PINNED_WEIGHTS: &'static [(&'static str, f64)] =
        &[("ld", 140.0), ("sd", 360.0), ("hd", 720.0)];

    /// `extras` may override any field of [`OneTvEndpoints`].
    pub fn new(
        url: String,
        client: Client,
        extras: Option<serde_json::Value>,
    ) -> Result<Self, ExtractorError> {
        let request = classify(&url)?;
        let endpoints = match extras {
            Some(extras) => serde_json::from_value(extras)?,
            None => OneTvEndpoints::default(),
        };

        let mut extractor = Extractor::new(request.channel.site_name(), url, client);
        extractor.add_header(reqwest::header::REFERER, &request.raw_url);

        Ok(Self {
            extractor,
            request,
            endpoints,
            rng: Mutex::new(StdRng::from_os_rng()),
            expander: Arc::new(HttpManifestExpander),
        })
    }

    pub fn with_endpoints(mut self, endpoints: OneTvEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Replaces the source of randomness used for mirror choice and cache busting.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn with_expander(mut self, expander: Arc<dyn ManifestExpander>) -> Self {
        self.expander = expander;
        self
    }

    pub fn request(&self) -> &ChannelRequest {
        &self.request
    }

    pub fn channel(&self) -> Channel {
        self.request.channel
    }

    pub fn is_live(&self) -> bool {
        self.request.is_live
    }

    /// Quality ranking: `ld`, `sd` and `hd` sit at 140, 360 and 720 pixels, every
    /// other label is weighed generically.
    pub fn quality_weight(quality: &str) -> StreamWeight {
        Self::PINNED_WEIGHTS
            .iter()
            .find(|(label, _)| *label == quality)
            .map(|(_, pixels)| StreamWeight::pixels(*pixels))
            .unwrap_or_else(|| stream_weight(quality))
    }

    /// Absolute playlist api url for the requested channel.
    pub fn live_api_url(&self) -> Result<String, ExtractorError> {
        let url = match self.request.channel {
            Channel::FirstChannel => self.endpoints.first_channel_api.clone(),
            _ => self
                .endpoints
                .ctc_api
                .replace("{channel}", &self.request.channel_id),
        };
        update_scheme(&self.request.raw_url, &url)
    }

    pub(super) fn pick_mirror(&self, mirrors: Option<&[String]>) -> Option<String> {
        let mirrors = mirrors?;
        let mut rng = self.rng.lock();
        choose_mirror(&mut *rng, mirrors).map(str::to_string)
    }

    pub(super) fn cache_buster(&self) -> u32 {
        self.rng.lock().random_range(Self::CACHE_BUST_RANGE)
    }

    /// Resolves the page into its streams: hls variants, then dash variants for live
    /// pages, progressive files for on-demand pages.
    pub async fn resolve(&self) -> Result<StreamSet, ExtractorError> {
        Ok(self.resolve_titled().await?.1)
    }

    async fn resolve_titled(&self) -> Result<(String, StreamSet), ExtractorError> {
        let channel = self.request.channel;
        if self.request.is_live {
            debug!("Loading live stream for {}...", channel);
            let streams = self.live_streams().await?;
            return Ok((channel.display_name().to_string(), streams));
        }

        if channel != Channel::FirstChannel {
            debug!("No on-demand data source for {}", channel);
            return Ok((channel.display_name().to_string(), StreamSet::new()));
        }

        debug!("Attempting to find VOD stream for {}...", channel);
        let page_url = self.endpoints.page.as_deref().unwrap_or(&self.extractor.url);
        match self.vod_streams(page_url).await? {
            Some(vod) => Ok((vod.title, vod.streams)),
            None => Ok((channel.display_name().to_string(), StreamSet::new())),
        }
    }
}

#[async_trait]
impl PlatformExtractor for OneTv {
    fn get_extractor(&self) -> &Extractor {
        &self.extractor
    }

    async fn extract(&self) -> Result<MediaInfo, ExtractorError> {
        let (title, streams) = self.resolve_titled().await?;

        Ok(MediaInfo {
            site_url: self.extractor.url.clone(),
            title,
            channel: self.request.channel_id.clone(),
            is_live: self.request.is_live,
            streams: streams.into_streams(),
            extras: Some(self.extractor.get_platform_headers_map()),
        })
    }

    fn stream_weight(&self, quality: &str) -> StreamWeight {
        Self::quality_weight(quality)
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use tracing::Level;

    use super::*;
    use crate::extractor::default::default_client;
    use crate::media::compare_weights;

    fn onetv(url: &str) -> OneTv {
        OneTv::new(url.to_string(), Client::new(), None).unwrap()
    }

    #[test]
    fn pinned_labels_rank_among_pixel_labels() {
        let w = OneTv::quality_weight;
        assert_eq!(compare_weights(&w("ld"), &w("sd")), Ordering::Less);
        assert_eq!(compare_weights(&w("sd"), &w("hd")), Ordering::Less);
        assert_eq!(compare_weights(&w("sd"), &w("480p")), Ordering::Less);
        assert_eq!(compare_weights(&w("hd"), &w("1080p")), Ordering::Less);
        assert_eq!(compare_weights(&w("360p"), &w("hd")), Ordering::Less);
        assert_eq!(w("720p_2500k"), stream_weight("720p_2500k"));
    }

    #[test]
    fn ranking_is_exposed_through_the_extractor() {
        let extractor: Box<dyn PlatformExtractor> = Box::new(onetv("https://www.1tv.ru/live"));
        assert_eq!(extractor.stream_weight("sd"), StreamWeight::pixels(360.0));
        assert_eq!(extractor.stream_weight("480p"), StreamWeight::pixels(480.0));
    }

    #[test]
    fn live_api_url_per_channel() {
        assert_eq!(
            onetv("https://www.1tv.ru/live").live_api_url().unwrap(),
            "https://stream.1tv.ru/api/playlist/1tvch_as_array.json"
        );
        assert_eq!(
            onetv("http://ctclove.ru/online").live_api_url().unwrap(),
            "http://media.1tv.ru/api/v1/ctc/playlist/ctc-love_as_array.json"
        );
        assert_eq!(
            onetv("https://www.domashny.com/online").live_api_url().unwrap(),
            "https://media.1tv.ru/api/v1/ctc/playlist/ctc-dom_as_array.json"
        );
    }

    #[test]
    fn endpoints_from_extras() {
        let tv = OneTv::new(
            "https://www.1tv.ru/live".to_string(),
            Client::new(),
            Some(serde_json::json!({ "session_api": "//127.0.0.1:9000/session" })),
        )
        .unwrap();
        assert_eq!(tv.endpoints.session_api, "//127.0.0.1:9000/session");
        assert_eq!(
            tv.endpoints.first_channel_api,
            OneTvEndpoints::default().first_channel_api
        );
    }

    #[test]
    fn cache_buster_stays_in_range() {
        let tv = onetv("https://www.1tv.ru/live").with_rng(StdRng::seed_from_u64(1));
        for _ in 0..1000 {
            assert!(OneTv::CACHE_BUST_RANGE.contains(&tv.cache_buster()));
        }
    }

    #[test]
    fn rejects_foreign_url() {
        assert!(matches!(
            OneTv::new("https://example.com/live".to_string(), Client::new(), None),
            Err(ExtractorError::UnsupportedExtractor)
        ));
    }

    #[tokio::test]
    #[ignore]
    async fn test_onetv_live() {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .init();

        let tv = OneTv::new(
            "https://www.1tv.ru/live".to_string(),
            default_client().unwrap(),
            None,
        )
        .unwrap();

        let media_info = tv.extract().await.unwrap();
        println!("{media_info:?}");
        assert!(media_info.is_live);
    }
}
