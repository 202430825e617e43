use tracing::debug;

use super::builder::OneTv;
use super::models::LivePlaylist;
use crate::{extractor::error::ExtractorError, media::StreamSet};

impl OneTv {
    /// Fetches the playlist document of the channel's live broadcast.
    pub async fn live_playlist(&self) -> Result<LivePlaylist, ExtractorError> {
        let api_url = self.live_api_url()?;
        let body = self
            .extractor
            .get(&api_url)
            .query(&[(Self::CACHE_BUST_PARAM, self.cache_buster())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(serde_json::from_str(&body)?)
    }

    /// Resolves the live broadcast into hls variants followed by dash variants.
    ///
    /// One mirror is picked per protocol. Hls manifests need session tokens, dash
    /// manifests are fetched as is. A playlist without mirrors yields no streams.
    pub async fn live_streams(&self) -> Result<StreamSet, ExtractorError> {
        let playlist = self.live_playlist().await?;
        let client = &self.extractor.client;
        let headers = self.extractor.get_platform_headers();
        let mut streams = StreamSet::new();

        if let Some(url) = self.pick_mirror(playlist.hls.as_deref()) {
            let session = self.hls_session().await?;
            let url = session.apply(&url)?;
            debug!("Using hls manifest: {}", url);
            let variants = self
                .expander
                .expand_hls(client, headers, &url, Self::LIVE_NAME_FMT)
                .await?;
            streams.extend(variants);
        }

        if let Some(url) = self.pick_mirror(playlist.mpd.as_deref()) {
            debug!("Using dash manifest: {}", url);
            let variants = self.expander.expand_dash(client, headers, &url).await?;
            streams.extend(variants);
        }

        if streams.is_empty() {
            debug!("No live streams offered for {}", self.request.channel);
        }
        Ok(streams)
    }
}
