use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};
use url::Url;

use super::builder::OneTv;
use super::models::VodEntry;
use crate::{
    extractor::{error::ExtractorError, utils::update_scheme},
    media::{StreamInfo, StreamSet},
};

static VOD_DATA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"/video_materials\.json[^'"]*"#).unwrap());

/// The default video of an on-demand page.
#[derive(Debug, Clone)]
pub struct VodStreams {
    pub title: String,
    pub streams: StreamSet,
}

/// Finds the first `video_materials.json` reference in page markup.
pub fn find_vod_data_path(page: &str) -> Option<&str> {
    VOD_DATA_REGEX.find(page).map(|m| m.as_str())
}

impl OneTv {
    /// Loads the data listing referenced by the page at `page_url`.
    ///
    /// Returns `None` when the page references no listing. Only the page's default
    /// video is resolved.
    pub async fn vod_data(&self, page_url: &str) -> Result<Option<VodEntry>, ExtractorError> {
        let page = self
            .extractor
            .get(page_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let Some(path) = find_vod_data_path(&page) else {
            debug!("No VOD data url on {}", page_url);
            return Ok(None);
        };

        let data_url = Url::parse(page_url)?.join(path)?;
        debug!("Found VOD data url: {}", data_url);

        let body = self
            .extractor
            .get(data_url.as_str())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let listing: Vec<serde_json::Value> = serde_json::from_str(&body)?;
        let first = listing.into_iter().next().ok_or_else(|| {
            ExtractorError::ValidationError("video_materials listing is empty".to_string())
        })?;

        Ok(Some(serde_json::from_value(first)?))
    }

    /// Resolves the default video of an on-demand page into one progressive stream
    /// per listed bitrate.
    pub async fn vod_streams(&self, page_url: &str) -> Result<Option<VodStreams>, ExtractorError> {
        let Some(entry) = self.vod_data(page_url).await? else {
            return Ok(None);
        };
        info!("Found VOD: {}", entry.title);

        let mut streams = StreamSet::new();
        for bitrate in entry.mbr {
            let url = update_scheme(&self.request.raw_url, &bitrate.src)?;
            streams.insert(StreamInfo::http(bitrate.name, url));
        }

        Ok(Some(VodStreams {
            title: entry.title,
            streams,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_first_reference() {
        let page = r#"<div data-url="/video_materials.json?collection_id=1&amp;video_id=2"></div>
            <div data-url='/video_materials.json?collection_id=9'></div>"#;
        assert_eq!(
            find_vod_data_path(page),
            Some("/video_materials.json?collection_id=1&amp;video_id=2")
        );
    }

    #[test]
    fn reference_may_be_nested_in_a_path() {
        let page = r#"src="//www.1tv.ru/shows/vremya/video_materials.json?x=1""#;
        assert_eq!(find_vod_data_path(page), Some("/video_materials.json?x=1"));
    }

    #[test]
    fn no_reference() {
        assert_eq!(find_vod_data_path("<html>video_materials</html>"), None);
    }
}
