use rustc_hash::FxHashMap;

use super::stream_info::StreamInfo;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
/// Everything resolved for one channel page.
///
/// # Fields
///
/// * `site_url` - The page url the resolution started from
/// * `title` - Channel name for live pages, video title for on-demand pages
/// * `channel` - Canonical upstream channel id, e.g. `1tv`, `ctc-love`
/// * `is_live` - Whether the page was classified as a live broadcast
/// * `streams` - Resolved streams in discovery order, labels unique
/// * `extras` - Request headers a player needs to replay the streams
///
/// # Examples
///
/// ```rust
/// use onetv_parser::media::media_info::MediaInfo;
///
/// let media = MediaInfo {
///     site_url: "https://www.1tv.ru/live".to_string(),
///     title: "Первый канал".to_string(),
///     channel: "1tv".to_string(),
///     is_live: true,
///     streams: vec![],
///     extras: None,
/// };
/// assert!(media.streams.is_empty());
/// ```
pub struct MediaInfo {
    pub site_url: String,
    pub title: String,
    pub channel: String,
    pub is_live: bool,
    pub streams: Vec<StreamInfo>,
    pub extras: Option<FxHashMap<String, String>>,
}

impl MediaInfo {
    pub fn new(
        site_url: String,
        title: String,
        channel: String,
        is_live: bool,
        streams: Vec<StreamInfo>,
        extras: Option<FxHashMap<String, String>>,
    ) -> Self {
        Self {
            site_url,
            title,
            channel,
            is_live,
            streams,
            extras,
        }
    }

    pub fn empty() -> Self {
        Self {
            site_url: "".to_string(),
            title: "".to_string(),
            channel: "".to_string(),
            is_live: false,
            streams: vec![],
            extras: None,
        }
    }

    pub fn stream(&self, quality: &str) -> Option<&StreamInfo> {
        self.streams.iter().find(|s| s.quality == quality)
    }
}
