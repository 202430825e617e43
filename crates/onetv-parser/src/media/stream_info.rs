use crate::media::{StreamFormat, formats::MediaFormat};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StreamInfo {
    // Playable url of the stream (manifest url for hls/dash, file url for http)
    pub url: String,
    pub stream_format: StreamFormat,
    pub media_format: MediaFormat,
    // Quality label, e.g. "720p_2500k", "720p", "sd"
    pub quality: String,
    // Bitrate in kbps, 0 when unknown
    pub bitrate: u64,
    pub codec: String,
    pub fps: f64,
    pub extras: Option<serde_json::Value>,
}

impl StreamInfo {
    /// A progressive http stream with nothing known besides its url.
    pub fn http<Q: Into<String>, U: Into<String>>(quality: Q, url: U) -> Self {
        let url = url.into();
        Self {
            media_format: MediaFormat::from_url(&url),
            url,
            stream_format: StreamFormat::Http,
            quality: quality.into(),
            bitrate: 0,
            codec: "".to_string(),
            fps: 0.0,
            extras: None,
        }
    }
}

impl fmt::Display for StreamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bitrate > 0 {
            write!(
                f,
                "{} ({}) - {} [{} kbps]",
                self.stream_format, self.media_format, self.quality, self.bitrate
            )
        } else {
            write!(
                f,
                "{} ({}) - {}",
                self.stream_format, self.media_format, self.quality
            )
        }
    }
}
