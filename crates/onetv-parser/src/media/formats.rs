use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Delivery protocol of a resolved stream.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamFormat {
    Hls,
    Dash,
    Http,
}

impl StreamFormat {
    pub fn as_str(&self) -> &str {
        match self {
            StreamFormat::Hls => "hls",
            StreamFormat::Dash => "dash",
            StreamFormat::Http => "http",
        }
    }
}

impl Display for StreamFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StreamFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hls" => Ok(StreamFormat::Hls),
            "dash" | "mpd" => Ok(StreamFormat::Dash),
            "http" | "https" => Ok(StreamFormat::Http),
            _ => Err(()),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaFormat {
    Ts,
    Mp4,
    Unknown,
}

impl MediaFormat {
    pub fn as_str(&self) -> &str {
        match self {
            MediaFormat::Ts => "ts",
            MediaFormat::Mp4 => "mp4",
            MediaFormat::Unknown => "unknown",
        }
    }

    pub fn from_extension(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "ts" => MediaFormat::Ts,
            "fmp4" | "mp4" | "m4v" | "m4s" => MediaFormat::Mp4,
            _ => MediaFormat::Unknown,
        }
    }

    /// Guess the container from the last path segment of a url, ignoring the query.
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        path.rsplit('/')
            .next()
            .and_then(|file| file.rsplit_once('.'))
            .map(|(_, ext)| Self::from_extension(ext))
            .unwrap_or(MediaFormat::Unknown)
    }
}

impl Display for MediaFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ts" => Ok(MediaFormat::Ts),
            "fmp4" | "mp4" => Ok(MediaFormat::Mp4),
            "unknown" => Ok(MediaFormat::Unknown),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_format_from_url() {
        assert_eq!(
            MediaFormat::from_url("https://cdn.1tv.ru/v/a_720.mp4?token=1"),
            MediaFormat::Mp4
        );
        assert_eq!(MediaFormat::from_url("//cdn/seg.ts"), MediaFormat::Ts);
        assert_eq!(
            MediaFormat::from_url("https://cdn.1tv.ru/stream"),
            MediaFormat::Unknown
        );
    }

    #[test]
    fn stream_format_parse() {
        assert_eq!("MPD".parse::<StreamFormat>(), Ok(StreamFormat::Dash));
        assert_eq!("hls".parse::<StreamFormat>(), Ok(StreamFormat::Hls));
        assert!("flv".parse::<StreamFormat>().is_err());
    }
}
