use std::fmt;

use serde::Serialize;
use url::Url;

use crate::extractor::error::ExtractorError;

/// Legacy site names and the ids the playlist api knows them by.
pub const CHANNEL_ALIASES: &[(&str, &str)] = &[
    ("chetv", "ctc-che"),
    ("ctclove", "ctc-love"),
    ("domashny", "ctc-dom"),
];

const TOP_LEVEL_DOMAINS: &[&str] = &["ru", "com"];

/// First path segments that mark a live page.
const LIVE_SEGMENTS: &[&str] = &["live", "online"];

/// Maps a site name to its canonical upstream id. Unknown names pass through.
pub fn resolve_alias(id: &str) -> &str {
    CHANNEL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == id)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Channel {
    FirstChannel,
    Ctc,
    Che,
    CtcLove,
    Domashny,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::FirstChannel,
        Channel::Ctc,
        Channel::Che,
        Channel::CtcLove,
        Channel::Domashny,
    ];

    /// Second-level domain the channel is served from.
    pub fn site_name(&self) -> &'static str {
        match self {
            Channel::FirstChannel => "1tv",
            Channel::Ctc => "ctc",
            Channel::Che => "chetv",
            Channel::CtcLove => "ctclove",
            Channel::Domashny => "domashny",
        }
    }

    /// Upstream id used by the playlist api.
    pub fn canonical_id(&self) -> &'static str {
        resolve_alias(self.site_name())
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Channel::FirstChannel => "Первый канал",
            Channel::Ctc => "СТС",
            Channel::Che => "Че",
            Channel::CtcLove => "СТС Love",
            Channel::Domashny => "Домашний",
        }
    }

    pub fn from_site_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.site_name() == name)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_id())
    }
}

/// A page url recognised as one of the channel sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelRequest {
    pub raw_url: String,
    pub channel: Channel,
    /// Canonical id, after alias resolution
    pub channel_id: String,
    pub is_live: bool,
}

/// Classifies a page url.
///
/// The host must be one of the channel sites under `.ru` or `.com`, optionally
/// prefixed with `www.`. A first path segment of `live` or `online` marks the
/// page as live; any other path is on-demand.
pub fn classify(url: &str) -> Result<ChannelRequest, ExtractorError> {
    let parsed = Url::parse(url)?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.port().is_some() {
        return Err(ExtractorError::UnsupportedExtractor);
    }

    let host = parsed
        .host_str()
        .ok_or(ExtractorError::UnsupportedExtractor)?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    let (site, tld) = host
        .split_once('.')
        .ok_or(ExtractorError::UnsupportedExtractor)?;

    if !TOP_LEVEL_DOMAINS.contains(&tld) {
        return Err(ExtractorError::UnsupportedExtractor);
    }
    let channel = Channel::from_site_name(site).ok_or(ExtractorError::UnsupportedExtractor)?;

    let is_live = parsed
        .path_segments()
        .and_then(|mut segments| segments.next())
        .is_some_and(|first| LIVE_SEGMENTS.contains(&first));

    Ok(ChannelRequest {
        raw_url: url.to_string(),
        channel,
        channel_id: channel.canonical_id().to_string(),
        is_live,
    })
}

pub fn can_handle_url(url: &str) -> bool {
    classify(url).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_flag_follows_first_path_segment() {
        for channel in Channel::ALL {
            for tld in ["ru", "com"] {
                for www in ["", "www."] {
                    for (path, live) in [
                        ("", false),
                        ("/", false),
                        ("/live", true),
                        ("/online", true),
                        ("/live/", true),
                        ("/somethingelse", false),
                        ("/shows/vremya/news", false),
                    ] {
                        let url = format!("https://{www}{}.{tld}{path}", channel.site_name());
                        let request = classify(&url).unwrap();
                        assert_eq!(request.is_live, live, "{url}");
                        assert_eq!(request.channel, channel, "{url}");
                    }
                }
            }
        }
    }

    #[test]
    fn aliases_resolve_to_canonical_ids() {
        assert_eq!(classify("https://chetv.ru/online").unwrap().channel_id, "ctc-che");
        assert_eq!(classify("https://ctclove.ru/online").unwrap().channel_id, "ctc-love");
        assert_eq!(classify("https://domashny.ru/online").unwrap().channel_id, "ctc-dom");
        assert_eq!(classify("https://www.1tv.ru/live").unwrap().channel_id, "1tv");
        assert_eq!(classify("https://ctc.ru/online").unwrap().channel_id, "ctc");
    }

    #[test]
    fn alias_table_passes_unknown_ids_through() {
        assert_eq!(resolve_alias("chetv"), "ctc-che");
        assert_eq!(resolve_alias("1tv"), "1tv");
        assert_eq!(resolve_alias("ctc"), "ctc");
        assert_eq!(resolve_alias("muz"), "muz");
    }

    #[test]
    fn scheme_is_irrelevant_for_classification() {
        let plain = classify("http://www.1tv.ru/live").unwrap();
        let secure = classify("https://www.1tv.ru/live").unwrap();
        assert_eq!(plain.channel, secure.channel);
        assert!(plain.is_live && secure.is_live);
    }

    #[test]
    fn foreign_urls_are_rejected() {
        for url in [
            "https://www.twitch.tv/live",
            "https://1tv.de/live",
            "https://news.1tv.ru/live",
            "https://1tv.ru.example.com/live",
            "ftp://1tv.ru/live",
            "https://1tv.ru:8080/live",
            "https://ctc-love.ru/online",
        ] {
            assert!(!can_handle_url(url), "{url}");
        }
        assert!(matches!(
            classify("not a url"),
            Err(ExtractorError::InvalidUrl(_))
        ));
    }
}
