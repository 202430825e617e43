use super::error::ExtractorError;
use super::platform_extractor::PlatformExtractor;
use crate::extractor::platforms::onetv::{self, OneTv};
use reqwest::Client;

// A type alias for a thread-safe constructor function.
type ExtractorConstructor = fn(
    String,
    Client,
    Option<serde_json::Value>,
) -> Result<Box<dyn PlatformExtractor>, ExtractorError>;

struct PlatformEntry {
    name: &'static str,
    url_pattern: &'static str,
    matcher: fn(&str) -> bool,
    constructor: ExtractorConstructor,
}

macro_rules! create_constructor {
    ($name:ident, $builder:expr) => {
        fn $name(
            url: String,
            client: Client,
            extras: Option<serde_json::Value>,
        ) -> Result<Box<dyn PlatformExtractor>, ExtractorError> {
            let extractor: Box<dyn PlatformExtractor> = Box::new($builder(url, client, extras)?);
            Ok(extractor)
        }
    };
}

create_constructor!(new_onetv, OneTv::new);

// Static platform registry
static PLATFORMS: &[PlatformEntry] = &[PlatformEntry {
    name: "1tv / CTC",
    url_pattern: "(www.)?{1tv,ctc,chetv,ctclove,domashny}.{ru,com}/[live|online]",
    matcher: onetv::can_handle_url,
    constructor: new_onetv,
}];

/// A factory for creating site-specific extractors.
#[derive(Debug, Clone)]
pub struct ExtractorFactory {
    client: Client,
}

impl ExtractorFactory {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn can_handle(&self, url: &str) -> bool {
        PLATFORMS.iter().any(|p| (p.matcher)(url))
    }

    /// Name and url pattern of every registered site.
    pub fn supported_platforms(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        PLATFORMS.iter().map(|p| (p.name, p.url_pattern))
    }

    pub fn create_extractor(
        &self,
        url: &str,
        extras: Option<serde_json::Value>,
    ) -> Result<Box<dyn PlatformExtractor>, ExtractorError> {
        PLATFORMS
            .iter()
            .find(|p| (p.matcher)(url))
            .ok_or(ExtractorError::UnsupportedExtractor)
            .and_then(|p| (p.constructor)(url.to_string(), self.client.clone(), extras))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_urls_are_rejected() {
        let factory = ExtractorFactory::new(Client::new());
        assert!(!factory.can_handle("https://www.twitch.tv/someone"));
        assert!(matches!(
            factory.create_extractor("https://www.twitch.tv/someone", None),
            Err(ExtractorError::UnsupportedExtractor)
        ));
    }

    #[test]
    fn channel_sites_are_accepted() {
        let factory = ExtractorFactory::new(Client::new());
        for url in [
            "https://www.1tv.ru/live",
            "http://ctc.ru/online",
            "https://domashny.com/shows/",
        ] {
            assert!(factory.can_handle(url), "{url}");
            let extractor = factory.create_extractor(url, None).unwrap();
            assert_eq!(extractor.get_extractor().url, url);
        }
    }
}
