use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("unsupported extractor")]
    UnsupportedExtractor,
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("hls playlist error: {0}")]
    HlsPlaylistError(String),
    #[error("dash manifest error: {0}")]
    DashManifestError(String),
    #[error("tls error: {0}")]
    TlsError(#[from] rustls::Error),
    #[error("other error: {0}")]
    Other(String),
}

impl From<url::ParseError> for ExtractorError {
    fn from(e: url::ParseError) -> Self {
        ExtractorError::InvalidUrl(e.to_string())
    }
}
