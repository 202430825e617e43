use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use reqwest::Client;
use reqwest::header::HeaderMap;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::error::ExtractorError;
use crate::media::{MediaFormat, StreamFormat, stream_info::StreamInfo};

#[derive(Debug, Default, Clone)]
struct AdaptationSet {
    mime_type: Option<String>,
    content_type: Option<String>,
    codecs: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Kind {
    Video,
    Audio,
    Other,
}

#[derive(Debug, Clone)]
struct Representation {
    id: String,
    kind: Kind,
    bandwidth: u64,
    height: Option<u64>,
    codecs: String,
    fps: f64,
    mime_type: Option<String>,
}

/// Fetches a DASH manifest and expands it into one stream per video representation,
/// or per audio representation when the manifest carries no video.
pub async fn extract_dash_streams(
    client: &Client,
    headers: &HeaderMap,
    mpd_url: &str,
) -> Result<Vec<StreamInfo>, ExtractorError> {
    debug!("Fetching dash manifest: {}", mpd_url);
    let body = client
        .get(mpd_url)
        .headers(headers.clone())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let representations = parse_representations(&body)?;
    let streams = build_streams(representations, mpd_url);
    debug!("Expanded {} dash representations", streams.len());
    Ok(streams)
}

fn attributes(e: &BytesStart) -> Result<FxHashMap<String, String>, ExtractorError> {
    let mut attrs = FxHashMap::default();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| ExtractorError::DashManifestError(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| ExtractorError::DashManifestError(e.to_string()))?;
        attrs.insert(key, value.into_owned());
    }
    Ok(attrs)
}

fn parse_frame_rate(value: &str) -> f64 {
    match value.split_once('/') {
        Some((num, den)) => match (num.parse::<f64>(), den.parse::<f64>()) {
            (Ok(num), Ok(den)) if den != 0.0 => num / den,
            _ => 0.0,
        },
        None => value.parse().unwrap_or(0.0),
    }
}

fn kind_of(hint: Option<&str>, height: Option<u64>) -> Kind {
    match hint {
        Some(h) if h.starts_with("video") => Kind::Video,
        Some(h) if h.starts_with("audio") => Kind::Audio,
        _ if height.is_some() => Kind::Video,
        _ => Kind::Other,
    }
}

/// Collects the representations of the first period.
fn parse_representations(content: &str) -> Result<Vec<Representation>, ExtractorError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut representations = Vec::new();
    let mut adaptation = AdaptationSet::default();
    let mut saw_mpd = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExtractorError::DashManifestError(e.to_string()))?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                b"MPD" => saw_mpd = true,
                b"AdaptationSet" => {
                    let mut attrs = attributes(e)?;
                    adaptation = AdaptationSet {
                        mime_type: attrs.remove("mimeType"),
                        content_type: attrs.remove("contentType"),
                        codecs: attrs.remove("codecs"),
                    };
                }
                b"Representation" => {
                    let mut attrs = attributes(e)?;
                    let height = attrs.get("height").and_then(|h| h.parse().ok());
                    let mime_type = attrs
                        .remove("mimeType")
                        .or_else(|| adaptation.mime_type.clone());
                    let hint = mime_type
                        .clone()
                        .or_else(|| adaptation.content_type.clone());

                    representations.push(Representation {
                        id: attrs.remove("id").unwrap_or_default(),
                        kind: kind_of(hint.as_deref(), height),
                        bandwidth: attrs
                            .get("bandwidth")
                            .and_then(|b| b.parse().ok())
                            .unwrap_or(0),
                        height,
                        codecs: attrs
                            .remove("codecs")
                            .or_else(|| adaptation.codecs.clone())
                            .unwrap_or_default(),
                        fps: attrs
                            .get("frameRate")
                            .map(|f| parse_frame_rate(f))
                            .unwrap_or(0.0),
                        mime_type,
                    });
                }
                _ => {}
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"AdaptationSet" => adaptation = AdaptationSet::default(),
                b"Period" => break,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_mpd {
        return Err(ExtractorError::DashManifestError(
            "document has no MPD element".to_string(),
        ));
    }

    Ok(representations)
}

fn media_format(rep: &Representation) -> MediaFormat {
    match rep.mime_type.as_deref() {
        Some(m) if m.ends_with("mp4") => MediaFormat::Mp4,
        Some(m) if m.ends_with("mp2t") => MediaFormat::Ts,
        _ => MediaFormat::Unknown,
    }
}

fn build_streams(representations: Vec<Representation>, mpd_url: &str) -> Vec<StreamInfo> {
    let best_audio = representations
        .iter()
        .filter(|r| r.kind == Kind::Audio)
        .max_by_key(|r| r.bandwidth)
        .map(|r| r.id.clone());

    let has_video = representations.iter().any(|r| r.kind == Kind::Video);
    let wanted = if has_video { Kind::Video } else { Kind::Audio };

    let mut seen: FxHashMap<String, u32> = FxHashMap::default();
    representations
        .into_iter()
        .filter(|r| r.kind == wanted)
        .map(|rep| {
            let kbps = rep.bandwidth / 1000;
            let base = match (&rep.kind, rep.height) {
                (Kind::Video, Some(height)) => format!("{height}p"),
                (Kind::Video, None) => format!("{kbps}k"),
                _ => format!("a{kbps}k"),
            };

            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            let quality = match *count {
                1 => base,
                2 => format!("{base}_alt"),
                n => format!("{base}_alt{}", n - 1),
            };

            let mut extras = serde_json::json!({ "representation": rep.id });
            if rep.kind == Kind::Video {
                if let Some(audio) = &best_audio {
                    extras["audio_representation"] = serde_json::Value::from(audio.clone());
                }
            }

            StreamInfo {
                url: mpd_url.to_string(),
                stream_format: StreamFormat::Dash,
                media_format: media_format(&rep),
                quality,
                bitrate: kbps,
                codec: rep.codecs,
                fps: rep.fps,
                extras: Some(extras),
            }
        })
        .collect()
}
