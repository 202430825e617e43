use m3u8_rs::{MasterPlaylist, Playlist, VariantStream};
use reqwest::Client;
use reqwest::header::HeaderMap;
use rustc_hash::FxHashMap;
use tracing::debug;
use url::Url;

use super::error::ExtractorError;
use crate::media::{MediaFormat, StreamFormat, stream_info::StreamInfo};

/// Label given to a stream that carries no resolution or bandwidth information.
pub const LIVE_LABEL: &str = "live";

/// Fetches an HLS manifest and expands it into one stream per variant.
///
/// `name_fmt` may use the `{pixels}` (`720p`) and `{bitrate}` (`2500k`) placeholders.
pub async fn extract_hls_streams(
    client: &Client,
    headers: &HeaderMap,
    m3u8_url: &str,
    name_fmt: &str,
) -> Result<Vec<StreamInfo>, ExtractorError> {
    let base_url =
        Url::parse(m3u8_url).map_err(|e| ExtractorError::HlsPlaylistError(e.to_string()))?;

    debug!("Fetching hls playlist: {}", m3u8_url);
    let response = client
        .get(m3u8_url)
        .headers(headers.clone())
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    let playlist = m3u8_rs::parse_playlist_res(&response)
        .map_err(|e| ExtractorError::HlsPlaylistError(e.to_string()))?;

    let streams = match playlist {
        Playlist::MasterPlaylist(pl) => process_master_playlist(pl, &base_url, name_fmt)?,
        Playlist::MediaPlaylist(pl) => {
            let media_format = if pl
                .segments
                .iter()
                .any(|s| s.uri.contains("fmp4") || s.uri.contains(".mp4"))
            {
                MediaFormat::Mp4
            } else {
                MediaFormat::Ts
            };

            vec![StreamInfo {
                url: m3u8_url.to_string(),
                stream_format: StreamFormat::Hls,
                media_format,
                quality: LIVE_LABEL.to_string(),
                bitrate: 0,
                codec: "".to_string(),
                fps: 0.0,
                extras: None,
            }]
        }
    };

    debug!("Expanded {} hls variants", streams.len());
    Ok(streams)
}

fn process_master_playlist(
    playlist: MasterPlaylist,
    base_url: &Url,
    name_fmt: &str,
) -> Result<Vec<StreamInfo>, ExtractorError> {
    let mut seen: FxHashMap<String, u32> = FxHashMap::default();
    playlist
        .variants
        .into_iter()
        .filter(|variant| !variant.is_i_frame)
        .map(|variant| {
            let stream_url = base_url
                .join(&variant.uri)
                .map_err(|e| ExtractorError::HlsPlaylistError(e.to_string()))?;

            // backup variants repeat the label of their primary
            let base = variant_label(&variant, name_fmt);
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            let quality = match *count {
                1 => base,
                2 => format!("{base}_alt"),
                n => format!("{base}_alt{}", n - 1),
            };

            Ok(StreamInfo {
                url: stream_url.to_string(),
                stream_format: StreamFormat::Hls,
                // segments are not fetched here, ts is the common case
                media_format: MediaFormat::Ts,
                quality,
                bitrate: variant.bandwidth / 1000,
                codec: variant.codecs.clone().unwrap_or_default(),
                fps: variant.frame_rate.unwrap_or(0.0),
                extras: None,
            })
        })
        .collect()
}

fn variant_label(variant: &VariantStream, name_fmt: &str) -> String {
    let pixels = variant.resolution.as_ref().map(|r| format!("{}p", r.height));
    let bitrate = (variant.bandwidth > 0).then(|| format!("{}k", variant.bandwidth / 1000));
    format_label(name_fmt, pixels.as_deref(), bitrate.as_deref())
}

/// Fills the name format. Missing values drop their placeholder together with the
/// `_` separator next to it.
pub(crate) fn format_label(name_fmt: &str, pixels: Option<&str>, bitrate: Option<&str>) -> String {
    let label = name_fmt
        .replace("{pixels}", pixels.unwrap_or(""))
        .replace("{bitrate}", bitrate.unwrap_or(""));
    let label = label
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if label.is_empty() {
        LIVE_LABEL.to_string()
    } else {
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = "#EXTM3U
#EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360,CODECS=\"avc1.4d401e,mp4a.40.2\"
360/index.m3u8?s=1
#EXT-X-STREAM-INF:BANDWIDTH=2500000,RESOLUTION=1280x720,FRAME-RATE=25.000
https://edge2.1tv.ru/720/index.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=128000,CODECS=\"mp4a.40.2\"
audio/index.m3u8
";

    #[test]
    fn master_playlist_variants() {
        let Ok((_, Playlist::MasterPlaylist(pl))) = m3u8_rs::parse_playlist(MASTER.as_bytes())
        else {
            panic!("expected master playlist");
        };
        let base = Url::parse("https://edge1.1tv.ru/live/master.m3u8?a=1").unwrap();
        let streams = process_master_playlist(pl, &base, "{pixels}_{bitrate}").unwrap();

        assert_eq!(streams.len(), 3);
        assert_eq!(streams[0].quality, "360p_800k");
        assert_eq!(streams[0].url, "https://edge1.1tv.ru/live/360/index.m3u8?s=1");
        assert_eq!(streams[0].bitrate, 800);
        assert_eq!(streams[0].codec, "avc1.4d401e,mp4a.40.2");
        assert_eq!(streams[1].quality, "720p_2500k");
        assert_eq!(streams[1].url, "https://edge2.1tv.ru/720/index.m3u8");
        assert_eq!(streams[1].fps, 25.0);
        assert_eq!(streams[2].quality, "128k");
    }

    #[test]
    fn repeated_variants_get_alt_labels() {
        let master = "#EXTM3U
#EXT-X-STREAM-INF:BANDWIDTH=2500000,RESOLUTION=1280x720
primary/720.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=2500000,RESOLUTION=1280x720
backup/720.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=2500000,RESOLUTION=1280x720
spare/720.m3u8
";
        let Ok((_, Playlist::MasterPlaylist(pl))) = m3u8_rs::parse_playlist(master.as_bytes())
        else {
            panic!("expected master playlist");
        };
        let base = Url::parse("https://edge.1tv.ru/live/master.m3u8").unwrap();
        let streams = process_master_playlist(pl, &base, "{pixels}_{bitrate}").unwrap();

        let labels: Vec<_> = streams.iter().map(|s| s.quality.as_str()).collect();
        assert_eq!(labels, ["720p_2500k", "720p_2500k_alt", "720p_2500k_alt2"]);
        assert_eq!(streams[0].url, "https://edge.1tv.ru/live/primary/720.m3u8");

        let set: crate::media::StreamSet = streams.into_iter().collect();
        assert_eq!(set.len(), 3);
        assert_eq!(
            set.get("720p_2500k").unwrap().url,
            "https://edge.1tv.ru/live/primary/720.m3u8"
        );
    }

    #[test]
    fn label_format() {
        assert_eq!(
            format_label("{pixels}_{bitrate}", Some("720p"), Some("2500k")),
            "720p_2500k"
        );
        assert_eq!(format_label("{pixels}_{bitrate}", None, Some("128k")), "128k");
        assert_eq!(format_label("{pixels}_{bitrate}", Some("720p"), None), "720p");
        assert_eq!(format_label("{pixels}_{bitrate}", None, None), "live");
    }
}
