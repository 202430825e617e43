use serde::Deserialize;

/// Response of the live playlist api. Every url of one list serves the same
/// broadcast from a different edge server.
#[derive(Debug, Default, Deserialize)]
pub struct LivePlaylist {
    #[serde(default)]
    pub hls: Option<Vec<String>>,
    #[serde(default)]
    pub mpd: Option<Vec<String>>,
}

/// First element of a `video_materials.json` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct VodEntry {
    pub title: String,
    pub mbr: Vec<VodBitrate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VodBitrate {
    pub name: String,
    pub src: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_lists_are_optional() {
        let empty: LivePlaylist = serde_json::from_str("{}").unwrap();
        assert!(empty.hls.is_none() && empty.mpd.is_none());

        let nulls: LivePlaylist = serde_json::from_str(r#"{"hls": null, "mpd": []}"#).unwrap();
        assert!(nulls.hls.is_none());
        assert_eq!(nulls.mpd, Some(vec![]));
    }

    #[test]
    fn vod_entry_requires_title_and_bitrates() {
        let entry: VodEntry = serde_json::from_str(
            r#"{"title":"Время","id":42,"mbr":[{"name":"sd","src":"//cdn/a.mp4","bitrate":900}]}"#,
        )
        .unwrap();
        assert_eq!(entry.title, "Время");
        assert_eq!(entry.mbr[0].name, "sd");

        assert!(serde_json::from_str::<VodEntry>(r#"{"title":"T"}"#).is_err());
    }
}
