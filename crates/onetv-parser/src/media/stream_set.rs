use rustc_hash::FxHashMap;

use super::stream_info::StreamInfo;

/// Ordered collection of resolved streams keyed by quality label.
///
/// Entries keep the position of their first insertion. Inserting a label that is
/// already present replaces the stored stream (last write wins), so labels stay
/// unique within one resolution.
#[derive(Debug, Clone, Default)]
pub struct StreamSet {
    entries: Vec<StreamInfo>,
    index: FxHashMap<String, usize>,
}

impl StreamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a stream under its own quality label, returning the stream it replaced.
    pub fn insert(&mut self, stream: StreamInfo) -> Option<StreamInfo> {
        match self.index.get(&stream.quality) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos], stream)),
            None => {
                self.index.insert(stream.quality.clone(), self.entries.len());
                self.entries.push(stream);
                None
            }
        }
    }

    pub fn get(&self, quality: &str) -> Option<&StreamInfo> {
        self.index.get(quality).map(|&pos| &self.entries[pos])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|s| s.quality.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StreamInfo> {
        self.entries.iter()
    }

    pub fn into_streams(self) -> Vec<StreamInfo> {
        self.entries
    }
}

impl Extend<StreamInfo> for StreamSet {
    fn extend<T: IntoIterator<Item = StreamInfo>>(&mut self, iter: T) {
        for stream in iter {
            self.insert(stream);
        }
    }
}

impl FromIterator<StreamInfo> for StreamSet {
    fn from_iter<T: IntoIterator<Item = StreamInfo>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for StreamSet {
    type Item = (String, StreamInfo);
    type IntoIter = std::iter::Map<std::vec::IntoIter<StreamInfo>, fn(StreamInfo) -> Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        fn pair(stream: StreamInfo) -> (String, StreamInfo) {
            (stream.quality.clone(), stream)
        }
        self.entries
            .into_iter()
            .map(pair as fn(StreamInfo) -> (String, StreamInfo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_discovery_order() {
        let set: StreamSet = ["720p", "360p", "1080p"]
            .into_iter()
            .map(|q| StreamInfo::http(q, format!("https://cdn/{q}.mp4")))
            .collect();

        assert_eq!(set.labels().collect::<Vec<_>>(), ["720p", "360p", "1080p"]);
    }

    #[test]
    fn colliding_label_is_last_write_wins() {
        let mut set = StreamSet::new();
        set.insert(StreamInfo::http("720p", "https://cdn/a.mp4"));
        set.insert(StreamInfo::http("360p", "https://cdn/b.mp4"));
        let replaced = set.insert(StreamInfo::http("720p", "https://cdn/c.mp4"));

        assert_eq!(replaced.map(|s| s.url), Some("https://cdn/a.mp4".to_string()));
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("720p").unwrap().url, "https://cdn/c.mp4");

        let pairs: Vec<(String, StreamInfo)> = set.into_iter().collect();
        assert_eq!(pairs[0].0, "720p");
        assert_eq!(pairs[0].1.url, "https://cdn/c.mp4");
        assert_eq!(pairs[1].0, "360p");
    }
}
