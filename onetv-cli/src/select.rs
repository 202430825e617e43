use crate::error::{CliError, Result};
use onetv_parser::media::{StreamInfo, StreamWeight, compare_weights};
#[cfg(feature = "regex-filters")]
use regex::Regex;

pub const BEST: &str = "best";
pub const WORST: &str = "worst";

/// Sorts streams from worst to best. Streams of equal weight keep discovery order.
pub fn rank_streams<F>(streams: &mut [StreamInfo], weight: F)
where
    F: Fn(&str) -> StreamWeight,
{
    streams.sort_by(|a, b| compare_weights(&weight(&a.quality), &weight(&b.quality)));
}

/// Keeps the streams whose format matches `pattern`.
pub fn filter_format(streams: Vec<StreamInfo>, pattern: &str) -> Result<Vec<StreamInfo>> {
    #[cfg(feature = "regex-filters")]
    {
        let format_regex = Regex::new(pattern)
            .map_err(|e| CliError::invalid_filter(format!("Invalid format regex: {e}")))?;
        Ok(streams
            .into_iter()
            .filter(|s| format_regex.is_match(s.stream_format.as_str()))
            .collect())
    }

    #[cfg(not(feature = "regex-filters"))]
    {
        // Fallback: simple substring matching
        Ok(streams
            .into_iter()
            .filter(|s| s.stream_format.as_str().contains(pattern))
            .collect())
    }
}

/// Index of the first candidate of a comma separated selector present in `ranked`.
pub fn pick(ranked: &[StreamInfo], selector: &str) -> Option<usize> {
    if ranked.is_empty() {
        return None;
    }

    selector
        .split(',')
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .find_map(|candidate| match candidate {
            BEST => Some(ranked.len() - 1),
            WORST => Some(0),
            label => ranked.iter().position(|s| s.quality == label),
        })
}
