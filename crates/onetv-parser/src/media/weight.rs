use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Unit a quality weight is expressed in. Weights of different dimensions are not
/// comparable by value.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Pixels,
    Bitrate,
    None,
}

impl Dimension {
    fn rank(self) -> u8 {
        match self {
            Dimension::None => 0,
            Dimension::Bitrate => 1,
            Dimension::Pixels => 2,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Pixels => write!(f, "pixels"),
            Dimension::Bitrate => write!(f, "bitrate"),
            Dimension::None => write!(f, "none"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct StreamWeight {
    pub weight: f64,
    pub dimension: Dimension,
}

impl StreamWeight {
    pub const fn pixels(weight: f64) -> Self {
        Self {
            weight,
            dimension: Dimension::Pixels,
        }
    }

    pub const fn bitrate(weight: f64) -> Self {
        Self {
            weight,
            dimension: Dimension::Bitrate,
        }
    }

    pub const fn none() -> Self {
        Self {
            weight: 0.0,
            dimension: Dimension::None,
        }
    }
}

const BIT_RATE_WEIGHT_RATIO: f64 = 2.8;
const ALT_WEIGHT_MOD: f64 = 0.01;

// Named qualities some sites use instead of numeric labels, weighed as the pixel
// label they stand for.
const NAMED_WEIGHTS: &[(&str, f64)] = &[
    ("live", 1080.0),
    ("hd", 1080.0),
    ("sd", 576.0),
    ("ehq", 720.0),
    ("hq", 576.0),
    ("sq", 360.0),
];

static LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(k|p)?(\d+)?(\+)?(?:[a_](\d+)k)?(?:_(alt)(\d)?)?$").unwrap()
});

/// Generic weight of a quality label.
///
/// `720p`, `720p60`, `1080p+`, `720p_2500k` weigh in pixels, `2500k` in bitrate.
/// `_alt`/`_altN` suffixes rank slightly below the plain label.
/// Anything unrecognised weighs zero with [`Dimension::None`].
pub fn stream_weight(label: &str) -> StreamWeight {
    if let Some((_, pixels)) = NAMED_WEIGHTS.iter().find(|(name, _)| *name == label) {
        return StreamWeight::pixels(*pixels);
    }

    let Some(caps) = LABEL_REGEX.captures(label) else {
        return StreamWeight::none();
    };

    let number = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    let mut weight = 0.0;
    if caps.get(6).is_some() {
        weight -= match caps.get(7) {
            Some(_) => ALT_WEIGHT_MOD * number(7),
            None => ALT_WEIGHT_MOD,
        };
    }

    match caps.get(2).map(|m| m.as_str()) {
        Some("k") => StreamWeight::bitrate(weight + number(1)),
        Some("p") => {
            weight += number(1) + number(3);
            if caps.get(4).is_some() {
                weight += 1.0;
            }
            weight += number(5) / BIT_RATE_WEIGHT_RATIO;
            StreamWeight::pixels(weight)
        }
        _ => StreamWeight::none(),
    }
}

/// Total order over weights: unknown labels sort lowest, then bitrate-only labels,
/// then pixel labels; inside one dimension by weight.
pub fn compare_weights(a: &StreamWeight, b: &StreamWeight) -> Ordering {
    a.dimension
        .rank()
        .cmp(&b.dimension.rank())
        .then_with(|| a.weight.total_cmp(&b.weight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_labels() {
        assert_eq!(stream_weight("720p"), StreamWeight::pixels(720.0));
        assert_eq!(stream_weight("720p60"), StreamWeight::pixels(780.0));
        assert_eq!(stream_weight("1080p+"), StreamWeight::pixels(1081.0));

        let w = stream_weight("720p_2800k");
        assert_eq!(w.dimension, Dimension::Pixels);
        assert!((w.weight - 1720.0).abs() < 1e-9);
    }

    #[test]
    fn bitrate_and_unknown_labels() {
        assert_eq!(stream_weight("2500k"), StreamWeight::bitrate(2500.0));
        assert_eq!(stream_weight("audio_only"), StreamWeight::none());
        assert_eq!(stream_weight("1080"), StreamWeight::none());
    }

    #[test]
    fn alt_labels_rank_below_plain() {
        let plain = stream_weight("720p");
        let alt = stream_weight("720p_alt");
        let alt2 = stream_weight("720p_alt2");
        assert_eq!(compare_weights(&alt, &plain), Ordering::Less);
        assert_eq!(compare_weights(&alt2, &alt), Ordering::Less);
    }

    #[test]
    fn named_labels() {
        assert_eq!(stream_weight("live"), StreamWeight::pixels(1080.0));
        assert_eq!(stream_weight("sd"), StreamWeight::pixels(576.0));
        assert_eq!(stream_weight("ehq"), StreamWeight::pixels(720.0));
        assert_eq!(stream_weight("sq"), StreamWeight::pixels(360.0));
    }

    #[test]
    fn named_labels_share_the_pixel_scale() {
        let cmp = |a, b| compare_weights(&stream_weight(a), &stream_weight(b));
        assert_eq!(cmp("live", "1080p"), Ordering::Equal);
        assert_eq!(cmp("live", "720p60"), Ordering::Greater);
        assert_eq!(cmp("sq", "480p"), Ordering::Less);
        assert_eq!(cmp("hq", "9000k"), Ordering::Greater);
    }

    #[test]
    fn dimensions_are_ordered() {
        let unknown = stream_weight("worst-ever");
        let bitrate = stream_weight("9000k");
        let pixels = stream_weight("144p");
        assert_eq!(compare_weights(&unknown, &bitrate), Ordering::Less);
        assert_eq!(compare_weights(&bitrate, &pixels), Ordering::Less);
    }
}
