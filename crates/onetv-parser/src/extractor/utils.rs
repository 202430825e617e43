use rand::Rng;
use rand::seq::IndexedRandom;
use url::Url;

use super::error::ExtractorError;

/// Applies the scheme of `reference` to `url` when `url` has none.
///
/// `//host/path` and `host/path` both become `{scheme}://host/path`; a url that
/// already carries a scheme is returned untouched.
pub fn update_scheme(reference: &str, url: &str) -> Result<String, ExtractorError> {
    if has_scheme(url) {
        return Ok(url.to_string());
    }

    let scheme = Url::parse(reference)?.scheme().to_string();
    match url.strip_prefix("//") {
        Some(rest) => Ok(format!("{scheme}://{rest}")),
        None => Ok(format!("{scheme}://{url}")),
    }
}

fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Picks one of several equivalent mirror urls uniformly at random.
pub fn choose_mirror<'a, R: Rng + ?Sized>(rng: &mut R, mirrors: &'a [String]) -> Option<&'a str> {
    mirrors.choose(rng).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn scheme_less_urls_take_reference_scheme() {
        assert_eq!(
            update_scheme("https://www.1tv.ru/live", "//stream.1tv.ru/get_hls_session").unwrap(),
            "https://stream.1tv.ru/get_hls_session"
        );
        assert_eq!(
            update_scheme("http://www.1tv.ru/live", "//stream.1tv.ru/get_hls_session").unwrap(),
            "http://stream.1tv.ru/get_hls_session"
        );
        assert_eq!(
            update_scheme("http://www.1tv.ru/", "cdn.1tv.ru/a.mp4").unwrap(),
            "http://cdn.1tv.ru/a.mp4"
        );
    }

    #[test]
    fn urls_with_scheme_are_untouched() {
        assert_eq!(
            update_scheme("http://www.1tv.ru/", "https://cdn.1tv.ru/a.mp4").unwrap(),
            "https://cdn.1tv.ru/a.mp4"
        );
    }

    #[test]
    fn invalid_reference_is_an_error() {
        assert!(matches!(
            update_scheme("not a url", "//cdn/a.mp4"),
            Err(ExtractorError::InvalidUrl(_))
        ));
    }

    #[test]
    fn mirror_choice_stays_within_candidates() {
        let mirrors = vec!["https://a/1.m3u8".to_string(), "https://b/1.m3u8".to_string()];
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..32 {
            let picked = choose_mirror(&mut rng, &mirrors).unwrap();
            assert!(mirrors.iter().any(|m| m == picked));
        }
        assert_eq!(choose_mirror(&mut rng, &[]), None);
    }

    #[test]
    fn mirror_choice_reaches_every_candidate() {
        let mirrors: Vec<String> = (0..3).map(|i| format!("https://edge{i}/")).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let picked = choose_mirror(&mut rng, &mirrors).unwrap();
            let idx = mirrors.iter().position(|m| m == picked).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
