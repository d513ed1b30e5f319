// URL validation - pure pattern classifier, no network access

use regex::Regex;

lazy_static::lazy_static! {
    // Optional scheme, optional www./m., a recognized host, an optional path
    // form, then an 11-character video id terminated by a non-id character
    // or end of input.
    static ref VIDEO_URL_RE: Regex = Regex::new(
        r"^(?:https?://)?(?:www\.|m\.)?(?:youtube\.com|youtu\.be|youtube-nocookie\.com)/(?:watch\?v=|embed/|v/|shorts/|.+[?&]v=)?([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-].*)?$"
    ).unwrap();
}

/// True iff the string structurally matches a recognized video-sharing URL.
/// Syntactic only: a well-formed URL for a nonexistent video still passes.
pub fn is_valid_video_url(url: &str) -> bool {
    VIDEO_URL_RE.is_match(url.trim())
}

/// The 11-character video identifier, if the URL is valid
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_URL_RE
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn test_standard_watch_url() {
        assert!(is_valid_video_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
    }

    #[test]
    fn test_unrecognized_host_rejected() {
        assert!(!is_valid_video_url("https://vimeo.com/12345"));
    }

    // Property sweep: every combination of scheme, www prefix, host and path
    // form around a well-formed id must validate.
    #[test]
    fn test_valid_permutations() {
        let schemes = ["", "http://", "https://"];
        let prefixes = ["", "www."];
        let forms = ["watch?v=", "embed/", "v/", "shorts/"];

        for scheme in schemes {
            for prefix in prefixes {
                for form in forms {
                    let url = format!("{}{}youtube.com/{}{}", scheme, prefix, form, VALID_ID);
                    assert!(is_valid_video_url(&url), "expected valid: {}", url);
                    assert_eq!(extract_video_id(&url).as_deref(), Some(VALID_ID));
                }
            }
        }

        for scheme in schemes {
            let url = format!("{}youtu.be/{}", scheme, VALID_ID);
            assert!(is_valid_video_url(&url), "expected valid: {}", url);
        }
    }

    // Mutations of a valid URL that must all be rejected.
    #[test]
    fn test_invalid_permutations() {
        let bad = [
            String::new(),
            "not a url at all".to_string(),
            "https://www.youtube.com".to_string(),
            "https://www.youtube.com/watch?v=".to_string(),
            // id too short
            format!("https://www.youtube.com/watch?v={}", &VALID_ID[..10]),
            // id with illegal characters
            "https://www.youtube.com/watch?v=abc123!!xyz".to_string(),
            // host merely resembles a recognized one
            format!("https://evil-youtube.com/watch?v={}", VALID_ID),
            format!("https://youtube.com.evil.com/watch?v={}", VALID_ID),
            format!("https://dailymotion.com/watch?v={}", VALID_ID),
            "https://vimeo.com/12345".to_string(),
        ];

        for url in bad {
            assert!(!is_valid_video_url(&url), "expected invalid: {}", url);
        }
    }

    #[test]
    fn test_extra_query_params_accepted() {
        assert!(is_valid_video_url(
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=30"
        ));
        assert!(is_valid_video_url(
            "https://www.youtube.com/watch?list=PLx&v=dQw4w9WgXcQ"
        ));
        assert!(is_valid_video_url("https://youtu.be/dQw4w9WgXcQ?t=30"));
    }

    #[test]
    fn test_id_longer_than_eleven_rejected() {
        assert!(!is_valid_video_url(
            "https://www.youtube.com/watch?v=dQw4w9WgXcQx"
        ));
    }

    #[test]
    fn test_mobile_and_nocookie_hosts() {
        assert!(is_valid_video_url("https://m.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_valid_video_url(
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ"
        ));
    }

    #[test]
    fn test_validator_is_idempotent() {
        let urls = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://vimeo.com/12345",
            "",
        ];
        for url in urls {
            assert_eq!(is_valid_video_url(url), is_valid_video_url(url));
        }
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        assert!(is_valid_video_url("  https://youtu.be/dQw4w9WgXcQ  "));
    }
}
