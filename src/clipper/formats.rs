// Format option set - derives UI choices from the advertised stream list

use super::models::{StreamFormat, DEFAULT_FORMAT_OPTIONS};

/// Distinct container identifiers across the advertised streams,
/// deduplicated and sorted. Recomputed on every metadata fetch.
pub fn distinct_containers(formats: &[StreamFormat]) -> Vec<String> {
    let mut containers: Vec<String> = Vec::new();

    for format in formats {
        if !format.is_media() {
            continue;
        }
        let ext = format.ext.trim().to_ascii_lowercase();
        if ext.is_empty() {
            continue;
        }
        if !containers.contains(&ext) {
            containers.push(ext);
        }
    }

    containers.sort();
    containers
}

/// Options shown before any fetch has happened
pub fn default_format_options() -> Vec<String> {
    DEFAULT_FORMAT_OPTIONS.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(ext: &str) -> StreamFormat {
        StreamFormat {
            ext: ext.to_string(),
            vcodec: Some("avc1.64001F".to_string()),
            acodec: Some("mp4a.40.2".to_string()),
        }
    }

    fn storyboard() -> StreamFormat {
        StreamFormat {
            ext: "mhtml".to_string(),
            vcodec: Some("none".to_string()),
            acodec: Some("none".to_string()),
        }
    }

    #[test]
    fn test_exposes_exactly_the_advertised_set() {
        let formats = vec![stream("mp4"), stream("webm")];
        let containers = distinct_containers(&formats);
        assert_eq!(containers, vec!["mp4".to_string(), "webm".to_string()]);
    }

    #[test]
    fn test_order_insensitive_and_deduplicated() {
        let formats = vec![stream("webm"), stream("mp4"), stream("webm"), stream("mp4")];
        let containers = distinct_containers(&formats);
        assert_eq!(containers, vec!["mp4".to_string(), "webm".to_string()]);
    }

    #[test]
    fn test_skips_storyboard_pseudo_formats() {
        let formats = vec![storyboard(), stream("mp4"), stream("")];
        let containers = distinct_containers(&formats);
        assert_eq!(containers, vec!["mp4".to_string()]);
    }

    #[test]
    fn test_audio_only_stream_still_counts() {
        let audio = StreamFormat {
            ext: "webm".to_string(),
            vcodec: Some("none".to_string()),
            acodec: Some("opus".to_string()),
        };
        let containers = distinct_containers(&[audio]);
        assert_eq!(containers, vec!["webm".to_string()]);
    }

    #[test]
    fn test_defaults_before_fetch() {
        assert_eq!(
            default_format_options(),
            vec!["mp4".to_string(), "mp3".to_string()]
        );
    }
}
