pub mod analysis;
pub mod cache;
pub mod config;
pub mod error;
pub mod highlight;
pub mod output;
pub mod retriever;
pub mod segment;
pub mod source;
pub mod youtube;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use error::TranscriptError;

/// Anchored at the start of the input, after an optional scheme and `www.`
static VIDEO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.)?(?:youtube\.com/(?:watch\?v=|embed/|v/|shorts/|.*?v=)|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
    .expect("video URL pattern is valid")
});

static BARE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("bare id pattern is valid"));

/// A single timed caption unit as delivered by the caption source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionFragment {
    /// Offset from the start of the video, in seconds
    pub start: f64,
    pub text: String,
}

impl CaptionFragment {
    pub fn new(start: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            text: text.into(),
        }
    }
}

/// Outcome of a successful retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub video_id: String,
    /// Fragment texts joined with single spaces, in order
    pub text: String,
    pub fragments: Vec<CaptionFragment>,
    /// Language code of the track that matched
    pub language: String,
}

impl TranscriptResult {
    pub fn new(video_id: impl Into<String>, fragments: Vec<CaptionFragment>, language: impl Into<String>) -> Self {
        let text = fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            video_id: video_id.into(),
            text,
            fragments,
            language: language.into(),
        }
    }
}

/// A 10-second bucket of contiguous fragments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSegment {
    pub bucket_start: f64,
    /// `m:ss`
    pub label: String,
    pub text: String,
    pub url: String,
}

/// Extract the 11-character video ID from a YouTube URL.
///
/// Returns `None` when the input matches none of the known URL shapes.
pub fn extract_video_id(input: &str) -> Option<String> {
    VIDEO_URL_RE
        .captures(input.trim())
        .map(|caps| caps[1].to_string())
}

/// True when the input is already a bare 11-character video ID
pub fn is_bare_video_id(input: &str) -> bool {
    BARE_ID_RE.is_match(input.trim())
}

/// Deep link to `video_id` at `seconds` into the video
pub fn watch_url(video_id: &str, seconds: u64) -> String {
    format!("https://www.youtube.com/watch?v={video_id}&t={seconds}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=120"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_v_not_first_param() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_no_scheme_no_www() {
        assert_eq!(
            extract_video_id("youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_http_scheme() {
        assert_eq!(
            extract_video_id("http://youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_v_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/v/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_shorts_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_id_with_hyphen_and_underscore() {
        assert_eq!(
            extract_video_id("https://youtu.be/a-b_c-d_e-f"),
            Some("a-b_c-d_e-f".to_string())
        );
    }

    #[test]
    fn test_not_anchored_elsewhere() {
        assert_eq!(extract_video_id("see https://youtu.be/dQw4w9WgXcQ"), None);
    }

    #[test]
    fn test_other_host() {
        assert_eq!(extract_video_id("https://vimeo.com/watch?v=dQw4w9WgXcQ"), None);
    }

    #[test]
    fn test_id_too_short() {
        assert_eq!(extract_video_id("https://youtu.be/abc"), None);
    }

    #[test]
    fn test_bare_id_is_not_a_url() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), None);
        assert!(is_bare_video_id("dQw4w9WgXcQ"));
        assert!(is_bare_video_id("  dQw4w9WgXcQ  "));
        assert!(!is_bare_video_id("dQw4w9WgXcQx"));
    }

    #[test]
    fn test_invalid_url() {
        assert_eq!(extract_video_id("not a url at all"), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(
            extract_video_id("  https://youtu.be/dQw4w9WgXcQ  "),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_transcript_result_flat_text() {
        let result = TranscriptResult::new(
            "dQw4w9WgXcQ",
            vec![CaptionFragment::new(0.0, "hello"), CaptionFragment::new(1.2, "world")],
            "en",
        );
        assert_eq!(result.text, "hello world");
        assert_eq!(result.language, "en");
    }

    #[test]
    fn test_watch_url_deep_link() {
        assert_eq!(
            watch_url("dQw4w9WgXcQ", 30),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=30s"
        );
    }
}
