use thiserror::Error;

/// Everything that can stop a transcript request.
///
/// The caption-related kinds stay separate so callers can tell a video with
/// captions switched off apart from one that simply has none, or none in
/// the languages asked for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("could not extract a video ID from: {0}")]
    InvalidIdentifier(String),

    #[error("captions are disabled for video {video_id}")]
    CaptionsDisabled { video_id: String },

    #[error("no captions exist for video {video_id}")]
    NoCaptionsAtAll { video_id: String },

    #[error("no transcript for video {video_id} in the requested languages: {}", languages.join(", "))]
    NoMatchInRequestedLanguages { video_id: String, languages: Vec<String> },

    #[error("unexpected caption source error: {0}")]
    UnexpectedSource(String),
}

impl TranscriptError {
    /// Only source/transport failures are worth another attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, TranscriptError::UnexpectedSource(_))
    }
}

impl From<reqwest::Error> for TranscriptError {
    fn from(e: reqwest::Error) -> Self {
        TranscriptError::UnexpectedSource(e.to_string())
    }
}

impl From<serde_json::Error> for TranscriptError {
    fn from(e: serde_json::Error) -> Self {
        TranscriptError::UnexpectedSource(format!("malformed player response: {e}"))
    }
}

impl From<quick_xml::Error> for TranscriptError {
    fn from(e: quick_xml::Error) -> Self {
        TranscriptError::UnexpectedSource(format!("error parsing caption XML: {e}"))
    }
}
