use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{CaptionFragment, TranscriptError};

/// One caption track advertised for a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionTrack {
    pub language_code: String,
    pub name: String,
    /// Auto-generated (speech recognition) rather than uploaded by the author
    pub is_generated: bool,
    /// Where the source fetches this track's fragments from
    pub url: String,
}

/// Where caption data comes from.
///
/// `list_tracks` reports `CaptionsDisabled` or `NoCaptionsAtAll` itself when
/// it can tell the two apart; anything else is `UnexpectedSource`.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    async fn list_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>, TranscriptError>;

    async fn fetch_fragments(&self, track: &CaptionTrack) -> Result<Vec<CaptionFragment>, TranscriptError>;
}
