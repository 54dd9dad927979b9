use log::{debug, info};

use crate::source::{CaptionSource, CaptionTrack};
use crate::{TranscriptError, TranscriptResult};

/// Pick the first track matching the ordered language preferences.
///
/// Within one language an author-uploaded track wins over an auto-generated one.
pub fn select_track<'a, S: AsRef<str>>(tracks: &'a [CaptionTrack], languages: &[S]) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        let lang: &str = lang.as_ref();
        tracks
            .iter()
            .filter(|t| t.language_code == lang)
            .min_by_key(|t| t.is_generated)
    })
}

/// Retrieve the transcript of `video_id` in the first available language.
///
/// Lists the available tracks exactly once, then walks `languages` in order
/// and fetches only the first match.
pub async fn retrieve<S, L>(source: &S, video_id: &str, languages: &[L]) -> Result<TranscriptResult, TranscriptError>
where
    S: CaptionSource + ?Sized,
    L: AsRef<str>,
{
    let wanted: Vec<&str> = languages.iter().map(AsRef::<str>::as_ref).collect();

    let tracks = source.list_tracks(video_id).await?;
    if tracks.is_empty() {
        return Err(TranscriptError::NoCaptionsAtAll {
            video_id: video_id.to_string(),
        });
    }

    let Some(track) = select_track(&tracks, &wanted) else {
        debug!("No track for {video_id} in [{}]", wanted.join(", "));
        return Err(TranscriptError::NoMatchInRequestedLanguages {
            video_id: video_id.to_string(),
            languages: wanted.iter().map(|l| l.to_string()).collect(),
        });
    };

    info!(
        "Using caption track for {video_id}: lang={} generated={}",
        track.language_code, track.is_generated
    );
    let fragments = source.fetch_fragments(track).await?;
    Ok(TranscriptResult::new(video_id, fragments, track.language_code.clone()))
}
