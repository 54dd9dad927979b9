use serde::Serialize;

use crate::analysis::WordStats;
use crate::highlight::highlight;
use crate::{CaptionFragment, TimeSegment, TranscriptResult};

/// Render the flat transcript, with keywords highlighted
pub fn render_text(transcript: &TranscriptResult, keywords: &[String]) -> String {
    highlight(&transcript.text, keywords)
}

/// One line per fragment: `[<start, 2 decimals>] <text>`
pub fn render_timed(fragments: &[CaptionFragment]) -> String {
    fragments
        .iter()
        .map(|f| format!("[{:.2}] {}", f.start, f.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One markdown line per segment: `[m:ss] [text](url)`
pub fn render_segments(segments: &[TimeSegment]) -> String {
    segments
        .iter()
        .map(|s| format!("[{}] [{}]({})", s.label, s.text, s.url))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_stats(stats: &WordStats) -> String {
    let mut out = format!("Total words: {}\nMost common words:", stats.total_words);
    for (word, count) in &stats.top_words {
        out.push_str(&format!("\n- {word}: {count}"));
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    video_id: &'a str,
    language: &'a str,
    text: &'a str,
    fragments: &'a [CaptionFragment],
    segments: &'a [TimeSegment],
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<&'a WordStats>,
}

pub fn render_json(
    transcript: &TranscriptResult,
    segments: &[TimeSegment],
    analysis: Option<&WordStats>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonReport {
        video_id: &transcript.video_id,
        language: &transcript.language,
        text: &transcript.text,
        fragments: &transcript.fragments,
        segments,
        analysis,
    })
}
