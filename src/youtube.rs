use std::sync::LazyLock;

use async_trait::async_trait;
use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::source::{CaptionSource, CaptionTrack};
use crate::{CaptionFragment, TranscriptError};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

static API_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#).expect("api key pattern is valid"));

static API_KEY_FALLBACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#).expect("api key pattern is valid"));

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<RawCaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct RawCaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
    name: Option<TrackName>,
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrackName {
    #[serde(rename = "simpleText")]
    simple_text: Option<String>,
}

impl From<RawCaptionTrack> for CaptionTrack {
    fn from(raw: RawCaptionTrack) -> Self {
        CaptionTrack {
            name: raw
                .name
                .and_then(|n| n.simple_text)
                .unwrap_or_else(|| raw.language_code.clone()),
            is_generated: raw.kind.as_deref() == Some("asr"),
            language_code: raw.language_code,
            url: raw.base_url,
        }
    }
}

/// Caption source backed by YouTube's InnerTube player API
pub struct YouTubeSource {
    client: reqwest::Client,
}

impl YouTubeSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn get_text(&self, url: &str) -> Result<String, TranscriptError> {
        let text = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }
}

#[async_trait]
impl CaptionSource for YouTubeSource {
    async fn list_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>, TranscriptError> {
        // Step 1: Fetch the watch page to get the InnerTube API key
        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
        debug!("Fetching watch page: {watch_url}");

        let page_html = self.get_text(&watch_url).await?;
        let api_key = extract_api_key(&page_html)?;
        debug!("Extracted InnerTube API key: {api_key}");

        // Step 2: Call InnerTube player endpoint
        let player_url = format!("https://www.youtube.com/youtubei/v1/player?key={api_key}&prettyPrint=false");

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": "en",
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id
        });

        let raw = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let tracks = tracks_from_player_json(video_id, &raw)?;
        debug!(
            "Video {video_id} has {} caption track(s): {}",
            tracks.len(),
            tracks
                .iter()
                .map(|t| t.language_code.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(tracks)
    }

    async fn fetch_fragments(&self, track: &CaptionTrack) -> Result<Vec<CaptionFragment>, TranscriptError> {
        debug!("Fetching caption track: lang={} name={}", track.language_code, track.name);
        let caption_xml = self.get_text(&track.url).await?;
        parse_caption_xml(&caption_xml)
    }
}

fn tracks_from_player_json(video_id: &str, raw: &str) -> Result<Vec<CaptionTrack>, TranscriptError> {
    let resp: InnerTubePlayerResponse = serde_json::from_str(raw)?;
    tracks_from_player_response(video_id, resp)
}

fn tracks_from_player_response(
    video_id: &str,
    resp: InnerTubePlayerResponse,
) -> Result<Vec<CaptionTrack>, TranscriptError> {
    if let Some(status) = resp.playability_status {
        let code = status.status.unwrap_or_default();
        if !code.is_empty() && code != "OK" {
            let reason = status.reason.unwrap_or(code);
            return Err(TranscriptError::UnexpectedSource(format!(
                "video {video_id} unavailable: {reason}"
            )));
        }
    }

    let Some(captions) = resp.captions else {
        return Err(TranscriptError::CaptionsDisabled {
            video_id: video_id.to_string(),
        });
    };

    let tracks = captions
        .player_captions_tracklist_renderer
        .and_then(|r| r.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(TranscriptError::NoCaptionsAtAll {
            video_id: video_id.to_string(),
        });
    }

    Ok(tracks.into_iter().map(CaptionTrack::from).collect())
}

fn extract_api_key(html: &str) -> Result<String, TranscriptError> {
    if let Some(caps) = API_KEY_RE.captures(html) {
        return Ok(caps[1].to_string());
    }

    // Fallback: try the newer pattern
    if let Some(caps) = API_KEY_FALLBACK_RE.captures(html) {
        return Ok(caps[1].to_string());
    }

    Err(TranscriptError::UnexpectedSource(
        "could not extract InnerTube API key from watch page".to_string(),
    ))
}

fn parse_start(e: &quick_xml::events::BytesStart<'_>) -> Option<f64> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"start")
        .and_then(|attr| String::from_utf8_lossy(&attr.value).parse::<f64>().ok())
}

fn parse_caption_xml(xml: &str) -> Result<Vec<CaptionFragment>, TranscriptError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut fragments = Vec::new();
    let mut pending: Option<CaptionFragment> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == b"text" => {
                pending = parse_start(e).map(|start| CaptionFragment::new(start, ""));
            }
            Event::Empty(ref e) if e.name().as_ref() == b"text" => {
                // Self-closing <text .../> still marks a point on the timeline
                if let Some(start) = parse_start(e) {
                    fragments.push(CaptionFragment::new(start, ""));
                }
            }
            Event::Text(ref e) => {
                if let Some(fragment) = pending.as_mut() {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    fragment
                        .text
                        .push_str(&html_escape::decode_html_entities(&raw_text));
                }
            }
            Event::End(ref e) if e.name().as_ref() == b"text" => {
                if let Some(fragment) = pending.take() {
                    fragments.push(fragment);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(fragments)
}
