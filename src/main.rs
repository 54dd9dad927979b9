use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use eyre::{Result, bail};
use log::{debug, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use ytseg::analysis::{DEFAULT_STOPWORDS, word_stats};
use ytseg::cache::CachedRetriever;
use ytseg::config::Config;
use ytseg::youtube::YouTubeSource;
use ytseg::{TranscriptError, TranscriptResult, output, segment};

mod cli;

use cli::{Cli, OutputFormat};

const APP_NAME: &str = "ytseg";

/// Upper bound on the pause between retrieval attempts
const MAX_BACKOFF: Duration = Duration::from_secs(30);

const SUPPORTED_FORMATS: &str = "Supported formats:
  https://www.youtube.com/watch?v=ID
  https://youtu.be/ID
  https://www.youtube.com/embed/ID
  https://www.youtube.com/v/ID
  https://www.youtube.com/shorts/ID
  <11-character video ID>";

/// Send `log` output to an append-only file so stdout stays clean for rendered output
fn setup_logging(log_file: &Path) -> Result<()> {
    if let Some(dir) = log_file.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .try_init()?;

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_file_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join("logs")
        .join(format!("{APP_NAME}.log"))
}

/// Everything a single request needs, resolved from CLI and config
struct Settings {
    languages: Vec<String>,
    format: OutputFormat,
    keywords: Vec<String>,
    analyze: bool,
    top_words: usize,
    retries: u32,
    output: Option<PathBuf>,
    verbose: bool,
}

/// 500 ms doubled per failed attempt, capped at [`MAX_BACKOFF`]
fn backoff_delay(attempt: u32) -> Duration {
    let millis = 500u64.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(millis).min(MAX_BACKOFF)
}

/// Retry a retrieval with exponential backoff while the failure is transient
async fn retry<F, Fut, T>(max_attempts: u32, operation: F) -> Result<T, TranscriptError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, TranscriptError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(e) if e.is_transient() && attempt + 1 < max_attempts => {
                let delay = backoff_delay(attempt);
                debug!("Attempt {} failed: {e}, retrying in {delay:?}", attempt + 1);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// User-facing message for each failure kind
fn describe(err: &TranscriptError) -> String {
    match err {
        TranscriptError::InvalidIdentifier(input) => {
            format!("could not extract a video ID from: {input}\n\n{SUPPORTED_FORMATS}")
        }
        TranscriptError::CaptionsDisabled { .. } => format!("{err}: the uploader has turned transcripts off"),
        TranscriptError::NoCaptionsAtAll { .. } => format!("{err}: this video has no transcript in any language"),
        TranscriptError::NoMatchInRequestedLanguages { .. } => {
            format!("{err}\n\nTry other languages with --lang")
        }
        TranscriptError::UnexpectedSource(_) => err.to_string(),
    }
}

fn resolve_video_id(input: &str) -> Result<String, TranscriptError> {
    if ytseg::is_bare_video_id(input) {
        return Ok(input.trim().to_string());
    }
    ytseg::extract_video_id(input).ok_or_else(|| TranscriptError::InvalidIdentifier(input.to_string()))
}

fn render(transcript: &TranscriptResult, settings: &Settings) -> Result<String> {
    let segments = segment::segment(&transcript.fragments, &transcript.video_id);
    let stats = settings
        .analyze
        .then(|| word_stats(&transcript.text, &DEFAULT_STOPWORDS, settings.top_words));

    let body = match settings.format {
        OutputFormat::Text => output::render_text(transcript, &settings.keywords),
        OutputFormat::Timed => output::render_timed(&transcript.fragments),
        OutputFormat::Segments => output::render_segments(&segments),
        OutputFormat::Json => return Ok(output::render_json(transcript, &segments, stats.as_ref())?),
    };

    Ok(match stats {
        Some(stats) => format!("{body}\n\n{}", output::render_stats(&stats)),
        None => body,
    })
}

async fn handle(retriever: &CachedRetriever<YouTubeSource>, input: &str, settings: &Settings) -> Result<()> {
    let video_id = resolve_video_id(input).map_err(|e| eyre::eyre!(describe(&e)))?;
    debug!("Resolved {input} to video {video_id}");

    let transcript: Arc<TranscriptResult> = retry(settings.retries, || retriever.retrieve(&video_id, &settings.languages))
        .await
        .map_err(|e| eyre::eyre!(describe(&e)))?;

    if settings.verbose {
        eprintln!(
            "Video: {}\nLanguage: {}\nFragments: {}",
            transcript.video_id,
            transcript.language,
            transcript.fragments.len(),
        );
    }

    let rendered = render(&transcript, settings)?;

    if let Some(ref path) = settings.output {
        std::fs::write(path, &rendered)?;
        if settings.verbose {
            eprintln!("Output written to: {}", path.display());
        }
    } else {
        println!("{rendered}");
    }

    Ok(())
}

/// How an interactive session ended
#[derive(Debug, PartialEq, Eq)]
struct SessionEnd {
    handled: usize,
    interrupted: bool,
}

/// Handle one request per input line until EOF or `shutdown` fires.
///
/// `shutdown` is polled while waiting for input and while a request is in
/// flight; an interrupted request is dropped and no further lines are read.
async fn run_session<R, S, H, Fut>(reader: R, shutdown: S, mut handle_line: H) -> Result<SessionEnd>
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
    H: FnMut(String) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut lines = reader.lines();
    tokio::pin!(shutdown);
    let mut handled = 0;

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = &mut shutdown => return Ok(SessionEnd { handled, interrupted: true }),
        };
        let Some(line) = line else {
            return Ok(SessionEnd {
                handled,
                interrupted: false,
            });
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        handled += 1;
        tokio::select! {
            result = handle_line(input.to_string()) => {
                if let Err(e) = result {
                    eprintln!("Error: {e}");
                }
            }
            _ = &mut shutdown => return Ok(SessionEnd { handled, interrupted: true }),
        }
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging(&log_file_path())?;

    let cli = <Cli as clap::Parser>::parse();

    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring unreadable config: {e}");
        Config::default()
    });

    let format = match cli.format {
        Some(format) => format,
        None => match config.default_format.as_deref() {
            Some(name) => OutputFormat::from_str(name, true).map_err(|e| eyre::eyre!("default_format: {e}"))?,
            None => OutputFormat::Text,
        },
    };

    let settings = Settings {
        languages: config.languages_or(&cli.langs),
        format,
        keywords: config.keywords_or(
            cli.keywords
                .as_deref()
                .map(ytseg::highlight::parse_keywords)
                .unwrap_or_default(),
        ),
        analyze: cli.analyze,
        top_words: config.top_words(),
        retries: config.retries_or(cli.retries),
        output: cli.output.clone(),
        verbose: cli.verbose,
    };
    debug!("Languages: {}", settings.languages.join(", "));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs_or(cli.timeout)))
        .build()?;
    let retriever = CachedRetriever::new(YouTubeSource::new(client), config.cache_capacity());

    if let Some(ref url) = cli.url {
        return tokio::select! {
            result = handle(&retriever, url, &settings) => result,
            _ = ctrl_c() => bail!("cancelled"),
        };
    }

    // Interactive: one request per stdin line, sharing the cache
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let session = run_session(stdin, ctrl_c(), |input| {
        let retriever = &retriever;
        let settings = &settings;
        async move { handle(retriever, &input, settings).await }
    })
    .await?;

    if session.interrupted {
        info!("Interrupted after {} request(s)", session.handled);
        // The blocking stdin reader would otherwise keep the runtime alive
        std::process::exit(130);
    }

    if session.handled == 0 {
        bail!("no URL or video ID provided\n\nUsage: ytseg <URL>\n       echo <URL> | ytseg");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_video_id() {
        assert_eq!(resolve_video_id("dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(
            resolve_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            resolve_video_id("nope"),
            Err(TranscriptError::InvalidIdentifier("nope".to_string()))
        );
    }

    #[test]
    fn test_describe_keeps_kinds_distinct() {
        let video_id = "vid".to_string();
        let messages = [
            describe(&TranscriptError::InvalidIdentifier("x".into())),
            describe(&TranscriptError::CaptionsDisabled {
                video_id: video_id.clone(),
            }),
            describe(&TranscriptError::NoCaptionsAtAll {
                video_id: video_id.clone(),
            }),
            describe(&TranscriptError::NoMatchInRequestedLanguages {
                video_id,
                languages: vec!["es".into()],
            }),
            describe(&TranscriptError::UnexpectedSource("boom".into())),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(messages[0].contains("youtu.be/ID"));
    }

    #[test]
    fn test_backoff_delay_doubles_then_caps() {
        assert_eq!(backoff_delay(0), Duration::from_millis(500));
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
        assert_eq!(backoff_delay(10), MAX_BACKOFF);
        assert_eq!(backoff_delay(64), MAX_BACKOFF);
        assert_eq!(backoff_delay(u32::MAX), MAX_BACKOFF);
    }

    #[test]
    fn test_log_file_path() {
        let path = log_file_path();
        assert!(path.ends_with("ytseg/logs/ytseg.log"));
    }

    #[test]
    fn test_setup_logging_creates_log_dir() {
        let dir = std::env::temp_dir().join(format!("ytseg-log-test-{}", std::process::id()));
        let log_file = dir.join("nested").join("ytseg.log");
        // Installing the global logger can only succeed once per process
        let _ = setup_logging(&log_file);
        assert!(log_file.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_session_handles_each_line_until_eof() {
        let mut seen = Vec::new();
        let end = run_session(&b"https://youtu.be/aaaaaaaaaaa\n\n  bbbbbbbbbbb  \n"[..], std::future::pending(), |line| {
            seen.push(line);
            std::future::ready(Ok(()))
        })
        .await
        .unwrap();
        assert_eq!(
            end,
            SessionEnd {
                handled: 2,
                interrupted: false
            }
        );
        assert_eq!(seen, vec!["https://youtu.be/aaaaaaaaaaa".to_string(), "bbbbbbbbbbb".to_string()]);
    }

    #[tokio::test]
    async fn test_session_continues_after_failed_request() {
        let end = run_session(&b"x\ny\n"[..], std::future::pending(), |_| {
            std::future::ready(Err(eyre::eyre!("boom")))
        })
        .await
        .unwrap();
        assert_eq!(end.handled, 2);
        assert!(!end.interrupted);
    }

    #[tokio::test]
    async fn test_session_stops_while_waiting_for_input() {
        // Writer stays open, so the reader never reaches EOF
        let (_writer, reader) = tokio::io::duplex(64);
        let end = run_session(tokio::io::BufReader::new(reader), async {}, |_| {
            std::future::ready(Ok(()))
        })
        .await
        .unwrap();
        assert_eq!(
            end,
            SessionEnd {
                handled: 0,
                interrupted: true
            }
        );
    }

    #[tokio::test]
    async fn test_session_cancels_in_flight_request() {
        let mut seen = Vec::new();
        let shutdown = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
        };
        let end = run_session(&b"first\nsecond\n"[..], shutdown, |line| {
            seen.push(line);
            std::future::pending::<Result<()>>()
        })
        .await
        .unwrap();
        assert_eq!(
            end,
            SessionEnd {
                handled: 1,
                interrupted: true
            }
        );
        assert_eq!(seen, vec!["first".to_string()]);
    }

    #[tokio::test]
    async fn test_retry_stops_on_terminal_error() {
        let calls = std::sync::atomic::AtomicU32::new(0);
        let result: Result<(), TranscriptError> = retry(3, || {
            calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            async {
                Err(TranscriptError::CaptionsDisabled {
                    video_id: "vid".into(),
                })
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_repeats_transient_error() {
        let calls = std::sync::atomic::AtomicU32::new(0);
        let result: Result<u32, TranscriptError> = retry(3, || {
            let n = calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(TranscriptError::UnexpectedSource("flaky".into()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 3);
    }
}
