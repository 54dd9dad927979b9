use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Full transcript as one document
    Text,
    /// One `[seconds] text` line per caption fragment
    Timed,
    /// 10-second segments with deep links
    Segments,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ytseg",
    about = "YouTube transcript fetcher with 10-second timeline segments",
    version
)]
pub struct Cli {
    /// YouTube video URL or video ID (reads one per line from stdin if omitted)
    pub url: Option<String>,

    /// Caption language to try, in priority order (repeatable; default: es, en)
    #[arg(short, long = "lang")]
    pub langs: Vec<String>,

    /// Output format: text (default), timed, segments, json
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Comma-separated keywords to highlight in text output
    #[arg(short, long)]
    pub keywords: Option<String>,

    /// Append word count and most common words
    #[arg(short, long)]
    pub analyze: bool,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Attempts for transient source failures
    #[arg(long)]
    pub retries: Option<u32>,

    /// Show matched language and segment counts
    #[arg(short, long)]
    pub verbose: bool,
}
