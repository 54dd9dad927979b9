use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LANGUAGES: &[&str] = &["es", "en"];
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_TOP_WORDS: usize = 10;
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Caption languages in priority order
    pub languages: Option<Vec<String>>,
    pub default_format: Option<String>,
    pub timeout_secs: Option<u64>,
    pub retries: Option<u32>,
    pub top_words: Option<usize>,
    pub cache_capacity: Option<usize>,
    pub keywords: Option<Vec<String>>,
}

impl Config {
    /// Load config from ~/.config/ytseg/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    /// CLI languages win; otherwise the configured list; otherwise `es, en`
    pub fn languages_or(&self, cli: &[String]) -> Vec<String> {
        if !cli.is_empty() {
            return cli.to_vec();
        }
        match &self.languages {
            Some(langs) if !langs.is_empty() => langs.clone(),
            _ => DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn timeout_secs_or(&self, cli: Option<u64>) -> u64 {
        cli.or(self.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn retries_or(&self, cli: Option<u32>) -> u32 {
        cli.or(self.retries).unwrap_or(DEFAULT_RETRIES).max(1)
    }

    pub fn top_words(&self) -> usize {
        self.top_words.unwrap_or(DEFAULT_TOP_WORDS)
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity.unwrap_or(DEFAULT_CACHE_CAPACITY)
    }

    pub fn keywords_or(&self, cli: Vec<String>) -> Vec<String> {
        if cli.is_empty() {
            self.keywords.clone().unwrap_or_default()
        } else {
            cli
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytseg")
        .join("config.toml")
}
