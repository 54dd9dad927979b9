use std::sync::Arc;

use dashmap::DashMap;
use log::debug;

use crate::retriever::retrieve;
use crate::source::CaptionSource;
use crate::{TranscriptError, TranscriptResult};

type CacheKey = (String, Vec<String>);

/// Bounded in-memory memo of successful retrievals, keyed by `(video_id, languages)`.
///
/// Entries never change once stored. When full, new results are returned
/// but not kept.
#[derive(Debug)]
pub struct RetrievalCache {
    capacity: usize,
    entries: DashMap<CacheKey, Arc<TranscriptResult>>,
}

impl RetrievalCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: DashMap::new(),
        }
    }

    /// Look up a cached transcript, if available.
    pub fn get(&self, video_id: &str, languages: &[String]) -> Option<Arc<TranscriptResult>> {
        let hit = self
            .entries
            .get(&(video_id.to_string(), languages.to_vec()))
            .map(|entry| Arc::clone(entry.value()));
        if hit.is_some() {
            debug!("Cache hit: {video_id} [{}]", languages.join(", "));
        }
        hit
    }

    /// Store a transcript unless the cache is already full.
    pub fn insert(&self, languages: &[String], result: Arc<TranscriptResult>) {
        if self.entries.len() >= self.capacity {
            debug!("Cache full ({} entries), not storing {}", self.entries.len(), result.video_id);
            return;
        }
        self.entries
            .entry((result.video_id.clone(), languages.to_vec()))
            .or_insert(result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A caption source paired with a retrieval cache
pub struct CachedRetriever<S> {
    source: S,
    cache: RetrievalCache,
}

impl<S: CaptionSource> CachedRetriever<S> {
    pub fn new(source: S, capacity: usize) -> Self {
        Self {
            source,
            cache: RetrievalCache::new(capacity),
        }
    }

    /// Same contract as [`retrieve`]; failures are never cached.
    pub async fn retrieve(&self, video_id: &str, languages: &[String]) -> Result<Arc<TranscriptResult>, TranscriptError> {
        if let Some(hit) = self.cache.get(video_id, languages) {
            return Ok(hit);
        }
        let result = Arc::new(retrieve(&self.source, video_id, languages).await?);
        self.cache.insert(languages, Arc::clone(&result));
        Ok(result)
    }

    pub fn cache(&self) -> &RetrievalCache {
        &self.cache
    }
}
