//! In-memory knowledge store — no persistence.
//!
//! Same ranking behavior as the file store, without the disk round trip.
//! Used in tests and for sessions where nothing has been ingested yet.

use async_trait::async_trait;
use lessonforge_core::error::StoreError;
use lessonforge_core::knowledge::KnowledgeStore;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An ephemeral passage store.
#[derive(Default)]
pub struct InMemoryStore {
    passages: Arc<RwLock<Vec<String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with passages.
    pub fn with_passages(passages: Vec<String>) -> Self {
        Self {
            passages: Arc::new(RwLock::new(passages)),
        }
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<String>, StoreError> {
        let passages = self.passages.read().await;

        let mut scored: Vec<(f32, &String)> = passages
            .iter()
            .map(|p| (crate::overlap_score(query, p), p))
            .filter(|(score, _)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored.into_iter().map(|(_, p)| p.clone()).collect())
    }

    async fn add(&self, texts: Vec<String>) -> Result<(), StoreError> {
        let mut passages = self.passages.write().await;
        passages.extend(texts.into_iter().filter(|t| !t.trim().is_empty()));
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.passages.read().await.len())
    }
}
