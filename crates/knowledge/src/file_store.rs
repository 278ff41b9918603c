//! File-based knowledge store — persistent JSON-lines storage.
//!
//! Each line of the file is a JSON-encoded [`Passage`]. Passages are loaded
//! into memory on creation and flushed to disk on every mutation, so reads
//! are fast and writes are durable.
//!
//! Default location: `~/.lessonforge/data/knowledge.jsonl`

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lessonforge_core::error::StoreError;
use lessonforge_core::knowledge::KnowledgeStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

/// A stored text passage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    pub id: String,
    pub content: String,
    pub added_at: DateTime<Utc>,
}

impl Passage {
    fn new(content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content,
            added_at: Utc::now(),
        }
    }
}

/// A file-backed passage store using JSONL (one JSON object per line).
pub struct FileStore {
    path: PathBuf,
    passages: Arc<RwLock<Vec<Passage>>>,
}

impl FileStore {
    /// Create a store at the given path.
    ///
    /// If the file exists, passages are loaded from it. If not, the store
    /// starts empty and the file is created on first write.
    pub fn new(path: PathBuf) -> Self {
        let passages = Self::load_from_disk(&path);
        debug!(path = %path.display(), count = passages.len(), "Knowledge store loaded");
        Self {
            path,
            passages: Arc::new(RwLock::new(passages)),
        }
    }

    fn load_from_disk(path: &PathBuf) -> Vec<Passage> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Vec::new(), // File doesn't exist yet
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<Passage>(line) {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!(error = %e, "Skipping corrupted passage entry");
                    None
                }
            })
            .collect()
    }

    /// Flush all passages to disk as JSONL.
    async fn flush(&self) -> Result<(), StoreError> {
        let passages = self.passages.read().await;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Storage(format!("Failed to create knowledge directory: {e}"))
            })?;
        }

        let mut content = String::new();
        for passage in passages.iter() {
            let line = serde_json::to_string(passage)
                .map_err(|e| StoreError::Storage(format!("Failed to serialize passage: {e}")))?;
            content.push_str(&line);
            content.push('\n');
        }

        std::fs::write(&self.path, &content)
            .map_err(|e| StoreError::Storage(format!("Failed to write knowledge file: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl KnowledgeStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<String>, StoreError> {
        let passages = self.passages.read().await;

        let mut scored: Vec<(f32, &Passage)> = passages
            .iter()
            .map(|p| (crate::overlap_score(query, &p.content), p))
            .filter(|(score, _)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored.into_iter().map(|(_, p)| p.content.clone()).collect())
    }

    async fn add(&self, texts: Vec<String>) -> Result<(), StoreError> {
        {
            let mut passages = self.passages.write().await;
            for text in texts {
                if text.trim().is_empty() {
                    continue;
                }
                passages.push(Passage::new(text));
            }
        }
        self.flush().await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.passages.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn add_and_search_persists() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_path_buf();
        drop(tmp);

        let store = FileStore::new(path.clone());
        store
            .add(vec!["Photosynthesis converts light into energy".into()])
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Photosynthesis"));

        // Reload from disk
        let store2 = FileStore::new(path);
        assert_eq!(store2.count().await.unwrap(), 1);
        let results = store2.search("photosynthesis", 5).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn search_ranks_by_overlap() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_path_buf();
        drop(tmp);

        let store = FileStore::new(path);
        store
            .add(vec![
                "Fractions represent parts of a whole".into(),
                "Decimal fractions and place value".into(),
                "The water cycle moves water through the atmosphere".into(),
            ])
            .await
            .unwrap();

        let results = store.search("fractions place value", 5).await.unwrap();
        assert_eq!(results.len(), 2);
        // Higher-overlap passage comes first
        assert!(results[0].contains("Decimal"));
    }

    #[tokio::test]
    async fn search_respects_k() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_path_buf();
        drop(tmp);

        let store = FileStore::new(path);
        store
            .add(vec![
                "algebra one".into(),
                "algebra two".into(),
                "algebra three".into(),
            ])
            .await
            .unwrap();

        let results = store.search("algebra", 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn blank_passages_skipped() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_path_buf();
        drop(tmp);

        let store = FileStore::new(path);
        store
            .add(vec!["   ".into(), "real content".into(), "".into()])
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn handles_missing_file_gracefully() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nope.jsonl"));
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.search("anything", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn handles_corrupted_lines() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(
            tmp,
            r#"{{"id":"1","content":"valid passage","added_at":"2026-01-01T00:00:00Z"}}"#
        )
        .unwrap();
        writeln!(tmp, "this is not json").unwrap();
        let path = tmp.path().to_path_buf();

        let store = FileStore::new(path);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
