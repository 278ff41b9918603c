//! KnowledgeStore trait — the abstraction over passage retrieval.
//!
//! The retrieval backend is an opaque collaborator: given a text query it
//! returns an ordered list of relevant passages. The core only consumes
//! that list; similarity mechanics live in the implementing crate.

use async_trait::async_trait;

use crate::error::StoreError;

/// A store of text passages the search capability queries.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// A human-readable name for this store (e.g., "file", "memory").
    fn name(&self) -> &str;

    /// Return up to `k` passages relevant to `query`, most relevant first.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<String>, StoreError>;

    /// Add passages to the store.
    async fn add(&self, passages: Vec<String>) -> Result<(), StoreError>;

    /// Number of passages currently stored.
    async fn count(&self) -> Result<usize, StoreError>;
}
