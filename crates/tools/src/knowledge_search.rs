//! Knowledge base search capability.
//!
//! Queries the passage store and formats matches as numbered source blocks
//! the decision model can cite from.

use async_trait::async_trait;
use lessonforge_core::error::CapabilityError;
use lessonforge_core::knowledge::KnowledgeStore;
use lessonforge_core::tool::{Capability, CapabilityResult};
use std::sync::Arc;
use tracing::{debug, info};

use crate::input::CapabilityInput;

/// Searches the knowledge store for passages relevant to a query.
pub struct KnowledgeSearch {
    store: Arc<dyn KnowledgeStore>,
    search_k: usize,
}

impl KnowledgeSearch {
    pub fn new(store: Arc<dyn KnowledgeStore>, search_k: usize) -> Self {
        Self { store, search_k }
    }
}

#[async_trait]
impl Capability for KnowledgeSearch {
    fn name(&self) -> &str {
        "search_knowledge_base"
    }

    fn description(&self) -> &str {
        "Search the knowledge base for relevant educational content. \
         Input should be a clear search query related to the lesson topic. \
         Returns relevant excerpts from uploaded educational materials."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query related to the lesson topic"
                },
                "top_k": {
                    "type": "integer",
                    "description": "Maximum number of passages to return"
                }
            },
            "required": ["query"]
        })
    }

    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CapabilityResult, CapabilityError> {
        let input = CapabilityInput::parse(arguments);

        let query = match input.str_field("query", "query") {
            Some(q) if !q.trim().is_empty() => q,
            _ => return Ok(CapabilityResult::failure("missing 'query' field")),
        };

        let k = input
            .u32_field("top_k")
            .map(|v| v as usize)
            .filter(|v| *v > 0)
            .unwrap_or(self.search_k);

        info!(query = %query, k, "Searching knowledge base");

        let passages = match self.store.search(&query, k).await {
            Ok(p) => p,
            Err(e) => {
                return Ok(CapabilityResult::failure(format!(
                    "searching knowledge base: {e}"
                )));
            }
        };

        debug!(found = passages.len(), "Knowledge search complete");

        if passages.is_empty() {
            return Ok(CapabilityResult::ok(
                "No relevant content found in knowledge base.",
            ));
        }

        let blocks: Vec<String> = passages
            .iter()
            .enumerate()
            .map(|(i, content)| format!("Source {}:\n{}\n", i + 1, content))
            .collect();

        Ok(CapabilityResult::ok(blocks.join("\n---\n")))
    }
}
