//! Built-in agent capabilities for Lessonforge.
//!
//! Three capabilities back the reasoning loop: knowledge base search,
//! lesson structure generation, and difficulty adjustment. All of them
//! parse their arguments defensively (see [`input::CapabilityInput`]) and
//! report bad input as failure observations rather than errors, so the
//! loop keeps running.

pub mod difficulty_adjust;
pub mod input;
pub mod knowledge_search;
pub mod lesson_structure;

pub use difficulty_adjust::DifficultyAdjust;
pub use input::CapabilityInput;
pub use knowledge_search::KnowledgeSearch;
pub use lesson_structure::LessonStructure;

use lessonforge_core::knowledge::KnowledgeStore;
use lessonforge_core::tool::CapabilityRegistry;
use std::sync::Arc;

/// Build the standard capability registry for lesson generation.
pub fn default_registry(store: Arc<dyn KnowledgeStore>, search_k: usize) -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::new();
    registry.register(Box::new(KnowledgeSearch::new(store, search_k)));
    registry.register(Box::new(LessonStructure));
    registry.register(Box::new(DifficultyAdjust));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessonforge_knowledge::InMemoryStore;

    #[test]
    fn default_registry_has_three_capabilities() {
        let registry = default_registry(Arc::new(InMemoryStore::new()), 5);
        let mut names = registry.names();
        names.sort();
        assert_eq!(
            names,
            vec![
                "adjust_difficulty",
                "generate_lesson_structure",
                "search_knowledge_base"
            ]
        );
    }

    #[test]
    fn definitions_carry_schemas() {
        let registry = default_registry(Arc::new(InMemoryStore::new()), 5);
        for def in registry.definitions() {
            assert_eq!(def.parameters["type"], "object");
            assert!(!def.description.is_empty());
        }
    }
}
