//! Knowledge store backends for Lessonforge.
//!
//! Passages ingested from course material are stored here and surfaced to
//! the reasoning loop through the search capability. Two backends:
//!
//! - [`FileStore`] — persistent JSONL storage, the default
//! - [`InMemoryStore`] — ephemeral, used in tests and one-off sessions

pub mod file_store;
pub mod in_memory;

pub use file_store::FileStore;
pub use in_memory::InMemoryStore;

/// Score a passage against a query by keyword overlap.
///
/// Both texts are lowercased and split into alphanumeric words; the score
/// is the number of distinct query words appearing in the passage, scaled
/// by query length. A passage containing every query word scores 1.0.
pub(crate) fn overlap_score(query: &str, passage: &str) -> f32 {
    let query_words: std::collections::HashSet<String> = words_of(query).into_iter().collect();
    if query_words.is_empty() {
        return 0.0;
    }
    let passage_words: std::collections::HashSet<String> =
        words_of(passage).into_iter().collect();

    let hits = query_words
        .iter()
        .filter(|w| passage_words.contains(*w))
        .count();

    hits as f32 / query_words.len() as f32
}

fn words_of(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}
