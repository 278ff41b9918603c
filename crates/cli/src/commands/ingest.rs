//! `lessonforge ingest` — Add course material to the knowledge base.
//!
//! Files are read as plain text and split on blank lines, one passage per
//! paragraph.

use lessonforge_config::AppConfig;
use lessonforge_core::knowledge::KnowledgeStore;
use lessonforge_knowledge::FileStore;
use std::path::PathBuf;

pub async fn run(files: Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    if files.is_empty() {
        return Err("No files given. Usage: lessonforge ingest <file>...".into());
    }

    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = FileStore::new(config.knowledge.path.clone());

    let mut total = 0usize;
    for file in &files {
        let content = std::fs::read_to_string(file)
            .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;

        let passages = split_passages(&content);
        let count = passages.len();
        store.add(passages).await?;

        println!("  {}: {} passage(s)", file.display(), count);
        total += count;
    }

    println!();
    println!(
        "  Ingested {} passage(s). Knowledge base now holds {}.",
        total,
        store.count().await?
    );
    Ok(())
}

/// Split text into paragraph passages, dropping blanks.
fn split_passages(content: &str) -> Vec<String> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_become_passages() {
        let text = "First paragraph here.\n\nSecond one.\n\n\n\nThird.";
        let passages = split_passages(text);
        assert_eq!(passages.len(), 3);
        assert_eq!(passages[0], "First paragraph here.");
        assert_eq!(passages[2], "Third.");
    }

    #[test]
    fn whitespace_only_input_yields_nothing() {
        assert!(split_passages("\n\n   \n\n").is_empty());
    }
}
