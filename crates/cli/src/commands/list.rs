//! `lessonforge list` — List stored lesson plans.

use lessonforge_config::AppConfig;
use lessonforge_lessons::LessonStore;

pub fn run(limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = LessonStore::open(&config.lessons.dir)?;

    let lessons = store.list(limit)?;
    if lessons.is_empty() {
        println!("  No lessons stored yet. Run `lessonforge generate <topic>` first.");
        return Ok(());
    }

    println!("  {} lesson(s):", lessons.len());
    println!();
    for summary in lessons {
        let score = summary
            .quality_score
            .map(|s| format!("{s:.2}"))
            .unwrap_or_else(|| "N/A".into());
        println!(
            "  {}  {}  [{}]  quality {}  ({})",
            summary.created_at.format("%Y-%m-%d %H:%M"),
            summary.topic,
            summary.difficulty_level,
            score,
            summary.lesson_id,
        );
    }
    Ok(())
}
