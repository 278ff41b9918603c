//! `lessonforge feedback` — Record feedback on a lesson.

use lessonforge_config::AppConfig;
use lessonforge_lessons::LessonStore;

pub fn run(
    lesson_id: &str,
    rating: u8,
    text: &str,
    helpful: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = LessonStore::open(&config.lessons.dir)?;

    // Confirm the lesson exists before recording feedback against it
    store.load(lesson_id)?;

    let feedback_id = store.save_feedback(lesson_id, rating, text, helpful)?;
    println!("  Feedback recorded: {feedback_id}");
    Ok(())
}
