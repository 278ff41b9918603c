//! `lessonforge status` — Show configuration and store status.

use lessonforge_config::AppConfig;
use lessonforge_core::knowledge::KnowledgeStore;
use lessonforge_knowledge::FileStore;
use lessonforge_lessons::LessonStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!();
    println!("  Lessonforge status");
    println!();
    println!("  Provider:     {}", config.default_provider);
    println!("  Model:        {}", config.default_model);
    println!(
        "  API key:      {}",
        if config.has_api_key() { "configured" } else { "MISSING" }
    );
    println!("  Max steps:    {}", config.agent.max_iterations);
    println!("  Temperature:  {}", config.agent.temperature);
    println!();

    let knowledge = FileStore::new(config.knowledge.path.clone());
    println!(
        "  Knowledge:    {} passage(s) at {}",
        knowledge.count().await?,
        config.knowledge.path.display()
    );

    let lessons = LessonStore::open(&config.lessons.dir)?;
    println!(
        "  Lessons:      {} stored at {}",
        lessons.list(usize::MAX)?.len(),
        config.lessons.dir.display()
    );
    println!();

    Ok(())
}
