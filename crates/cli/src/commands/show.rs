//! `lessonforge show` — Print a stored lesson plan.

use lessonforge_config::AppConfig;
use lessonforge_core::lesson::LessonPlan;
use lessonforge_lessons::LessonStore;

pub fn run(lesson_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = LessonStore::open(&config.lessons.dir)?;

    let plan = store.load(lesson_id)?;
    print_plan(&plan);
    Ok(())
}

pub fn print_plan(plan: &LessonPlan) {
    println!("  {} ({} minutes, {})", plan.topic, plan.duration_minutes, plan.difficulty_level);
    println!("  id: {}", plan.lesson_id);
    println!();

    println!("  Objectives:");
    for item in &plan.objectives {
        println!("    - {item}");
    }

    println!();
    println!("  Prerequisites:");
    for item in &plan.prerequisites {
        println!("    - {item}");
    }

    println!();
    println!("  Outline:");
    for section in &plan.content_outline {
        match section.duration_minutes {
            Some(mins) => println!("    {} ({} min)", section.title, mins),
            None => println!("    {}", section.title),
        }
        println!("      {}", section.content);
    }

    println!();
    println!("  Activities:");
    for item in &plan.activities {
        println!("    - {item}");
    }

    println!();
    println!("  Assessments:");
    for item in &plan.assessments {
        println!("    - {item}");
    }

    println!();
    println!("  Resources:");
    for item in &plan.resources {
        println!("    - {item}");
    }

    if plan.is_fallback() {
        println!();
        println!("  (structuring fallback: content preserved as a single section)");
    }
}
