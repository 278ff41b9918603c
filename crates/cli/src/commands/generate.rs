//! `lessonforge generate` — Generate a lesson plan for a topic.

use lessonforge_agent::{prompt, DispatchLoop, Structurer};
use lessonforge_config::AppConfig;
use lessonforge_core::lesson::{DifficultyLevel, LearnerProfile, LessonRequest};
use lessonforge_eval::LessonEvaluator;
use lessonforge_knowledge::FileStore;
use lessonforge_lessons::{GenerationStatus, LessonService, LessonStore};
use std::str::FromStr;
use std::sync::Arc;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    topic: String,
    duration: u32,
    difficulty: String,
    age_group: Option<String>,
    prior_knowledge: Option<String>,
    objectives: Vec<String>,
    context: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early and give a clear error. Ollama runs
    // locally and needs none.
    if config.default_provider != "ollama" && !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    LESSONFORGE_API_KEY  (generic)");
        eprintln!("    OPENAI_API_KEY       (for OpenAI)");
        eprintln!("    GROQ_API_KEY         (for Groq)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let difficulty_level = DifficultyLevel::from_str(&difficulty)?;

    let request = LessonRequest {
        topic,
        duration_minutes: duration,
        learner_profile: LearnerProfile {
            age_group,
            difficulty_level,
            prior_knowledge,
            learning_objectives: if objectives.is_empty() {
                None
            } else {
                Some(objectives)
            },
        },
        additional_context: context,
    };

    let service = build_service(&config)?;

    eprintln!("  Generating lesson plan for: {}", request.topic);
    let outcome = service.generate(&request).await;

    match outcome.status {
        GenerationStatus::Completed => {
            let plan = outcome
                .lesson_plan
                .as_ref()
                .ok_or("completed outcome missing lesson plan")?;

            println!();
            println!("  Lesson generated: {}", outcome.lesson_id);
            println!();
            super::show::print_plan(plan);

            if let Some(metrics) = &outcome.evaluation_metrics {
                println!();
                println!("  Quality: {} ({:.2})", metrics.quality_rating, metrics.quality_score);
                println!("    relevance:    {:.2}", metrics.relevance_score);
                println!("    citations:    {:.2}", metrics.citation_accuracy);
                println!("    completeness: {:.2}", metrics.completeness_score);
                println!("    efficiency:   {:.2}", metrics.agent_efficiency);
            }

            println!();
            println!("  Agent steps:");
            for step in &outcome.agent_steps {
                println!("    - {step}");
            }
            Ok(())
        }
        GenerationStatus::Failed => {
            eprintln!();
            eprintln!("  Generation failed: {}", outcome.message);
            if !outcome.agent_steps.is_empty() {
                eprintln!("  Steps completed before failure:");
                for step in &outcome.agent_steps {
                    eprintln!("    - {step}");
                }
            }
            Err(outcome.message.into())
        }
    }
}

/// Wire the full pipeline from configuration.
pub fn build_service(config: &AppConfig) -> Result<LessonService, Box<dyn std::error::Error>> {
    let provider = Arc::new(lessonforge_providers::build_from_config(config)?);
    let knowledge = Arc::new(FileStore::new(config.knowledge.path.clone()));
    let registry = Arc::new(lessonforge_tools::default_registry(
        knowledge,
        config.knowledge.search_k,
    ));

    let dispatch = DispatchLoop::new(
        provider.clone(),
        &config.default_model,
        config.agent.temperature,
        registry,
        prompt::SYSTEM_PROMPT,
    )
    .with_max_iterations(config.agent.max_iterations);

    let structurer = Structurer::new(provider, &config.default_model, config.agent.temperature);
    let store = LessonStore::open(&config.lessons.dir)?;

    Ok(LessonService::new(
        dispatch,
        structurer,
        LessonEvaluator::new(),
        store,
    ))
}
