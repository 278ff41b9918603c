//! Lesson plan structuring.
//!
//! The reasoning loop produces free text; this module turns it into a
//! typed [`LessonPlan`] with one structuring call to the model. The model
//! is held to a JSON-only, six-field contract. If its output still fails
//! to parse, a deterministic fallback plan wraps the raw text so the
//! pipeline always yields a usable plan.

use lessonforge_core::lesson::{LessonPlan, LessonPlanSection, LessonRequest};
use lessonforge_core::message::Message;
use lessonforge_core::provider::{Provider, ProviderRequest};
use lessonforge_core::Error;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Structures free-form lesson content into a typed plan.
pub struct Structurer {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
}

/// The six-field contract the structuring call must satisfy.
#[derive(Debug, Deserialize)]
struct StructuredLesson {
    #[serde(default)]
    objectives: Vec<String>,
    #[serde(default)]
    prerequisites: Vec<String>,
    #[serde(default)]
    content_outline: Vec<StructuredSection>,
    #[serde(default)]
    activities: Vec<String>,
    #[serde(default)]
    assessments: Vec<String>,
    #[serde(default)]
    resources: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct StructuredSection {
    title: String,
    content: String,
    #[serde(default)]
    duration_minutes: Option<u32>,
}

impl Structurer {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
        }
    }

    fn structure_prompt(content: &str, request: &LessonRequest) -> String {
        format!(
            "Given the following lesson plan content, extract and structure it into a JSON format.\n\n\
             Lesson Content:\n{content}\n\n\
             Original Request:\n\
             - Topic: {topic}\n\
             - Duration: {duration} minutes\n\
             - Difficulty: {difficulty}\n\n\
             IMPORTANT: Ensure the lesson plan references the source materials appropriately.\n\
             - In content sections, use phrases like \"Based on the course material...\" or \"According to the documentation...\"\n\
             - In the resources section, include \"Educational documents and course materials\"\n\
             - Make it clear that content is derived from uploaded educational resources\n\n\
             Please extract and format as JSON with these exact fields:\n\
             {{\n\
             \x20 \"objectives\": [\"list of learning objectives\"],\n\
             \x20 \"prerequisites\": [\"list of prerequisite knowledge/skills\"],\n\
             \x20 \"content_outline\": [\n\
             \x20   {{\"title\": \"section name\", \"content\": \"section description (reference sources where applicable)\", \"duration_minutes\": 15}}\n\
             \x20 ],\n\
             \x20 \"activities\": [\"list of activities\"],\n\
             \x20 \"assessments\": [\"list of assessment methods\"],\n\
             \x20 \"resources\": [\"list of resources and materials - MUST include reference to uploaded course materials\"]\n\
             }}\n\n\
             Ensure all lists have at least 3 items. Be specific and detailed.\n\
             Return ONLY the JSON, no other text.",
            topic = request.topic,
            duration = request.duration_minutes,
            difficulty = request.learner_profile.difficulty_level,
        )
    }

    /// Strip markdown code fences the model sometimes wraps JSON in.
    fn strip_fences(content: &str) -> &str {
        let trimmed = content.trim();
        let trimmed = trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
            .unwrap_or(trimmed);
        trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
    }

    /// Structure the agent's free-text output into a lesson plan.
    ///
    /// A provider failure here is a hard error; an unparseable response
    /// falls back to a minimal plan wrapping the raw content.
    pub async fn structure(
        &self,
        content: &str,
        request: &LessonRequest,
    ) -> Result<LessonPlan, Error> {
        let prompt = Self::structure_prompt(content, request);

        let provider_request = ProviderRequest {
            model: self.model.clone(),
            messages: vec![Message::user(prompt)],
            temperature: self.temperature,
            max_tokens: None,
            tools: Vec::new(),
        };

        let response = self.provider.complete(provider_request).await?;
        let body = Self::strip_fences(&response.message.content);

        match serde_json::from_str::<StructuredLesson>(body) {
            Ok(structured) => {
                info!(sections = structured.content_outline.len(), "Lesson structured");
                Ok(self.build_plan(structured, request))
            }
            Err(e) => {
                warn!(error = %e, "Structuring output unparseable, using fallback plan");
                Ok(fallback_plan(content, request))
            }
        }
    }

    fn build_plan(&self, structured: StructuredLesson, request: &LessonRequest) -> LessonPlan {
        let mut metadata = serde_json::Map::new();
        if let Ok(profile) = serde_json::to_value(&request.learner_profile) {
            metadata.insert("learner_profile".into(), profile);
        }
        if let Some(context) = &request.additional_context {
            metadata.insert("additional_context".into(), context.clone().into());
        }

        LessonPlan {
            lesson_id: LessonPlan::new_id(),
            topic: request.topic.clone(),
            difficulty_level: request.learner_profile.difficulty_level,
            duration_minutes: request.duration_minutes,
            objectives: structured.objectives,
            prerequisites: structured.prerequisites,
            content_outline: structured
                .content_outline
                .into_iter()
                .map(|s| LessonPlanSection {
                    title: s.title,
                    content: s.content,
                    duration_minutes: s.duration_minutes,
                })
                .collect(),
            activities: structured.activities,
            assessments: structured.assessments,
            resources: structured.resources,
            created_at: chrono::Utc::now(),
            metadata,
        }
    }
}

/// The deterministic fallback: a minimal plan carrying the raw content.
pub fn fallback_plan(content: &str, request: &LessonRequest) -> LessonPlan {
    let mut metadata = serde_json::Map::new();
    metadata.insert("fallback".into(), true.into());

    LessonPlan {
        lesson_id: LessonPlan::new_id(),
        topic: request.topic.clone(),
        difficulty_level: request.learner_profile.difficulty_level,
        duration_minutes: request.duration_minutes,
        objectives: vec!["Complete the lesson content".into()],
        prerequisites: vec!["Basic understanding of the topic".into()],
        content_outline: vec![LessonPlanSection {
            title: "Lesson Content".into(),
            content: content.to_string(),
            duration_minutes: Some(request.duration_minutes),
        }],
        activities: vec!["Review the content".into(), "Practice exercises".into()],
        assessments: vec!["Knowledge check".into(), "Practical application".into()],
        resources: vec!["Course materials".into()],
        created_at: chrono::Utc::now(),
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::SequentialMockProvider;
    use lessonforge_core::lesson::DifficultyLevel;

    const VALID_JSON: &str = r#"{
        "objectives": ["Understand fractions", "Compare fractions", "Add fractions"],
        "prerequisites": ["Whole number arithmetic", "Number line familiarity"],
        "content_outline": [
            {"title": "Introduction", "content": "Based on the course material, fractions...", "duration_minutes": 6},
            {"title": "Main Content", "content": "Core concepts", "duration_minutes": 30},
            {"title": "Practice", "content": "Exercises", "duration_minutes": 24}
        ],
        "activities": ["Fraction strips", "Pair work", "Quiz game"],
        "assessments": ["Exit ticket", "Worksheet"],
        "resources": ["Course materials from uploaded documents", "Fraction strips"]
    }"#;

    fn structurer_returning(text: &str) -> Structurer {
        Structurer::new(
            Arc::new(SequentialMockProvider::single_text(text)),
            "mock-model",
            0.7,
        )
    }

    #[tokio::test]
    async fn valid_json_becomes_typed_plan() {
        let structurer = structurer_returning(VALID_JSON);
        let request = LessonRequest::new("Fractions");

        let plan = structurer.structure("raw agent text", &request).await.unwrap();
        assert_eq!(plan.topic, "Fractions");
        assert_eq!(plan.objectives.len(), 3);
        assert_eq!(plan.content_outline.len(), 3);
        assert_eq!(plan.content_outline[0].duration_minutes, Some(6));
        assert!(!plan.is_fallback());
        assert!(!plan.lesson_id.is_empty());
    }

    #[tokio::test]
    async fn fenced_json_is_accepted() {
        let fenced = format!("```json\n{VALID_JSON}\n```");
        let structurer = structurer_returning(&fenced);
        let request = LessonRequest::new("Fractions");

        let plan = structurer.structure("raw", &request).await.unwrap();
        assert!(!plan.is_fallback());
        assert_eq!(plan.objectives.len(), 3);
    }

    #[tokio::test]
    async fn unparseable_output_yields_fallback() {
        let structurer = structurer_returning("Sorry, I cannot produce JSON today.");
        let request = LessonRequest::new("Fractions");

        let plan = structurer.structure("the raw lesson text", &request).await.unwrap();
        assert!(plan.is_fallback());
        assert_eq!(plan.objectives, vec!["Complete the lesson content"]);
        assert_eq!(plan.content_outline.len(), 1);
        assert_eq!(plan.content_outline[0].title, "Lesson Content");
        assert_eq!(plan.content_outline[0].content, "the raw lesson text");
        assert_eq!(plan.content_outline[0].duration_minutes, Some(60));
        assert_eq!(plan.resources, vec!["Course materials"]);
    }

    #[tokio::test]
    async fn provider_failure_is_an_error() {
        let structurer = Structurer::new(
            Arc::new(SequentialMockProvider::always_fail()),
            "mock-model",
            0.7,
        );
        let request = LessonRequest::new("Fractions");
        assert!(structurer.structure("raw", &request).await.is_err());
    }

    #[test]
    fn fallback_carries_request_shape() {
        let mut request = LessonRequest::new("Cell Biology");
        request.duration_minutes = 90;
        request.learner_profile.difficulty_level = DifficultyLevel::Advanced;

        let plan = fallback_plan("content", &request);
        assert_eq!(plan.duration_minutes, 90);
        assert_eq!(plan.difficulty_level, DifficultyLevel::Advanced);
        assert!(plan.is_fallback());
    }

    #[test]
    fn fence_stripping_variants() {
        assert_eq!(Structurer::strip_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(Structurer::strip_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(Structurer::strip_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }
}
