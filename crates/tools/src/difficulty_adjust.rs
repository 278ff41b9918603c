//! Difficulty adjustment capability.
//!
//! Emits a JSON adjustment guide: the original content plus per-level
//! rewriting guidance (vocabulary, concepts, activities, examples) for the
//! target difficulty. Unknown levels fall back to intermediate guidance.

use async_trait::async_trait;
use lessonforge_core::error::CapabilityError;
use lessonforge_core::tool::{Capability, CapabilityResult};
use tracing::info;

use crate::input::CapabilityInput;

/// Produces difficulty adjustment guidelines for lesson content.
pub struct DifficultyAdjust;

fn guidance_for(level: &str) -> serde_json::Value {
    match level.to_lowercase().as_str() {
        "beginner" => serde_json::json!({
            "vocabulary": "Use simple, everyday language. Avoid jargon.",
            "concepts": "Break down into small, digestible pieces. Use concrete examples.",
            "activities": "Provide step-by-step guidance. Include visual aids.",
            "examples": "Use familiar, real-world examples."
        }),
        "advanced" => serde_json::json!({
            "vocabulary": "Use technical terminology appropriately.",
            "concepts": "Explore complex relationships and abstract ideas.",
            "activities": "Encourage critical thinking and application.",
            "examples": "Use challenging, real-world scenarios."
        }),
        // "intermediate" and anything unrecognized
        _ => serde_json::json!({
            "vocabulary": "Introduce technical terms with clear definitions.",
            "concepts": "Build on foundational knowledge. Show connections.",
            "activities": "Encourage some independent problem-solving.",
            "examples": "Mix familiar and novel examples."
        }),
    }
}

#[async_trait]
impl Capability for DifficultyAdjust {
    fn name(&self) -> &str {
        "adjust_difficulty"
    }

    fn description(&self) -> &str {
        "Adjust content difficulty level for different learners. \
         Input should be a JSON string with: content, current_level, target_level, and age_group. \
         Returns guidelines for adjusting content to the appropriate difficulty level."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The content to adjust"
                },
                "current_level": {
                    "type": "string",
                    "description": "The content's current difficulty level"
                },
                "target_level": {
                    "type": "string",
                    "description": "The difficulty level to adjust toward"
                },
                "age_group": {
                    "type": "string",
                    "description": "Target learner age group"
                }
            },
            "required": ["content"]
        })
    }

    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CapabilityResult, CapabilityError> {
        let input = CapabilityInput::parse(arguments);

        let content = input.str_field_or("content", "content", "");
        let current_level = input.str_field_or("current_level", "", "intermediate");
        let target_level = input.str_field_or("target_level", "", "intermediate");
        let age_group = input.str_field("age_group", "").unwrap_or_default();

        info!(target_level = %target_level, "Adjusting content difficulty");

        let guide = serde_json::json!({
            "original_content": content,
            "current_level": current_level,
            "target_level": target_level,
            "age_group": age_group,
            "adjustment_guidelines": guidance_for(&target_level),
            "instructions": format!(
                "Rewrite the content to match {target_level} level, considering the age group: {age_group}"
            )
        });

        match serde_json::to_string_pretty(&guide) {
            Ok(text) => Ok(CapabilityResult::ok(text)),
            Err(e) => Ok(CapabilityResult::failure(e.to_string())),
        }
    }
}
