//! Lesson structure generation capability.
//!
//! Emits a JSON template that allocates the requested duration across the
//! standard four-section arc and tells the decision model what to fill in
//! for each field. The model expands the template; this capability never
//! calls the LLM itself.

use async_trait::async_trait;
use lessonforge_core::error::CapabilityError;
use lessonforge_core::tool::{Capability, CapabilityResult};
use tracing::info;

use crate::input::CapabilityInput;

const DEFAULT_DURATION: u32 = 60;

/// Produces a structured lesson plan template.
pub struct LessonStructure;

#[async_trait]
impl Capability for LessonStructure {
    fn name(&self) -> &str {
        "generate_lesson_structure"
    }

    fn description(&self) -> &str {
        "Generate a structured lesson plan template. \
         Input should be a JSON string with: topic, duration, difficulty, and optional context. \
         Returns a structured template for creating comprehensive lesson plans."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "The lesson topic"
                },
                "duration": {
                    "type": "integer",
                    "description": "Total lesson duration in minutes"
                },
                "difficulty": {
                    "type": "string",
                    "enum": ["beginner", "intermediate", "advanced"],
                    "description": "Target difficulty level"
                },
                "context": {
                    "type": "string",
                    "description": "Additional context from the knowledge base"
                }
            },
            "required": ["topic"]
        })
    }

    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CapabilityResult, CapabilityError> {
        let input = CapabilityInput::parse(arguments);

        let topic = input.str_field_or("topic", "topic", "Unknown");
        let duration = input.u32_field("duration").unwrap_or(DEFAULT_DURATION);
        let difficulty = input.str_field_or("difficulty", "topic", "intermediate");
        let context = input.str_field("context", "").unwrap_or_default();

        info!(topic = %topic, duration, "Generating lesson structure");

        // Time allocation: 10% intro, 50% core, 25% practice, 15% wrap-up.
        // Widened to u64 so an absurd model-supplied duration cannot
        // overflow the percentage math.
        let minutes = u64::from(duration);
        let template = serde_json::json!({
            "topic": topic,
            "duration_minutes": duration,
            "difficulty_level": difficulty,
            "structure": {
                "objectives": "List 3-5 clear learning objectives that students should achieve",
                "prerequisites": "List prerequisite knowledge or skills needed",
                "content_outline": [
                    {
                        "section": "Introduction",
                        "duration": format!("{} minutes", minutes / 10),
                        "description": "Hook and overview"
                    },
                    {
                        "section": "Main Content",
                        "duration": format!("{} minutes", minutes / 2),
                        "description": "Core concepts and explanations"
                    },
                    {
                        "section": "Activities",
                        "duration": format!("{} minutes", minutes / 4),
                        "description": "Hands-on practice"
                    },
                    {
                        "section": "Assessment & Conclusion",
                        "duration": format!("{} minutes", minutes * 15 / 100),
                        "description": "Review and evaluation"
                    }
                ],
                "activities": "Suggest 3-5 engaging activities appropriate for the difficulty level",
                "assessments": "Suggest assessment methods to measure learning outcomes",
                "resources": "List recommended resources and materials"
            },
            "context": context
        });

        match serde_json::to_string_pretty(&template) {
            Ok(text) => Ok(CapabilityResult::ok(text)),
            Err(e) => Ok(CapabilityResult::failure(e.to_string())),
        }
    }
}
