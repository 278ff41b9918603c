//! Prompt construction for lesson generation.
//!
//! The system prompt defines the agent's role and citation rules; the task
//! prompt formats a [`LessonRequest`] into explicit specifications plus the
//! four-step working instructions.

use lessonforge_core::lesson::LessonRequest;

/// The system prompt for the lesson generation agent.
pub const SYSTEM_PROMPT: &str = "\
You are an expert educational content designer and AI agent specialized in creating personalized lesson plans.

Your capabilities:
1. Search educational knowledge bases for relevant content
2. Generate structured, comprehensive lesson plans
3. Adjust content difficulty based on learner profiles

Your task is to create high-quality, pedagogically sound lesson plans by:
- Analyzing the user's request carefully
- Searching the knowledge base for relevant educational content
- Generating a well-structured lesson plan with clear objectives
- Adjusting the difficulty level to match the learner profile
- Providing practical activities and assessments

**CRITICAL: Always cite your sources and reference the educational materials.**
- When using information from the knowledge base, acknowledge it (e.g., \"According to the source material...\")
- In the resources section, explicitly mention \"Course materials from uploaded documents\"
- Reference specific concepts that came from the knowledge base

Always think step-by-step and use your tools strategically.

When creating lesson plans, ensure they include:
- Clear learning objectives (what students will be able to do)
- Prerequisites (what students should know beforehand)
- Content outline (structured sections with timing)
- Engaging activities (hands-on, interactive)
- Assessment methods (how to measure learning)
- Resources and materials needed

Be thorough, pedagogically sound, and learner-focused.";

/// Format a lesson request into the task prompt for the reasoning loop.
pub fn format_task(request: &LessonRequest) -> String {
    let profile = &request.learner_profile;

    let mut prompt = format!(
        "Please create a comprehensive lesson plan with the following specifications:\n\n\
         Topic: {}\n\
         Duration: {} minutes\n\
         Difficulty Level: {}\n\
         Age Group: {}\n\
         Prior Knowledge: {}\n",
        request.topic,
        request.duration_minutes,
        profile.difficulty_level,
        profile.age_group.as_deref().unwrap_or("Not specified"),
        profile.prior_knowledge.as_deref().unwrap_or("Not specified"),
    );

    if let Some(objectives) = &profile.learning_objectives {
        if !objectives.is_empty() {
            prompt.push_str("\nSpecific Learning Objectives:\n");
            for obj in objectives {
                prompt.push_str(&format!("- {obj}\n"));
            }
        }
    }

    if let Some(context) = &request.additional_context {
        prompt.push_str(&format!("\nAdditional Context: {context}\n"));
    }

    prompt.push_str(
        "\nPlease follow these steps:\n\
         1. Search the knowledge base for relevant content about this topic\n\
         2. Generate a structured lesson plan template\n\
         3. If needed, adjust the content difficulty to match the learner profile\n\
         4. Create a comprehensive lesson plan with all required sections\n\n\
         Provide the final lesson plan in a clear, structured format.",
    );

    prompt
}
