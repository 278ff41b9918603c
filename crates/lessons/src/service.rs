//! The lesson generation service — orchestrates the full pipeline.
//!
//! validate → format task → dispatch loop → structure → evaluate → persist.
//!
//! Failures never surface as errors to the caller: they produce a failed
//! [`LessonOutcome`] carrying the message and whatever steps the agent
//! completed, and nothing is persisted.

use lessonforge_agent::prompt;
use lessonforge_agent::{DispatchLoop, Structurer};
use lessonforge_core::lesson::{LessonPlan, LessonRequest, QualityMetrics};
use lessonforge_eval::LessonEvaluator;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::store::LessonStore;

/// Terminal state of one generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Completed,
    Failed,
}

/// The result of one generation attempt, successful or not.
#[derive(Debug, Serialize, Deserialize)]
pub struct LessonOutcome {
    pub lesson_id: String,
    pub status: GenerationStatus,
    pub message: String,
    pub lesson_plan: Option<LessonPlan>,
    pub evaluation_metrics: Option<QualityMetrics>,
    /// Human-readable record of the steps the agent took, kept even on
    /// failure.
    pub agent_steps: Vec<String>,
}

impl LessonOutcome {
    fn failed(message: String, agent_steps: Vec<String>) -> Self {
        Self {
            lesson_id: Uuid::new_v4().to_string(),
            status: GenerationStatus::Failed,
            message,
            lesson_plan: None,
            evaluation_metrics: None,
            agent_steps,
        }
    }
}

/// Orchestrates lesson generation end to end.
pub struct LessonService {
    dispatch: DispatchLoop,
    structurer: Structurer,
    evaluator: LessonEvaluator,
    store: LessonStore,
}

impl LessonService {
    pub fn new(
        dispatch: DispatchLoop,
        structurer: Structurer,
        evaluator: LessonEvaluator,
        store: LessonStore,
    ) -> Self {
        Self {
            dispatch,
            structurer,
            evaluator,
            store,
        }
    }

    /// Generate, evaluate, and persist a lesson plan.
    pub async fn generate(&self, request: &LessonRequest) -> LessonOutcome {
        if let Err(e) = request.validate() {
            return LessonOutcome::failed(format!("Failed to generate lesson: {e}"), vec![]);
        }

        info!(topic = %request.topic, "Generating lesson");

        let task = prompt::format_task(request);

        let outcome = match self.dispatch.run(&task).await {
            Ok(o) => o,
            Err(failure) => {
                error!(error = %failure.error, "Lesson generation failed in dispatch");
                return LessonOutcome::failed(
                    format!("Failed to generate lesson: {}", failure.error),
                    failure.transcript.descriptions(),
                );
            }
        };

        let agent_steps = outcome.transcript.descriptions();

        let plan = match self.structurer.structure(&outcome.answer, request).await {
            Ok(p) => p,
            Err(e) => {
                error!(error = %e, "Lesson generation failed in structuring");
                return LessonOutcome::failed(
                    format!("Failed to generate lesson: {e}"),
                    agent_steps,
                );
            }
        };

        let search_results = outcome.transcript.search_observations();
        info!(
            search_results = search_results.len(),
            agent_steps = agent_steps.len(),
            "Evaluating lesson"
        );

        let metrics = self.evaluator.evaluate(&plan, &search_results, &agent_steps);

        let mut plan = plan;
        plan.attach_metrics(&metrics);

        if let Err(e) = self.store.save(&plan) {
            error!(error = %e, "Failed to persist lesson");
            return LessonOutcome::failed(format!("Failed to generate lesson: {e}"), agent_steps);
        }

        info!(
            lesson_id = %plan.lesson_id,
            quality_score = %format!("{:.2}", metrics.quality_score),
            "Lesson generated"
        );

        LessonOutcome {
            lesson_id: plan.lesson_id.clone(),
            status: GenerationStatus::Completed,
            message: "Lesson plan generated successfully".into(),
            lesson_plan: Some(plan),
            evaluation_metrics: Some(metrics),
            agent_steps,
        }
    }

    pub fn store(&self) -> &LessonStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessonforge_agent::test_helpers::*;
    use lessonforge_core::lesson::QualityRating;
    use lessonforge_knowledge::InMemoryStore;
    use std::sync::Arc;

    const STRUCTURED_JSON: &str = r#"{
        "objectives": ["According to the source material, explain fractions", "Compare fractions", "Add fractions"],
        "prerequisites": ["Counting", "Whole numbers"],
        "content_outline": [
            {"title": "Introduction", "content": "Based on the course material and source documents", "duration_minutes": 6},
            {"title": "Main Content", "content": "Core fraction concepts", "duration_minutes": 30},
            {"title": "Assessment", "content": "Review", "duration_minutes": 9}
        ],
        "activities": ["Fraction strips", "Pair work", "Game"],
        "assessments": ["Quiz", "Exit ticket"],
        "resources": ["Course materials from uploaded documents", "Manipulatives"]
    }"#;

    fn service_with(
        dispatch_provider: SequentialMockProvider,
        structure_provider: SequentialMockProvider,
        dir: &std::path::Path,
    ) -> LessonService {
        let store = Arc::new(InMemoryStore::with_passages(vec![
            "Fractions represent parts of a whole and compare quantities".into(),
        ]));
        let registry = Arc::new(lessonforge_tools::default_registry(store, 5));
        let dispatch = DispatchLoop::new(
            Arc::new(dispatch_provider),
            "mock-model",
            0.7,
            registry,
            prompt::SYSTEM_PROMPT,
        );
        let structurer = Structurer::new(Arc::new(structure_provider), "mock-model", 0.7);
        LessonService::new(
            dispatch,
            structurer,
            LessonEvaluator::new(),
            LessonStore::open(dir).unwrap(),
        )
    }

    #[tokio::test]
    async fn full_pipeline_completes_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let calls = vec![make_tool_call(
            "search_knowledge_base",
            serde_json::json!({"query": "fractions"}),
        )];
        let service = service_with(
            SequentialMockProvider::tool_then_answer(
                calls,
                "Searching",
                "A lesson plan about fractions",
            ),
            SequentialMockProvider::single_text(STRUCTURED_JSON),
            dir.path(),
        );

        let request = LessonRequest::new("Fractions");
        let outcome = service.generate(&request).await;

        assert_eq!(outcome.status, GenerationStatus::Completed);
        assert_eq!(outcome.agent_steps, vec!["Used capability: search_knowledge_base"]);

        let plan = outcome.lesson_plan.as_ref().unwrap();
        assert_eq!(plan.topic, "Fractions");
        let metrics = outcome.evaluation_metrics.as_ref().unwrap();
        assert!(metrics.quality_score > 0.0);
        assert_ne!(metrics.quality_rating, QualityRating::Unknown);

        // Persisted with metrics attached
        let loaded = service.store().load(&outcome.lesson_id).unwrap();
        assert!(loaded.quality_score().is_some());
    }

    #[tokio::test]
    async fn invalid_request_fails_without_generation() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(
            SequentialMockProvider::single_text("never called"),
            SequentialMockProvider::single_text("never called"),
            dir.path(),
        );

        let mut request = LessonRequest::new("Fractions");
        request.duration_minutes = 5;

        let outcome = service.generate(&request).await;
        assert_eq!(outcome.status, GenerationStatus::Failed);
        assert!(outcome.message.contains("duration_minutes"));
        assert!(outcome.lesson_plan.is_none());
        assert!(service.store().list(10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn dispatch_failure_preserves_steps_and_persists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let calls = vec![make_tool_call(
            "search_knowledge_base",
            serde_json::json!({"query": "fractions"}),
        )];
        let service = service_with(
            SequentialMockProvider::tool_then_fail(calls, "Searching"),
            SequentialMockProvider::single_text("never called"),
            dir.path(),
        );

        let outcome = service.generate(&LessonRequest::new("Fractions")).await;
        assert_eq!(outcome.status, GenerationStatus::Failed);
        assert_eq!(outcome.agent_steps, vec!["Used capability: search_knowledge_base"]);
        assert!(outcome.evaluation_metrics.is_none());
        assert!(service.store().list(10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn structuring_fallback_still_completes() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with(
            SequentialMockProvider::single_text("A free-text lesson plan"),
            SequentialMockProvider::single_text("no json here"),
            dir.path(),
        );

        let outcome = service.generate(&LessonRequest::new("Fractions")).await;
        assert_eq!(outcome.status, GenerationStatus::Completed);
        let plan = outcome.lesson_plan.unwrap();
        assert!(plan.is_fallback());
        assert_eq!(plan.content_outline[0].content, "A free-text lesson plan");
    }

    #[tokio::test]
    async fn evaluation_uses_search_observations() {
        let dir = tempfile::tempdir().unwrap();
        let calls = vec![make_tool_call(
            "search_knowledge_base",
            serde_json::json!({"query": "fractions"}),
        )];
        let service = service_with(
            SequentialMockProvider::tool_then_answer(calls, "Searching", "Plan text"),
            SequentialMockProvider::single_text(STRUCTURED_JSON),
            dir.path(),
        );

        let outcome = service.generate(&LessonRequest::new("Fractions")).await;
        let metrics = outcome.evaluation_metrics.unwrap();
        // With retrieved passages present, citation scoring is active and
        // this plan carries indicators, outline refs, and resources.
        assert!(metrics.citation_accuracy >= 0.8);
        // One step falls below the 3-step sweet spot.
        assert!((metrics.agent_efficiency - 0.6).abs() < 1e-9);
    }
}
