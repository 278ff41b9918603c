//! Lesson plan quality evaluation.
//!
//! Produces a [`QualityMetrics`] from a generated plan, the passages the
//! agent retrieved, and the steps it took. Four sub-scores feed a weighted
//! composite:
//!
//! - relevance (0.3): keyword overlap between lesson text and sources
//! - citation accuracy (0.2): indicator phrases plus source references
//! - completeness (0.3): per-field minimum counts across six fields
//! - agent efficiency (0.2): step count against the 3-6 sweet spot
//!
//! Every sub-score is a total function over its inputs; degenerate inputs
//! map to fixed neutral values rather than errors.

use lessonforge_core::lesson::{LessonPlan, QualityMetrics, QualityRating};
use std::collections::HashSet;
use tracing::{debug, info};

const RELEVANCE_WEIGHT: f64 = 0.3;
const CITATION_WEIGHT: f64 = 0.2;
const COMPLETENESS_WEIGHT: f64 = 0.3;
const EFFICIENCY_WEIGHT: f64 = 0.2;

/// Phrases that count as citation indicators in lesson text.
const CITATION_INDICATORS: [&str; 8] = [
    "according to",
    "based on",
    "as stated in",
    "the document shows",
    "research indicates",
    "studies show",
    "as mentioned",
    "source",
];

/// Per-field minimum counts for full completeness credit.
const COMPLETENESS_MINIMA: [usize; 6] = [3, 2, 3, 3, 2, 2];

/// Evaluates lesson plan quality.
#[derive(Debug, Default)]
pub struct LessonEvaluator;

impl LessonEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a lesson plan against the retrieved passages and the
    /// steps the agent took.
    pub fn evaluate(
        &self,
        plan: &LessonPlan,
        search_results: &[String],
        agent_steps: &[String],
    ) -> QualityMetrics {
        let relevance_score = self.relevance(plan, search_results);
        let citation_accuracy = self.citation_accuracy(plan, search_results);
        let completeness_score = self.completeness(plan);
        let agent_efficiency = self.efficiency(agent_steps);

        let quality_score = relevance_score * RELEVANCE_WEIGHT
            + citation_accuracy * CITATION_WEIGHT
            + completeness_score * COMPLETENESS_WEIGHT
            + agent_efficiency * EFFICIENCY_WEIGHT;

        info!(quality_score = %format!("{quality_score:.2}"), "Evaluation completed");

        QualityMetrics {
            relevance_score,
            citation_accuracy,
            completeness_score,
            agent_efficiency,
            quality_score,
            quality_rating: QualityRating::from_score(quality_score),
        }
    }

    /// Keyword overlap between lesson text and source passages.
    ///
    /// The raw overlap fraction is rescaled into [0.3, 1.0] so sparse but
    /// non-empty overlap does not tank the composite.
    fn relevance(&self, plan: &LessonPlan, search_results: &[String]) -> f64 {
        if search_results.is_empty() {
            return 0.5; // Neutral when nothing was retrieved
        }

        let lesson_keywords = content_words(&lesson_text(plan));
        let source_keywords = content_words(&search_results.join(" "));

        if source_keywords.is_empty() {
            return 0.5;
        }

        let common = lesson_keywords.intersection(&source_keywords).count();
        let relevance = common as f64 / source_keywords.len() as f64;
        let normalized = 0.3 + relevance * 0.7;

        debug!(common_keywords = common, "Relevance score calculated");

        normalized.min(1.0)
    }

    /// How well the lesson references its sources.
    fn citation_accuracy(&self, plan: &LessonPlan, search_results: &[String]) -> f64 {
        if search_results.is_empty() {
            return 0.0;
        }

        let text = lesson_text(plan).to_lowercase();
        let citation_count = CITATION_INDICATORS
            .iter()
            .filter(|phrase| text.contains(**phrase))
            .count();

        let has_source_references = plan.content_outline.iter().any(|section| {
            let section_text = format!("{} {}", section.title, section.content).to_lowercase();
            section_text.contains("source") || section_text.contains("document")
        });

        let has_material_references = !plan.resources.is_empty();

        let mut score: f64 = 0.0;
        if citation_count > 0 {
            score += 0.4;
        }
        if citation_count >= 3 {
            score += 0.2;
        }
        if has_source_references {
            score += 0.2;
        }
        if has_material_references {
            score += 0.2;
        }

        debug!(citation_count, "Citation accuracy calculated");

        score.min(1.0)
    }

    /// Per-field minimum counts: full credit at the minimum, half credit
    /// for anything non-empty below it.
    fn completeness(&self, plan: &LessonPlan) -> f64 {
        let field_counts = [
            plan.objectives.len(),
            plan.prerequisites.len(),
            plan.content_outline.len(),
            plan.activities.len(),
            plan.assessments.len(),
            plan.resources.len(),
        ];

        let score: f64 = field_counts
            .iter()
            .zip(COMPLETENESS_MINIMA.iter())
            .map(|(count, min)| {
                if count >= min {
                    1.0
                } else if *count > 0 {
                    0.5
                } else {
                    0.0
                }
            })
            .sum();

        score / COMPLETENESS_MINIMA.len() as f64
    }

    /// Step count against the 3-6 sweet spot.
    fn efficiency(&self, agent_steps: &[String]) -> f64 {
        if agent_steps.is_empty() {
            return 0.5;
        }

        match agent_steps.len() {
            3..=6 => 1.0,
            1..=2 => 0.6,
            7..=10 => 0.8,
            _ => 0.5,
        }
    }
}

/// All evaluable text of a plan: objectives, prerequisites, outline titles
/// and contents, activities, and assessments. Resources are deliberately
/// not part of the relevance surface.
fn lesson_text(plan: &LessonPlan) -> String {
    let mut parts: Vec<&str> = Vec::new();
    parts.extend(plan.objectives.iter().map(String::as_str));
    parts.extend(plan.prerequisites.iter().map(String::as_str));
    for section in &plan.content_outline {
        parts.push(&section.title);
        parts.push(&section.content);
    }
    parts.extend(plan.activities.iter().map(String::as_str));
    parts.extend(plan.assessments.iter().map(String::as_str));
    parts.join(" ")
}

/// Lowercased word tokens of length >= 5. Words are maximal runs of
/// alphanumeric characters or underscores; shorter runs are noise.
fn content_words(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| w.chars().count() >= 5)
        .map(String::from)
        .collect()
}
