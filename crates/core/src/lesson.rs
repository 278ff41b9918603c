//! Lesson domain types.
//!
//! These are the value objects that flow through the generation pipeline:
//! a `LessonRequest` comes in, the agent produces a `LessonPlan`, and the
//! evaluator attaches `QualityMetrics` to it before it is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Minimum lesson duration accepted by a request.
pub const MIN_DURATION_MINUTES: u32 = 15;
/// Maximum lesson duration accepted by a request.
pub const MAX_DURATION_MINUTES: u32 = 180;

/// Target difficulty for generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl std::str::FromStr for DifficultyLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(Error::InvalidRequest(format!(
                "unknown difficulty level '{other}' (expected beginner, intermediate, or advanced)"
            ))),
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };
        write!(f, "{s}")
    }
}

/// Who the lesson is for. Immutable once embedded in a request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearnerProfile {
    /// Free text, e.g. "10-12", "13-15", "adult"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,

    #[serde(default)]
    pub difficulty_level: DifficultyLevel,

    /// Brief description of the learner's background
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_knowledge: Option<String>,

    /// Specific goals the learner wants to reach
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_objectives: Option<Vec<String>>,
}

/// An incoming lesson generation request. Read-only for the core pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonRequest {
    /// Main topic for the lesson
    pub topic: String,

    /// Lesson duration in minutes (15–180)
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,

    #[serde(default)]
    pub learner_profile: LearnerProfile,

    /// Any additional requirements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
}

fn default_duration() -> u32 {
    60
}

impl LessonRequest {
    /// Create a request for a topic with defaults for everything else.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            duration_minutes: default_duration(),
            learner_profile: LearnerProfile::default(),
            additional_context: None,
        }
    }

    /// Validate the request before any generation work starts.
    pub fn validate(&self) -> Result<(), Error> {
        if self.topic.trim().is_empty() {
            return Err(Error::InvalidRequest("topic must not be empty".into()));
        }
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&self.duration_minutes) {
            return Err(Error::InvalidRequest(format!(
                "duration_minutes must be between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES}, got {}",
                self.duration_minutes
            )));
        }
        Ok(())
    }
}

/// One section of the lesson's content outline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonPlanSection {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

/// A complete generated lesson plan.
///
/// Created once per successful generation. Never mutated afterwards except
/// to attach `evaluation_metrics` to `metadata` before persisting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonPlan {
    pub lesson_id: String,
    pub topic: String,
    pub difficulty_level: DifficultyLevel,
    pub duration_minutes: u32,
    pub objectives: Vec<String>,
    pub prerequisites: Vec<String>,
    pub content_outline: Vec<LessonPlanSection>,
    pub activities: Vec<String>,
    pub assessments: Vec<String>,
    pub resources: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl LessonPlan {
    /// Generate a fresh lesson id.
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Whether this plan was produced by the structuring fallback path.
    pub fn is_fallback(&self) -> bool {
        self.metadata
            .get("fallback")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }

    /// Attach evaluation metrics to the plan metadata.
    pub fn attach_metrics(&mut self, metrics: &QualityMetrics) {
        if let Ok(value) = serde_json::to_value(metrics) {
            self.metadata.insert("evaluation_metrics".into(), value);
        }
    }

    /// The composite quality score, if this plan has been evaluated.
    pub fn quality_score(&self) -> Option<f64> {
        self.metadata
            .get("evaluation_metrics")?
            .get("quality_score")?
            .as_f64()
    }
}

/// Categorical rating derived from the composite quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityRating {
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    Good,
    Satisfactory,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    Unknown,
}

impl QualityRating {
    /// Fixed thresholds: ≥0.9 Excellent, ≥0.8 Very Good, ≥0.7 Good,
    /// ≥0.6 Satisfactory, else Needs Improvement.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Self::Excellent
        } else if score >= 0.8 {
            Self::VeryGood
        } else if score >= 0.7 {
            Self::Good
        } else if score >= 0.6 {
            Self::Satisfactory
        } else {
            Self::NeedsImprovement
        }
    }
}

impl std::fmt::Display for QualityRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::Satisfactory => "Satisfactory",
            Self::NeedsImprovement => "Needs Improvement",
            Self::Unknown => "Unknown",
        };
        write!(f, "{s}")
    }
}

/// Quality metrics for an evaluated lesson plan.
///
/// All sub-scores live in [0.0, 1.0]. The composite is the weighted sum
/// 0.3·relevance + 0.2·citation + 0.3·completeness + 0.2·efficiency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub relevance_score: f64,
    pub citation_accuracy: f64,
    pub completeness_score: f64,
    pub agent_efficiency: f64,
    pub quality_score: f64,
    pub quality_rating: QualityRating,
}

impl QualityMetrics {
    /// Metrics for the top-level failure path: all zeros, rating Unknown.
    pub fn unknown() -> Self {
        Self {
            relevance_score: 0.0,
            citation_accuracy: 0.0,
            completeness_score: 0.0,
            agent_efficiency: 0.0,
            quality_score: 0.0,
            quality_rating: QualityRating::Unknown,
        }
    }
}
