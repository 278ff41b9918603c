//! Lesson plan storage — one JSON file per plan.
//!
//! Layout under the store directory:
//!
//! ```text
//! lessons/
//!   <lesson_id>.json
//!   feedback/
//!     <feedback_id>.json
//! ```

use chrono::{DateTime, Utc};
use lessonforge_core::error::StoreError;
use lessonforge_core::lesson::{DifficultyLevel, LessonPlan};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

/// A one-line summary of a stored lesson, for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonSummary {
    pub lesson_id: String,
    pub topic: String,
    pub difficulty_level: DifficultyLevel,
    pub created_at: DateTime<Utc>,
    /// Composite quality score, if the plan was evaluated.
    pub quality_score: Option<f64>,
}

/// User feedback on a generated lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub feedback_id: String,
    pub lesson_id: String,
    /// 1 to 5
    pub rating: u8,
    pub feedback_text: String,
    pub helpful: bool,
    pub timestamp: DateTime<Utc>,
}

/// Directory-backed lesson plan storage.
pub struct LessonStore {
    dir: PathBuf,
}

impl LessonStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            StoreError::Storage(format!("Failed to create lessons directory: {e}"))
        })?;
        Ok(Self { dir })
    }

    fn lesson_path(&self, lesson_id: &str) -> PathBuf {
        self.dir.join(format!("{lesson_id}.json"))
    }

    /// Persist a lesson plan.
    pub fn save(&self, plan: &LessonPlan) -> Result<(), StoreError> {
        let path = self.lesson_path(&plan.lesson_id);
        let json = serde_json::to_string_pretty(plan)
            .map_err(|e| StoreError::Storage(format!("Failed to serialize lesson: {e}")))?;
        std::fs::write(&path, json)
            .map_err(|e| StoreError::Storage(format!("Failed to write lesson file: {e}")))?;
        info!(lesson_id = %plan.lesson_id, path = %path.display(), "Lesson saved");
        Ok(())
    }

    /// Load a lesson plan by id.
    pub fn load(&self, lesson_id: &str) -> Result<LessonPlan, StoreError> {
        let path = self.lesson_path(lesson_id);
        if !path.exists() {
            return Err(StoreError::NotFound(lesson_id.to_string()));
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| StoreError::Storage(format!("Failed to read lesson file: {e}")))?;
        serde_json::from_str(&content)
            .map_err(|e| StoreError::Storage(format!("Failed to parse lesson file: {e}")))
    }

    /// List stored lessons, newest first, up to `limit`.
    ///
    /// Unreadable files are skipped with a warning rather than failing
    /// the whole listing.
    pub fn list(&self, limit: usize) -> Result<Vec<LessonSummary>, StoreError> {
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|e| StoreError::Storage(format!("Failed to read lessons directory: {e}")))?;

        let mut summaries: Vec<LessonSummary> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.path().extension().and_then(|e| e.to_str()) == Some("json")
            })
            .filter_map(|entry| match read_summary(&entry.path()) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "Skipping unreadable lesson file");
                    None
                }
            })
            .collect();

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summaries.truncate(limit);
        Ok(summaries)
    }

    /// Save feedback for a lesson under `feedback/`. Returns the feedback id.
    pub fn save_feedback(
        &self,
        lesson_id: &str,
        rating: u8,
        feedback_text: &str,
        helpful: bool,
    ) -> Result<String, StoreError> {
        if !(1..=5).contains(&rating) {
            return Err(StoreError::Storage(format!(
                "rating must be between 1 and 5, got {rating}"
            )));
        }

        let feedback_dir = self.dir.join("feedback");
        std::fs::create_dir_all(&feedback_dir).map_err(|e| {
            StoreError::Storage(format!("Failed to create feedback directory: {e}"))
        })?;

        let feedback = Feedback {
            feedback_id: Uuid::new_v4().to_string(),
            lesson_id: lesson_id.to_string(),
            rating,
            feedback_text: feedback_text.to_string(),
            helpful,
            timestamp: Utc::now(),
        };

        let path = feedback_dir.join(format!("{}.json", feedback.feedback_id));
        let json = serde_json::to_string_pretty(&feedback)
            .map_err(|e| StoreError::Storage(format!("Failed to serialize feedback: {e}")))?;
        std::fs::write(&path, json)
            .map_err(|e| StoreError::Storage(format!("Failed to write feedback file: {e}")))?;

        info!(feedback_id = %feedback.feedback_id, lesson_id, "Feedback saved");
        Ok(feedback.feedback_id)
    }
}

fn read_summary(path: &Path) -> Result<LessonSummary, StoreError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| StoreError::Storage(e.to_string()))?;
    let plan: LessonPlan =
        serde_json::from_str(&content).map_err(|e| StoreError::Storage(e.to_string()))?;
    Ok(LessonSummary {
        quality_score: plan.quality_score(),
        lesson_id: plan.lesson_id,
        topic: plan.topic,
        difficulty_level: plan.difficulty_level,
        created_at: plan.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessonforge_core::lesson::{QualityMetrics, QualityRating};

    fn plan(id: &str, topic: &str, created_at: DateTime<Utc>) -> LessonPlan {
        LessonPlan {
            lesson_id: id.into(),
            topic: topic.into(),
            difficulty_level: DifficultyLevel::Intermediate,
            duration_minutes: 60,
            objectives: vec!["Objective".into()],
            prerequisites: vec![],
            content_outline: vec![],
            activities: vec![],
            assessments: vec![],
            resources: vec![],
            created_at,
            metadata: serde_json::Map::new(),
        }
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LessonStore::open(dir.path()).unwrap();

        let p = plan("abc", "Fractions", Utc::now());
        store.save(&p).unwrap();

        let loaded = store.load("abc").unwrap();
        assert_eq!(loaded.topic, "Fractions");
        assert_eq!(loaded.objectives, vec!["Objective"]);
    }

    #[test]
    fn load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LessonStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.load("missing"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn list_newest_first_with_limit() {
        let dir = tempfile::tempdir().unwrap();
        let store = LessonStore::open(dir.path()).unwrap();

        let base = Utc::now();
        store
            .save(&plan("a", "Oldest", base - chrono::Duration::hours(2)))
            .unwrap();
        store
            .save(&plan("b", "Middle", base - chrono::Duration::hours(1)))
            .unwrap();
        store.save(&plan("c", "Newest", base)).unwrap();

        let all = store.list(10).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].topic, "Newest");
        assert_eq!(all[2].topic, "Oldest");

        let limited = store.list(2).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[1].topic, "Middle");
    }

    #[test]
    fn list_skips_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = LessonStore::open(dir.path()).unwrap();

        store.save(&plan("ok", "Valid", Utc::now())).unwrap();
        std::fs::write(dir.path().join("broken.json"), "not json").unwrap();

        let listed = store.list(10).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].lesson_id, "ok");
    }

    #[test]
    fn list_includes_quality_score() {
        let dir = tempfile::tempdir().unwrap();
        let store = LessonStore::open(dir.path()).unwrap();

        let mut p = plan("scored", "Algebra", Utc::now());
        p.attach_metrics(&QualityMetrics {
            relevance_score: 0.8,
            citation_accuracy: 0.6,
            completeness_score: 0.9,
            agent_efficiency: 1.0,
            quality_score: 0.83,
            quality_rating: QualityRating::VeryGood,
        });
        store.save(&p).unwrap();

        let listed = store.list(10).unwrap();
        assert_eq!(listed[0].quality_score, Some(0.83));
    }

    #[test]
    fn feedback_rating_validated() {
        let dir = tempfile::tempdir().unwrap();
        let store = LessonStore::open(dir.path()).unwrap();

        assert!(store.save_feedback("x", 0, "bad", false).is_err());
        assert!(store.save_feedback("x", 6, "bad", false).is_err());

        let id = store.save_feedback("x", 4, "Helpful plan", true).unwrap();
        let path = dir.path().join("feedback").join(format!("{id}.json"));
        let content = std::fs::read_to_string(path).unwrap();
        let feedback: Feedback = serde_json::from_str(&content).unwrap();
        assert_eq!(feedback.rating, 4);
        assert!(feedback.helpful);
    }

    #[test]
    fn feedback_files_not_listed_as_lessons() {
        let dir = tempfile::tempdir().unwrap();
        let store = LessonStore::open(dir.path()).unwrap();
        store.save(&plan("a", "Topic", Utc::now())).unwrap();
        store.save_feedback("a", 5, "Great", true).unwrap();

        // feedback/ is a subdirectory; only top-level .json files count
        let listed = store.list(10).unwrap();
        assert_eq!(listed.len(), 1);
    }
}
