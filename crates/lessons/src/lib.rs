//! Lesson generation service and storage for Lessonforge.

pub mod service;
pub mod store;

pub use service::{GenerationStatus, LessonOutcome, LessonService};
pub use store::{Feedback, LessonStore, LessonSummary};
