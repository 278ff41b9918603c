//! # Lessonforge Core
//!
//! Domain types, traits, and error definitions for the Lessonforge
//! lesson-planning agent. This crate has **zero framework dependencies** —
//! it defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (LLM provider, knowledge retrieval,
//! capabilities) is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod knowledge;
pub mod lesson;
pub mod message;
pub mod provider;
pub mod tool;
pub mod transcript;

// Re-export key types at crate root for ergonomics
pub use error::{CapabilityError, Error, ProviderError, Result, StoreError};
pub use knowledge::KnowledgeStore;
pub use lesson::{
    DifficultyLevel, LearnerProfile, LessonPlan, LessonPlanSection, LessonRequest,
    QualityMetrics, QualityRating,
};
pub use message::{Conversation, Message, MessageToolCall, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition, Usage};
pub use tool::{Capability, CapabilityCall, CapabilityRegistry, CapabilityResult};
pub use transcript::{ReasoningStep, Transcript};
