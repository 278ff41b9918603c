//! Reasoning loop and lesson structuring for Lessonforge.
//!
//! The generation pipeline lives here in two halves:
//! - [`DispatchLoop`] runs the bounded tool-dispatch session that produces
//!   free-text lesson content and a capability transcript;
//! - [`Structurer`] turns that free text into a typed `LessonPlan`, with a
//!   deterministic fallback when the structuring call misbehaves.

pub mod dispatch;
pub mod prompt;
pub mod structuring;
pub mod test_helpers;

pub use dispatch::{DispatchFailure, DispatchLoop, DispatchOutcome};
pub use structuring::{fallback_plan, Structurer};
