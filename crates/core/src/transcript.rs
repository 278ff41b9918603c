//! Transcript types — the typed record of one reasoning session.
//!
//! The transcript is built directly during orchestration as capability
//! invocations happen, not reconstructed from logs afterwards. It is
//! append-only and bounded by the dispatch loop's iteration budget.

use serde::{Deserialize, Serialize};

/// One capability invocation and its observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningStep {
    /// Name of the capability invoked
    pub capability: String,
    /// The textual input the model chose
    pub input: String,
    /// The observation (capability output or error string)
    pub output: String,
}

/// Ordered, append-only record of capability invocations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    steps: Vec<ReasoningStep>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: ReasoningStep) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[ReasoningStep] {
        &self.steps
    }

    /// Human-readable step descriptions, used for efficiency scoring.
    pub fn descriptions(&self) -> Vec<String> {
        self.steps
            .iter()
            .map(|s| format!("Used capability: {}", s.capability))
            .collect()
    }

    /// Observations of steps whose capability name contains "search".
    ///
    /// These are the retrieved passages the evaluator grounds the
    /// relevance and citation sub-scores on.
    pub fn search_observations(&self) -> Vec<String> {
        self.steps
            .iter()
            .filter(|s| s.capability.to_lowercase().contains("search"))
            .map(|s| s.output.clone())
            .collect()
    }
}
