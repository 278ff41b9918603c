//! Capability trait — the abstraction over the agent's tools.
//!
//! Capabilities are the fixed set of functions the decision model can
//! invoke during a reasoning session: knowledge search, lesson structure
//! generation, difficulty adjustment. Each is a pure request→response
//! function with no shared mutable state between invocations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::CapabilityError;
use crate::provider::ToolDefinition;

/// A request to invoke a capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityCall {
    /// Unique call ID (matches the LLM's tool_call.id)
    pub id: String,

    /// Name of the capability to invoke
    pub name: String,

    /// Arguments as a JSON value (may be malformed relative to the schema)
    pub arguments: serde_json::Value,
}

/// The result of a capability invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityResult {
    /// Whether the invocation succeeded
    pub success: bool,

    /// The observation text appended to the transcript
    pub output: String,
}

impl CapabilityResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    /// A human-readable failure observation. Capabilities use this instead
    /// of raising on malformed input so the reasoning loop can continue.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: format!("Error: {}", message.into()),
        }
    }
}

/// The core Capability trait.
///
/// Implementations must parse their input defensively: attempt a
/// structured-JSON parse, fall back to treating the whole input as a
/// single default field, and never return `Err` for malformed input —
/// that case yields `CapabilityResult::failure` so the observation lands
/// in the transcript and the loop continues.
#[async_trait]
pub trait Capability: Send + Sync {
    /// The unique name of this capability (e.g., "search_knowledge_base").
    fn name(&self) -> &str;

    /// The contract surface presented to the decision model: expected
    /// input shape and what the output represents.
    fn description(&self) -> &str;

    /// JSON Schema describing this capability's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Invoke the capability with the given arguments.
    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CapabilityResult, CapabilityError>;

    /// Convert this capability into a ToolDefinition for the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available capabilities.
///
/// The dispatch loop uses this to:
/// 1. Get capability definitions to send to the LLM
/// 2. Look up and invoke capabilities when the LLM requests them
pub struct CapabilityRegistry {
    capabilities: HashMap<String, Box<dyn Capability>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self {
            capabilities: HashMap::new(),
        }
    }

    /// Register a capability. Replaces any existing one with the same name.
    pub fn register(&mut self, capability: Box<dyn Capability>) {
        let name = capability.name().to_string();
        self.capabilities.insert(name, capability);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Capability> {
        self.capabilities.get(name).map(|c| c.as_ref())
    }

    /// Get all capability definitions (for sending to the LLM).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.capabilities.values().map(|c| c.to_definition()).collect()
    }

    /// Invoke a capability call.
    pub async fn invoke(
        &self,
        call: &CapabilityCall,
    ) -> std::result::Result<CapabilityResult, CapabilityError> {
        let capability = self
            .capabilities
            .get(&call.name)
            .ok_or_else(|| CapabilityError::NotFound(call.name.clone()))?;
        capability.invoke(call.arguments.clone()).await
    }

    pub fn names(&self) -> Vec<&str> {
        self.capabilities.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
