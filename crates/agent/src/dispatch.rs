//! The capability dispatch loop.
//!
//! One reasoning session: the task prompt goes to the decision model with
//! the capability definitions; each returned tool call is executed and its
//! observation fed back; a response with no tool calls is the final answer.
//!
//! The loop is bounded. When the iteration budget runs out, the last
//! assistant text stands in as the answer so partial work is not thrown
//! away. Capability failures become "Error: ..." observations and the loop
//! continues; only provider failures abort the session, and even then the
//! transcript built so far is preserved in the failure value.

use lessonforge_core::message::{Conversation, Message};
use lessonforge_core::provider::{Provider, ProviderRequest};
use lessonforge_core::tool::{CapabilityCall, CapabilityRegistry};
use lessonforge_core::transcript::{ReasoningStep, Transcript};
use lessonforge_core::Error;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A bounded tool-dispatch loop over a fixed capability registry.
pub struct DispatchLoop {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    capabilities: Arc<CapabilityRegistry>,
    system_prompt: String,
    max_iterations: u32,
}

/// The successful outcome of one reasoning session.
#[derive(Debug)]
pub struct DispatchOutcome {
    /// The final answer text.
    pub answer: String,
    /// Every capability invocation made during the session, in order.
    pub transcript: Transcript,
    /// Iterations consumed.
    pub iterations: u32,
}

/// A failed reasoning session. The transcript built before the failure
/// is preserved so callers can still report the steps taken.
#[derive(Debug)]
pub struct DispatchFailure {
    pub error: Error,
    pub transcript: Transcript,
}

impl std::fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl DispatchLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        capabilities: Arc<CapabilityRegistry>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            capabilities,
            system_prompt: system_prompt.into(),
            max_iterations: 10,
        }
    }

    /// Set the iteration budget.
    ///
    /// The budget bounds model turns, not individual tool calls: a single
    /// assistant turn may carry several tool calls, all of which are
    /// executed, so the transcript can hold more steps than iterations.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Run one reasoning session over the given task.
    pub async fn run(&self, task: &str) -> Result<DispatchOutcome, DispatchFailure> {
        let mut conversation = Conversation::with_task(&self.system_prompt, task);
        let mut transcript = Transcript::new();
        let tool_defs = self.capabilities.definitions();
        let mut last_assistant_text = String::new();

        info!(model = %self.model, max_iter = self.max_iterations, "Dispatch loop starting");

        for iteration in 1..=self.max_iterations {
            debug!(iteration, "Dispatch iteration");

            let request = ProviderRequest {
                model: self.model.clone(),
                messages: conversation.messages.clone(),
                temperature: self.temperature,
                max_tokens: None,
                tools: tool_defs.clone(),
            };

            let response = match self.provider.complete(request).await {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "Provider failed mid-session");
                    return Err(DispatchFailure {
                        error: Error::Provider(e),
                        transcript,
                    });
                }
            };

            if !response.message.content.is_empty() {
                last_assistant_text = response.message.content.clone();
            }

            // No tool calls means the model is done.
            if response.message.tool_calls.is_empty() {
                let answer = response.message.content.clone();
                info!(
                    iterations = iteration,
                    capability_calls = transcript.len(),
                    "Dispatch loop completed"
                );
                return Ok(DispatchOutcome {
                    answer,
                    transcript,
                    iterations: iteration,
                });
            }

            let tool_calls = response.message.tool_calls.clone();
            conversation.push(response.message);

            for tc in &tool_calls {
                let arguments: serde_json::Value =
                    serde_json::from_str(&tc.arguments).unwrap_or(serde_json::Value::Null);

                let call = CapabilityCall {
                    id: tc.id.clone(),
                    name: tc.name.clone(),
                    arguments,
                };

                let observation = match self.capabilities.invoke(&call).await {
                    Ok(result) => result.output,
                    Err(e) => format!("Error: {e}"),
                };

                debug!(capability = %tc.name, "Capability invoked");

                transcript.push(ReasoningStep {
                    capability: tc.name.clone(),
                    input: tc.arguments.clone(),
                    output: observation.clone(),
                });

                conversation.push(Message::tool_result(&tc.id, &observation));
            }
        }

        // Budget exhausted: the most recent assistant text is the best
        // answer available.
        warn!(max_iter = self.max_iterations, "Dispatch loop hit iteration budget");
        Ok(DispatchOutcome {
            answer: last_assistant_text,
            transcript,
            iterations: self.max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use lessonforge_knowledge::InMemoryStore;

    fn loop_with(provider: SequentialMockProvider) -> DispatchLoop {
        let store = Arc::new(InMemoryStore::with_passages(vec![
            "Fractions represent parts of a whole".into(),
        ]));
        let registry = Arc::new(lessonforge_tools::default_registry(store, 5));
        DispatchLoop::new(
            Arc::new(provider),
            "mock-model",
            0.7,
            registry,
            "You are a lesson planner.",
        )
    }

    #[tokio::test]
    async fn direct_answer_without_tools() {
        let dispatch = loop_with(SequentialMockProvider::single_text("Here is the plan"));
        let outcome = dispatch.run("Plan a lesson").await.unwrap();
        assert_eq!(outcome.answer, "Here is the plan");
        assert_eq!(outcome.iterations, 1);
        assert!(outcome.transcript.is_empty());
    }

    #[tokio::test]
    async fn tool_call_recorded_in_transcript() {
        let calls = vec![make_tool_call(
            "search_knowledge_base",
            serde_json::json!({"query": "fractions"}),
        )];
        let dispatch = loop_with(SequentialMockProvider::tool_then_answer(
            calls,
            "Searching first",
            "Final plan using Source 1",
        ));

        let outcome = dispatch.run("Plan a fractions lesson").await.unwrap();
        assert_eq!(outcome.answer, "Final plan using Source 1");
        assert_eq!(outcome.transcript.len(), 1);

        let step = &outcome.transcript.steps()[0];
        assert_eq!(step.capability, "search_knowledge_base");
        assert!(step.output.contains("Source 1"));
    }

    #[tokio::test]
    async fn unknown_capability_becomes_error_observation() {
        let calls = vec![make_tool_call("no_such_tool", serde_json::json!({}))];
        let dispatch = loop_with(SequentialMockProvider::tool_then_answer(
            calls,
            "Trying a tool",
            "Recovered and answered",
        ));

        let outcome = dispatch.run("Plan").await.unwrap();
        // Loop continued past the failure to the final answer.
        assert_eq!(outcome.answer, "Recovered and answered");
        assert_eq!(outcome.transcript.len(), 1);
        assert!(outcome.transcript.steps()[0].output.starts_with("Error: "));
    }

    #[tokio::test]
    async fn malformed_arguments_do_not_abort() {
        let tc = lessonforge_core::message::MessageToolCall {
            id: "call_bad".into(),
            name: "search_knowledge_base".into(),
            arguments: "{definitely not json".into(),
        };
        let dispatch = loop_with(SequentialMockProvider::tool_then_answer(
            vec![tc],
            "Calling with junk",
            "Still finished",
        ));

        let outcome = dispatch.run("Plan").await.unwrap();
        assert_eq!(outcome.answer, "Still finished");
        assert!(outcome.transcript.steps()[0].output.starts_with("Error: "));
    }

    #[tokio::test]
    async fn budget_exhaustion_returns_last_assistant_text() {
        // Provider never stops calling tools.
        let responses: Vec<_> = (0..5)
            .map(|i| {
                make_tool_call_response(
                    vec![make_tool_call(
                        "search_knowledge_base",
                        serde_json::json!({"query": "fractions"}),
                    )],
                    &format!("Thinking step {i}"),
                )
            })
            .collect();

        let dispatch =
            loop_with(SequentialMockProvider::new(responses)).with_max_iterations(3);

        let outcome = dispatch.run("Plan").await.unwrap();
        assert_eq!(outcome.iterations, 3);
        assert_eq!(outcome.answer, "Thinking step 2");
        assert_eq!(outcome.transcript.len(), 3);
    }

    #[tokio::test]
    async fn one_turn_with_multiple_tool_calls_executes_all() {
        // The budget bounds turns; a single turn's tool calls all run.
        let calls = vec![
            make_tool_call(
                "search_knowledge_base",
                serde_json::json!({"query": "fractions"}),
            ),
            make_tool_call(
                "generate_lesson_structure",
                serde_json::json!({"topic": "Fractions"}),
            ),
        ];
        let dispatch = loop_with(SequentialMockProvider::new(vec![
            make_tool_call_response(calls, "Doing both at once"),
        ]))
        .with_max_iterations(1);

        let outcome = dispatch.run("Plan").await.unwrap();
        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.transcript.len(), 2);
        assert_eq!(outcome.transcript.steps()[0].capability, "search_knowledge_base");
        assert_eq!(
            outcome.transcript.steps()[1].capability,
            "generate_lesson_structure"
        );
    }

    #[tokio::test]
    async fn provider_failure_preserves_transcript() {
        let calls = vec![make_tool_call(
            "search_knowledge_base",
            serde_json::json!({"query": "fractions"}),
        )];
        let dispatch = loop_with(SequentialMockProvider::tool_then_fail(
            calls,
            "Searching first",
        ));

        let failure = dispatch.run("Plan").await.unwrap_err();
        assert!(matches!(failure.error, Error::Provider(_)));
        // The step before the failure survives.
        assert_eq!(failure.transcript.len(), 1);
        assert_eq!(
            failure.transcript.steps()[0].capability,
            "search_knowledge_base"
        );
    }
}
