//! Shared test helpers for agent tests.

use lessonforge_core::error::ProviderError;
use lessonforge_core::message::{Message, MessageToolCall};
use lessonforge_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use std::sync::Mutex;

/// What the mock provider returns on a given call.
pub enum MockTurn {
    Respond(ProviderResponse),
    Fail(ProviderError),
}

/// A mock provider that returns a sequence of scripted responses.
///
/// Each call to `complete` consumes the next turn in the queue. Panics if
/// more calls are made than turns provided.
pub struct SequentialMockProvider {
    turns: Mutex<Vec<MockTurn>>,
    call_count: Mutex<usize>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            turns: Mutex::new(responses.into_iter().map(MockTurn::Respond).collect()),
            call_count: Mutex::new(0),
        }
    }

    pub fn from_turns(turns: Vec<MockTurn>) -> Self {
        Self {
            turns: Mutex::new(turns),
            call_count: Mutex::new(0),
        }
    }

    /// A provider that returns a single text response (no tool calls).
    pub fn single_text(text: &str) -> Self {
        Self::new(vec![make_text_response(text)])
    }

    /// A provider that first returns tool calls, then a final answer.
    pub fn tool_then_answer(
        tool_calls: Vec<MessageToolCall>,
        thought: &str,
        answer: &str,
    ) -> Self {
        Self::new(vec![
            make_tool_call_response(tool_calls, thought),
            make_text_response(answer),
        ])
    }

    /// A provider that returns tool calls, then fails on the next call.
    pub fn tool_then_fail(tool_calls: Vec<MessageToolCall>, thought: &str) -> Self {
        Self::from_turns(vec![
            MockTurn::Respond(make_tool_call_response(tool_calls, thought)),
            MockTurn::Fail(ProviderError::Network("connection reset".into())),
        ])
    }

    /// A provider that fails immediately.
    pub fn always_fail() -> Self {
        Self::from_turns(vec![MockTurn::Fail(ProviderError::Network(
            "connection refused".into(),
        ))])
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut count = self.call_count.lock().unwrap();
        let mut turns = self.turns.lock().unwrap();

        if turns.is_empty() {
            panic!("SequentialMockProvider: no more responses (call #{})", *count);
        }

        *count += 1;
        match turns.remove(0) {
            MockTurn::Respond(response) => Ok(response),
            MockTurn::Fail(error) => Err(error),
        }
    }
}

/// Create a simple text response (no tool calls).
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// Create a response with tool calls and optional thought content.
pub fn make_tool_call_response(
    tool_calls: Vec<MessageToolCall>,
    thought: &str,
) -> ProviderResponse {
    let mut msg = Message::assistant(thought);
    msg.tool_calls = tool_calls;
    ProviderResponse {
        message: msg,
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// Helper to create a tool call.
pub fn make_tool_call(name: &str, args: serde_json::Value) -> MessageToolCall {
    MessageToolCall {
        id: format!("call_{name}"),
        name: name.to_string(),
        arguments: serde_json::to_string(&args).unwrap(),
    }
}
