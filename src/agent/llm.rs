//! Chat-model client for the session loop.
//!
//! Defines the provider seam the loop drives ([`ChatProvider`]), the message
//! and turn types exchanged over it, a synchronous client for any
//! OpenAI-compatible chat-completions API, and a scripted provider that
//! replays canned turns for tests.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from the model-client subsystem.
#[derive(Debug, Error, Diagnostic)]
pub enum LlmError {
    #[error("no API key configured")]
    #[diagnostic(
        code(onto::llm::missing_api_key),
        help("Set the OPENAI_API_KEY environment variable before running a session.")
    )]
    MissingApiKey,

    #[error("model request failed: {message}")]
    #[diagnostic(
        code(onto::llm::request_failed),
        help("Check network connectivity, the base URL, and that the model name is valid.")
    )]
    RequestFailed { message: String },

    #[error("failed to parse model response: {message}")]
    #[diagnostic(
        code(onto::llm::parse_error),
        help("The service returned an unexpected response format.")
    )]
    ParseError { message: String },
}

/// A tool invocation requested by the model.
///
/// `arguments` is the raw JSON string from the wire; it is parsed (and
/// validated) at dispatch time, not here.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Correlation ID; the matching result must echo it.
    pub id: String,
    /// Name of the requested tool.
    pub name: String,
    /// Raw JSON argument object.
    pub arguments: String,
}

/// One entry in the running message sequence of a conversation.
#[derive(Debug, Clone)]
pub enum Message {
    /// System instructions.
    System { content: String },
    /// A user turn.
    User { content: String },
    /// A model turn, possibly carrying tool-call requests.
    Assistant {
        content: String,
        tool_calls: Vec<ToolCall>,
    },
    /// The result of one tool call, correlated by ID.
    ToolResult { call_id: String, content: String },
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Create a tool-result message correlated to a tool call.
    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ToolResult {
            call_id: call_id.into(),
            content: content.into(),
        }
    }

    /// Render this message as a chat-completions JSON object.
    fn to_json(&self) -> serde_json::Value {
        match self {
            Message::System { content } => {
                serde_json::json!({ "role": "system", "content": content })
            }
            Message::User { content } => {
                serde_json::json!({ "role": "user", "content": content })
            }
            Message::Assistant {
                content,
                tool_calls,
            } => {
                let mut msg = serde_json::json!({ "role": "assistant", "content": content });
                if !tool_calls.is_empty() {
                    msg["tool_calls"] = serde_json::Value::Array(
                        tool_calls
                            .iter()
                            .map(|call| {
                                serde_json::json!({
                                    "id": call.id,
                                    "type": "function",
                                    "function": {
                                        "name": call.name,
                                        "arguments": call.arguments,
                                    }
                                })
                            })
                            .collect(),
                    );
                }
                msg
            }
            Message::ToolResult { call_id, content } => serde_json::json!({
                "role": "tool",
                "tool_call_id": call_id,
                "content": content,
            }),
        }
    }
}

/// The model's reply to one invocation: text plus any tool-call requests.
#[derive(Debug, Clone, Default)]
pub struct AssistantTurn {
    /// Final or intermediate text content (may be empty on tool-call turns).
    pub content: String,
    /// Tool invocations the model requested this turn.
    pub tool_calls: Vec<ToolCall>,
}

impl AssistantTurn {
    /// A plain text answer with no tool calls.
    pub fn answer(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Convert into a conversation message for the next iteration.
    pub fn into_message(self) -> Message {
        Message::Assistant {
            content: self.content,
            tool_calls: self.tool_calls,
        }
    }
}

/// The seam between the session loop and the model service.
///
/// Implementations are synchronous: the loop blocks on the call and owns
/// all retry policy.
pub trait ChatProvider {
    /// Invoke the model with the message sequence and tool schemas.
    fn chat(
        &self,
        messages: &[Message],
        tools: &[serde_json::Value],
    ) -> Result<AssistantTurn, LlmError>;
}

// ---------------------------------------------------------------------------
// OpenAI-compatible client
// ---------------------------------------------------------------------------

/// Configuration for the chat-completions client.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL of the API.
    pub base_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    /// Build a configuration with explicit key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            api_key: api_key.into(),
            model: model.into(),
            timeout_secs: 120,
        }
    }

    /// Load from environment variables: `OPENAI_API_KEY` (required),
    /// `OPENAI_MODEL`, `OPENAI_BASE_URL`.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| LlmError::MissingApiKey)?;
        let mut config = Self::new(api_key, String::new());
        config.model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-5".into());
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            config.base_url = url;
        }
        Ok(config)
    }
}

/// Synchronous client for an OpenAI-compatible chat-completions API.
pub struct OpenAiClient {
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OpenAiConfig) -> Self {
        Self { config }
    }

    /// The model identifier being used.
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

impl ChatProvider for OpenAiClient {
    fn chat(
        &self,
        messages: &[Message],
        tools: &[serde_json::Value],
    ) -> Result<AssistantTurn, LlmError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .build();

        let msgs: Vec<serde_json::Value> = messages.iter().map(Message::to_json).collect();

        let mut body = serde_json::json!({
            "model": self.config.model,
            "messages": msgs,
        });
        if !tools.is_empty() {
            body["tools"] = serde_json::Value::Array(tools.to_vec());
        }

        let body_str = serde_json::to_string(&body).map_err(|e| LlmError::RequestFailed {
            message: format!("JSON serialize error: {e}"),
        })?;

        let resp = agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.config.api_key))
            .set("Content-Type", "application/json")
            .send_string(&body_str)
            .map_err(|e: ureq::Error| LlmError::RequestFailed {
                message: e.to_string(),
            })?;

        let resp_str = resp.into_string().map_err(|e| LlmError::ParseError {
            message: e.to_string(),
        })?;

        let json: serde_json::Value =
            serde_json::from_str(&resp_str).map_err(|e| LlmError::ParseError {
                message: e.to_string(),
            })?;

        parse_assistant_turn(&json)
    }
}

/// Extract the assistant turn from a chat-completions response body.
fn parse_assistant_turn(json: &serde_json::Value) -> Result<AssistantTurn, LlmError> {
    let message = json["choices"]
        .get(0)
        .map(|choice| &choice["message"])
        .ok_or_else(|| LlmError::ParseError {
            message: "response has no choices".into(),
        })?;

    let content = message["content"].as_str().unwrap_or("").to_string();

    let mut tool_calls = Vec::new();
    if let Some(calls) = message["tool_calls"].as_array() {
        for call in calls {
            let id = call["id"].as_str().unwrap_or("").to_string();
            let name = call["function"]["name"].as_str().unwrap_or("").to_string();
            let arguments = call["function"]["arguments"]
                .as_str()
                .unwrap_or("{}")
                .to_string();
            if name.is_empty() {
                return Err(LlmError::ParseError {
                    message: "tool call with no function name".into(),
                });
            }
            tool_calls.push(ToolCall {
                id,
                name,
                arguments,
            });
        }
    }

    Ok(AssistantTurn {
        content,
        tool_calls,
    })
}

// ---------------------------------------------------------------------------
// Scripted provider
// ---------------------------------------------------------------------------

/// One scripted reply for a [`ScriptedProvider`].
#[derive(Debug, Clone)]
pub enum ScriptedTurn {
    /// Return this turn.
    Reply(AssistantTurn),
    /// Fail the call with a transport error carrying this message.
    Fail(String),
}

/// A provider that replays a fixed script of turns, cycling once exhausted.
///
/// Used to drive the session loop deterministically in tests: a script
/// ending in an answer terminates the loop, a script of only tool-call
/// turns exercises budget exhaustion, and `Fail` entries exercise the
/// backoff path.
pub struct ScriptedProvider {
    turns: Vec<ScriptedTurn>,
    cursor: std::sync::atomic::AtomicUsize,
}

impl ScriptedProvider {
    /// Create a provider replaying the given turns in order.
    pub fn new(turns: Vec<ScriptedTurn>) -> Self {
        Self {
            turns,
            cursor: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.cursor.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl ChatProvider for ScriptedProvider {
    fn chat(
        &self,
        _messages: &[Message],
        _tools: &[serde_json::Value],
    ) -> Result<AssistantTurn, LlmError> {
        let idx = self
            .cursor
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match self.turns.get(idx % self.turns.len().max(1)) {
            Some(ScriptedTurn::Reply(turn)) => Ok(turn.clone()),
            Some(ScriptedTurn::Fail(message)) => Err(LlmError::RequestFailed {
                message: message.clone(),
            }),
            None => Err(LlmError::RequestFailed {
                message: "no scripted turns".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_turn_with_tool_calls() {
        let json = serde_json::json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "add_class",
                            "arguments": "{\"name\": \"Person\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });

        let turn = parse_assistant_turn(&json).unwrap();
        assert_eq!(turn.content, "");
        assert_eq!(turn.tool_calls.len(), 1);
        assert_eq!(turn.tool_calls[0].name, "add_class");
        assert_eq!(turn.tool_calls[0].id, "call_abc");
    }

    #[test]
    fn parse_turn_with_final_answer() {
        let json = serde_json::json!({
            "choices": [{
                "message": { "content": "The ontology is complete." },
                "finish_reason": "stop"
            }]
        });

        let turn = parse_assistant_turn(&json).unwrap();
        assert_eq!(turn.content, "The ontology is complete.");
        assert!(turn.tool_calls.is_empty());
    }

    #[test]
    fn parse_turn_without_choices_errors() {
        let json = serde_json::json!({ "error": { "message": "overloaded" } });
        assert!(parse_assistant_turn(&json).is_err());
    }

    #[test]
    fn assistant_message_carries_tool_calls() {
        let turn = AssistantTurn {
            content: String::new(),
            tool_calls: vec![ToolCall {
                id: "call_1".into(),
                name: "add_class".into(),
                arguments: "{}".into(),
            }],
        };
        let json = turn.into_message().to_json();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["tool_calls"][0]["function"]["name"], "add_class");
    }

    #[test]
    fn tool_result_message_shape() {
        let json = Message::tool_result("call_1", "Class `Person` created.").to_json();
        assert_eq!(json["role"], "tool");
        assert_eq!(json["tool_call_id"], "call_1");
    }

    #[test]
    fn scripted_provider_cycles() {
        let provider = ScriptedProvider::new(vec![
            ScriptedTurn::Reply(AssistantTurn::answer("one")),
            ScriptedTurn::Reply(AssistantTurn::answer("two")),
        ]);

        assert_eq!(provider.chat(&[], &[]).unwrap().content, "one");
        assert_eq!(provider.chat(&[], &[]).unwrap().content, "two");
        assert_eq!(provider.chat(&[], &[]).unwrap().content, "one");
        assert_eq!(provider.calls(), 3);
    }

    #[test]
    fn scripted_provider_fails_on_demand() {
        let provider = ScriptedProvider::new(vec![ScriptedTurn::Fail("503".into())]);
        assert!(provider.chat(&[], &[]).is_err());
    }

    #[test]
    fn config_from_env_does_not_panic() {
        let _ = OpenAiConfig::from_env();
    }
}
