//! Agent layer: the tool-calling session loop, tool registry, and the
//! chat-model client.
//!
//! The loop presents tool schemas to the model, dispatches requested tool
//! calls against the entities index with full fault containment, and feeds
//! the correlated results back until the model produces a final answer or
//! the iteration budget runs out.

pub mod error;
pub mod llm;
pub mod session;
pub mod tool;
pub mod tools;

pub use error::{AgentError, AgentResult};
pub use llm::{
    AssistantTurn, ChatProvider, LlmError, Message, OpenAiClient, OpenAiConfig, ScriptedProvider,
    ScriptedTurn, ToolCall,
};
pub use session::{BackoffPolicy, LoopOutcome, Session, SessionConfig};
pub use tool::{ParamKind, Tool, ToolInput, ToolOutput, ToolParam, ToolRegistry, ToolSignature};
