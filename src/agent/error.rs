//! Agent-specific error types with rich miette diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Errors specific to the agent layer (tools, dispatch, the session loop).
#[derive(Debug, Error, Diagnostic)]
pub enum AgentError {
    #[error("tool not found: \"{name}\"")]
    #[diagnostic(
        code(onto::agent::tool_not_found),
        help("Register the tool first or check available tools with `registry.list()`.")
    )]
    ToolNotFound { name: String },

    #[error("invalid arguments for {tool_name}: {message}")]
    #[diagnostic(
        code(onto::agent::invalid_arguments),
        help(
            "The arguments the model supplied do not match the tool's declared \
             schema. The error payload is fed back so the model can correct itself."
        )
    )]
    InvalidArguments { tool_name: String, message: String },

    #[error("tool execution failed: {tool_name} — {message}")]
    #[diagnostic(
        code(onto::agent::tool_execution),
        help("The tool encountered an error. Check the inner cause for details.")
    )]
    ToolExecution { tool_name: String, message: String },
}

/// Convenience alias for agent operations.
pub type AgentResult<T> = std::result::Result<T, AgentError>;
