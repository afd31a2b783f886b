//! Tool system: trait-based tools with runtime registration.
//!
//! Tools are the model's interface to the entities index. Each tool
//! implements the [`Tool`] trait, declares a typed [`ToolSignature`], and is
//! registered in a [`ToolRegistry`]. Arguments arrive from the model as raw
//! JSON; declared parameters are validated against the signature before a
//! tool runs, and every fault is contained at the dispatch boundary so a
//! malformed call can never crash the session loop.

use std::collections::HashMap;

use crate::index::{EntitiesIndex, PropertyPair};

use super::error::{AgentError, AgentResult};

/// The JSON shape of a single tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A string value.
    Text,
    /// An array of strings.
    TextList,
    /// An array of `[relation, value]` string pairs.
    PairList,
    /// A boolean.
    Flag,
}

impl ParamKind {
    /// Render the JSON-schema fragment for this kind.
    fn schema(&self) -> serde_json::Value {
        match self {
            ParamKind::Text => serde_json::json!({ "type": "string" }),
            ParamKind::TextList => serde_json::json!({
                "type": "array",
                "items": { "type": "string" }
            }),
            ParamKind::PairList => serde_json::json!({
                "type": "array",
                "items": {
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": 2,
                    "maxItems": 2
                }
            }),
            ParamKind::Flag => serde_json::json!({ "type": "boolean" }),
        }
    }

    /// Whether a JSON value matches this kind.
    fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            ParamKind::Text => value.is_string(),
            ParamKind::TextList => value
                .as_array()
                .is_some_and(|items| items.iter().all(|v| v.is_string())),
            ParamKind::PairList => value.as_array().is_some_and(|items| {
                items.iter().all(|v| {
                    v.as_array()
                        .is_some_and(|pair| pair.len() == 2 && pair.iter().all(|p| p.is_string()))
                })
            }),
            ParamKind::Flag => value.is_boolean(),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            ParamKind::Text => "a string",
            ParamKind::TextList => "an array of strings",
            ParamKind::PairList => "an array of [relation, value] pairs",
            ParamKind::Flag => "a boolean",
        }
    }
}

/// A single parameter in a tool's signature.
#[derive(Debug, Clone)]
pub struct ToolParam {
    /// Parameter name, as the model must spell it.
    pub name: String,
    /// What this parameter controls.
    pub description: String,
    /// The expected JSON shape.
    pub kind: ParamKind,
    /// Whether this parameter must be provided.
    pub required: bool,
}

impl ToolParam {
    /// A parameter the model must always supply.
    pub fn required(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: ParamKind,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: true,
        }
    }

    /// A parameter the model may omit.
    pub fn optional(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: ParamKind,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
        }
    }
}

/// Description of a tool's interface.
#[derive(Debug, Clone)]
pub struct ToolSignature {
    /// Unique name of the tool.
    pub name: String,
    /// What this tool does, for the model's benefit.
    pub description: String,
    /// Parameters the tool accepts.
    pub parameters: Vec<ToolParam>,
}

impl ToolSignature {
    /// Render the function-tool JSON schema presented to the model.
    ///
    /// This is the wire contract between the session loop and the model
    /// service: `{type, function: {name, description, parameters}}`.
    pub fn to_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for param in &self.parameters {
            let mut schema = param.kind.schema();
            schema["description"] = serde_json::Value::String(param.description.clone());
            properties.insert(param.name.clone(), schema);
            if param.required {
                required.push(serde_json::Value::String(param.name.clone()));
            }
        }
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }
            }
        })
    }
}

/// Input to a tool execution: the model's arguments as a JSON object.
#[derive(Debug, Clone, Default)]
pub struct ToolInput {
    args: serde_json::Map<String, serde_json::Value>,
}

impl ToolInput {
    /// Create a new empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw JSON argument string as produced by the model.
    pub fn from_json(tool_name: &str, raw: &str) -> AgentResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| AgentError::InvalidArguments {
                tool_name: tool_name.into(),
                message: format!("arguments are not valid JSON: {e}"),
            })?;
        match value {
            serde_json::Value::Object(args) => Ok(Self { args }),
            other => Err(AgentError::InvalidArguments {
                tool_name: tool_name.into(),
                message: format!("expected a JSON object of arguments, got: {other}"),
            }),
        }
    }

    /// Add a string parameter.
    pub fn with_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.args
            .insert(name.into(), serde_json::Value::String(value.into()));
        self
    }

    /// Add a string-list parameter.
    pub fn with_list(mut self, name: impl Into<String>, values: Vec<&str>) -> Self {
        self.args.insert(
            name.into(),
            serde_json::Value::Array(
                values
                    .into_iter()
                    .map(|v| serde_json::Value::String(v.into()))
                    .collect(),
            ),
        );
        self
    }

    /// Add a pair-list parameter.
    pub fn with_pairs(mut self, name: impl Into<String>, pairs: Vec<(&str, &str)>) -> Self {
        self.args.insert(
            name.into(),
            serde_json::Value::Array(
                pairs
                    .into_iter()
                    .map(|(a, b)| serde_json::json!([a, b]))
                    .collect(),
            ),
        );
        self
    }

    /// Add a boolean parameter.
    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.args.insert(name.into(), serde_json::Value::Bool(value));
        self
    }

    /// Whether a parameter is present.
    pub fn contains(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }

    /// Raw JSON value of a parameter.
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.args.get(name)
    }

    /// A string parameter, if present and a string.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.args.get(name).and_then(|v| v.as_str())
    }

    /// A required string parameter, erroring if missing.
    pub fn require_text(&self, name: &str, tool_name: &str) -> AgentResult<&str> {
        self.text(name).ok_or_else(|| AgentError::ToolExecution {
            tool_name: tool_name.into(),
            message: format!("missing required parameter: {name}"),
        })
    }

    /// A string-list parameter; absent parameters yield an empty list.
    pub fn text_list(&self, name: &str) -> Vec<String> {
        self.args
            .get(name)
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// A pair-list parameter; absent parameters yield an empty list.
    pub fn pair_list(&self, name: &str) -> Vec<PropertyPair> {
        self.args
            .get(name)
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| {
                        let pair = v.as_array()?;
                        match (pair.first()?.as_str(), pair.get(1)?.as_str()) {
                            (Some(relation), Some(value)) => {
                                Some(PropertyPair::new(relation, value))
                            }
                            _ => None,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// A required boolean parameter, erroring if missing.
    pub fn require_flag(&self, name: &str, tool_name: &str) -> AgentResult<bool> {
        self.args
            .get(name)
            .and_then(|v| v.as_bool())
            .ok_or_else(|| AgentError::ToolExecution {
                tool_name: tool_name.into(),
                message: format!("missing required parameter: {name}"),
            })
    }
}

/// Output from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Whether the tool succeeded.
    pub success: bool,
    /// The payload fed back to the model as the tool's result.
    pub payload: String,
}

impl ToolOutput {
    /// Create a successful output.
    pub fn ok(payload: impl Into<String>) -> Self {
        Self {
            success: true,
            payload: payload.into(),
        }
    }

    /// Create a failed output.
    pub fn err(payload: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: payload.into(),
        }
    }
}

/// A tool the model can invoke during the session loop.
pub trait Tool: Send + Sync {
    /// Describe this tool's interface.
    fn signature(&self) -> ToolSignature;

    /// Execute the tool with the given input against the entities index.
    fn execute(&self, index: &mut EntitiesIndex, input: ToolInput) -> AgentResult<ToolOutput>;
}

/// Registry of available tools.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. If a tool with the same name exists, it is replaced.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let sig = tool.signature();
        self.tools.insert(sig.name.clone(), tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|b| b.as_ref())
    }

    /// List all registered tool signatures.
    pub fn list(&self) -> Vec<ToolSignature> {
        self.tools.values().map(|t| t.signature()).collect()
    }

    /// Render the function-tool schemas presented to the model.
    pub fn schemas(&self) -> Vec<serde_json::Value> {
        self.tools.values().map(|t| t.signature().to_schema()).collect()
    }

    /// Execute a tool by name, validating input against its signature first.
    pub fn execute(
        &self,
        name: &str,
        index: &mut EntitiesIndex,
        input: ToolInput,
    ) -> AgentResult<ToolOutput> {
        let tool = self
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound { name: name.into() })?;
        validate(&tool.signature(), &input)?;
        tool.execute(index, input)
    }

    /// Execute a tool from the model's raw JSON arguments, containing every
    /// fault. Unknown tools, malformed arguments, and execution errors are
    /// logged and converted into an `error: ...` payload for the model to
    /// correct itself on the next turn; they never propagate.
    pub fn dispatch(&self, name: &str, index: &mut EntitiesIndex, raw_args: &str) -> ToolOutput {
        let result = ToolInput::from_json(name, raw_args)
            .and_then(|input| self.execute(name, index, input));
        match result {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "tool call failed");
                ToolOutput::err(format!("error: {e}"))
            }
        }
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Check the input against the declared parameters: required ones must be
/// present, and present ones must have the declared JSON shape.
fn validate(sig: &ToolSignature, input: &ToolInput) -> AgentResult<()> {
    for param in &sig.parameters {
        match input.get(&param.name) {
            None if param.required => {
                return Err(AgentError::InvalidArguments {
                    tool_name: sig.name.clone(),
                    message: format!("missing required parameter: {}", param.name),
                });
            }
            Some(value) if !param.kind.matches(value) => {
                return Err(AgentError::InvalidArguments {
                    tool_name: sig.name.clone(),
                    message: format!(
                        "parameter {} must be {}",
                        param.name,
                        param.kind.describe()
                    ),
                });
            }
            _ => {}
        }
    }
    Ok(())
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}
