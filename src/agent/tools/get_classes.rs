//! Accessor tool: return every class record added so far.

use crate::agent::error::{AgentError, AgentResult};
use crate::agent::tool::{Tool, ToolInput, ToolOutput, ToolSignature};
use crate::index::EntitiesIndex;

/// Return the full class mapping as a JSON payload.
pub struct GetClassesTool;

impl Tool for GetClassesTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: "get_classes".into(),
            description: "Return all ontology classes.".into(),
            parameters: vec![],
        }
    }

    fn execute(&self, index: &mut EntitiesIndex, _input: ToolInput) -> AgentResult<ToolOutput> {
        let payload = serde_json::to_string_pretty(index.classes()).map_err(|e| {
            AgentError::ToolExecution {
                tool_name: "get_classes".into(),
                message: e.to_string(),
            }
        })?;
        Ok(ToolOutput::ok(payload))
    }
}
