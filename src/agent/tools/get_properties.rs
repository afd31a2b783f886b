//! Accessor tool: return every property record added so far.

use crate::agent::error::{AgentError, AgentResult};
use crate::agent::tool::{Tool, ToolInput, ToolOutput, ToolSignature};
use crate::index::EntitiesIndex;

/// Return the full property mapping as a JSON payload.
pub struct GetPropertiesTool;

impl Tool for GetPropertiesTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: "get_properties".into(),
            description: "Return all ontology properties.".into(),
            parameters: vec![],
        }
    }

    fn execute(&self, index: &mut EntitiesIndex, _input: ToolInput) -> AgentResult<ToolOutput> {
        let payload = serde_json::to_string_pretty(index.properties()).map_err(|e| {
            AgentError::ToolExecution {
                tool_name: "get_properties".into(),
                message: e.to_string(),
            }
        })?;
        Ok(ToolOutput::ok(payload))
    }
}
