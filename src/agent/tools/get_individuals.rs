//! Accessor tool: return every individual record added so far.

use crate::agent::error::{AgentError, AgentResult};
use crate::agent::tool::{Tool, ToolInput, ToolOutput, ToolSignature};
use crate::index::EntitiesIndex;

/// Return the full individual mapping as a JSON payload.
pub struct GetIndividualsTool;

impl Tool for GetIndividualsTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: "get_individuals".into(),
            description: "Return all ontology individuals.".into(),
            parameters: vec![],
        }
    }

    fn execute(&self, index: &mut EntitiesIndex, _input: ToolInput) -> AgentResult<ToolOutput> {
        let payload = serde_json::to_string_pretty(index.individuals()).map_err(|e| {
            AgentError::ToolExecution {
                tool_name: "get_individuals".into(),
                message: e.to_string(),
            }
        })?;
        Ok(ToolOutput::ok(payload))
    }
}
