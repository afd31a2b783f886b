//! Mutator tool: add or update a property in the ontology's TBox.

use crate::agent::error::AgentResult;
use crate::agent::tool::{ParamKind, Tool, ToolInput, ToolOutput, ToolParam, ToolSignature};
use crate::index::{EntitiesIndex, MergeOutcome};

/// Add a property, or union new roles into an existing one.
pub struct AddPropertyTool;

impl Tool for AddPropertyTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: "add_property".into(),
            description: "Add or update a property in the ontology's TBox.".into(),
            parameters: vec![
                ToolParam::required("name", "Property name (ID).", ParamKind::Text),
                ToolParam::optional(
                    "role",
                    "Roles or meanings associated with the property.",
                    ParamKind::TextList,
                ),
            ],
        }
    }

    fn execute(&self, index: &mut EntitiesIndex, input: ToolInput) -> AgentResult<ToolOutput> {
        let name = input.require_text("name", "add_property")?;
        let roles = input.text_list("role");

        let message = match index.merge_property(name, roles) {
            MergeOutcome::Created => format!("Property `{name}` created."),
            MergeOutcome::Updated => format!("Property `{name}` updated."),
        };
        Ok(ToolOutput::ok(message))
    }
}
