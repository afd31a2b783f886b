//! Mutator tool: add or update a class in the ontology's TBox.

use crate::agent::error::AgentResult;
use crate::agent::tool::{ParamKind, Tool, ToolInput, ToolOutput, ToolParam, ToolSignature};
use crate::index::{EntitiesIndex, MergeOutcome};

/// Add a class, or union new parents and roles into an existing one.
pub struct AddClassTool;

impl Tool for AddClassTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: "add_class".into(),
            description: "Add or update a class in the ontology's TBox.".into(),
            parameters: vec![
                ToolParam::required("name", "Class name (ID).", ParamKind::Text),
                ToolParam::optional(
                    "subclassOf",
                    "Superclasses of this class.",
                    ParamKind::TextList,
                ),
                ToolParam::optional("role", "Logical roles or meanings.", ParamKind::TextList),
            ],
        }
    }

    fn execute(&self, index: &mut EntitiesIndex, input: ToolInput) -> AgentResult<ToolOutput> {
        let name = input.require_text("name", "add_class")?;
        let parents = input.text_list("subclassOf");
        let roles = input.text_list("role");

        let message = match index.merge_class(name, parents, roles) {
            MergeOutcome::Created => format!("Class `{name}` created."),
            MergeOutcome::Updated => format!("Class `{name}` updated."),
        };
        Ok(ToolOutput::ok(message))
    }
}
