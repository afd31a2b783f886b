//! Mutator tool: add or update an individual in the ontology's ABox.

use crate::agent::error::AgentResult;
use crate::agent::tool::{ParamKind, Tool, ToolInput, ToolOutput, ToolParam, ToolSignature};
use crate::index::{EntitiesIndex, MergeOutcome};

/// Add an individual, or union new classes, property pairs, and roles into
/// an existing one.
pub struct AddIndividualTool;

impl Tool for AddIndividualTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: "add_individual".into(),
            description: "Add or update an individual in the ontology's ABox.".into(),
            parameters: vec![
                ToolParam::required("name", "Individual name (ID).", ParamKind::Text),
                ToolParam::optional(
                    "classes",
                    "Names of classes this individual belongs to.",
                    ParamKind::TextList,
                ),
                ToolParam::optional(
                    "properties",
                    "Property assertions as [relation, value] pairs; the value \
                     is a literal or another individual's name.",
                    ParamKind::PairList,
                ),
                ToolParam::optional("role", "Logical roles or meanings.", ParamKind::TextList),
            ],
        }
    }

    fn execute(&self, index: &mut EntitiesIndex, input: ToolInput) -> AgentResult<ToolOutput> {
        let name = input.require_text("name", "add_individual")?;
        let classes = input.text_list("classes");
        let properties = input.pair_list("properties");
        let roles = input.text_list("role");

        let message = match index.merge_individual(name, classes, properties, roles) {
            MergeOutcome::Created => format!("Individual `{name}` created."),
            MergeOutcome::Updated => format!("Individual `{name}` updated."),
        };
        Ok(ToolOutput::ok(message))
    }
}
