//! Accessor tool: name-and-role summaries for selected entity kinds.
//!
//! An opt-in multiplexed read: three boolean flags select which kinds to
//! include, and only the lightweight name-to-roles projections are
//! returned, keeping prompt payloads small.

use crate::agent::error::{AgentError, AgentResult};
use crate::agent::tool::{ParamKind, Tool, ToolInput, ToolOutput, ToolParam, ToolSignature};
use crate::index::EntitiesIndex;

/// Return name-and-role summaries for the requested entity kinds.
pub struct GetEntitiesTool;

impl Tool for GetEntitiesTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: "get_entities".into(),
            description: "Get a dictionary of entities in the ontology by selecting the \
                          requested type among: `classes`, `properties` and `individuals`."
                .into(),
            parameters: vec![
                ToolParam::required("classes", "Set true to include classes.", ParamKind::Flag),
                ToolParam::required(
                    "properties",
                    "Set true to include properties.",
                    ParamKind::Flag,
                ),
                ToolParam::required(
                    "individuals",
                    "Set true to include individuals.",
                    ParamKind::Flag,
                ),
            ],
        }
    }

    fn execute(&self, index: &mut EntitiesIndex, input: ToolInput) -> AgentResult<ToolOutput> {
        let include_classes = input.require_flag("classes", "get_entities")?;
        let include_properties = input.require_flag("properties", "get_entities")?;
        let include_individuals = input.require_flag("individuals", "get_entities")?;

        let encode = |e: serde_json::Error| AgentError::ToolExecution {
            tool_name: "get_entities".into(),
            message: e.to_string(),
        };

        let mut out = serde_json::Map::new();
        if include_classes {
            out.insert(
                "classes".into(),
                serde_json::to_value(index.class_summaries()).map_err(encode)?,
            );
        }
        if include_properties {
            out.insert(
                "properties".into(),
                serde_json::to_value(index.property_summaries()).map_err(encode)?,
            );
        }
        if include_individuals {
            out.insert(
                "individuals".into(),
                serde_json::to_value(index.individual_summaries()).map_err(encode)?,
            );
        }

        let payload = serde_json::to_string_pretty(&out).map_err(encode)?;
        Ok(ToolOutput::ok(payload))
    }
}
