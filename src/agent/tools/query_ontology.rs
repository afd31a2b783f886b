//! Query tool: run a model-written SPARQL query against the ontology.

use crate::agent::error::{AgentError, AgentResult};
use crate::agent::tool::{ParamKind, Tool, ToolInput, ToolOutput, ToolParam, ToolSignature};
use crate::graph::QueryEvaluator;
use crate::index::EntitiesIndex;

/// Forward a SPARQL query to the bound evaluator and return the rows,
/// stringified, as a JSON list.
pub struct QueryOntologyTool {
    evaluator: Box<dyn QueryEvaluator>,
}

impl QueryOntologyTool {
    /// Bind the tool to a query evaluator.
    pub fn new(evaluator: Box<dyn QueryEvaluator>) -> Self {
        Self { evaluator }
    }
}

impl Tool for QueryOntologyTool {
    fn signature(&self) -> ToolSignature {
        ToolSignature {
            name: "query_ontology".into(),
            description: "Get the result of a SPARQL query (as a json string) computed \
                          against the ontology."
                .into(),
            parameters: vec![ToolParam::required(
                "query_text",
                "The SPARQL query to run.",
                ParamKind::Text,
            )],
        }
    }

    fn execute(&self, _index: &mut EntitiesIndex, input: ToolInput) -> AgentResult<ToolOutput> {
        let query_text = input.require_text("query_text", "query_ontology")?;

        let rows = self.evaluator.evaluate(query_text).map_err(|e| {
            AgentError::ToolExecution {
                tool_name: "query_ontology".into(),
                message: e.to_string(),
            }
        })?;

        let payload =
            serde_json::to_string(&rows).map_err(|e| AgentError::ToolExecution {
                tool_name: "query_ontology".into(),
                message: e.to_string(),
            })?;
        Ok(ToolOutput::ok(payload))
    }
}
