//! Built-in tools for the session loop: the TBox/ABox mutators
//! (add class, add property, add individual), the full-record accessors,
//! the name-and-role summary accessor, and the SPARQL query tool.

pub mod add_class;
pub mod add_individual;
pub mod add_property;
pub mod get_classes;
pub mod get_entities;
pub mod get_individuals;
pub mod get_properties;
pub mod query_ontology;

pub use add_class::AddClassTool;
pub use add_individual::AddIndividualTool;
pub use add_property::AddPropertyTool;
pub use get_classes::GetClassesTool;
pub use get_entities::GetEntitiesTool;
pub use get_individuals::GetIndividualsTool;
pub use get_properties::GetPropertiesTool;
pub use query_ontology::QueryOntologyTool;

use super::tool::ToolRegistry;

/// Register the tools used while building an ontology from source data.
pub fn builder_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(AddClassTool));
    registry.register(Box::new(AddPropertyTool));
    registry.register(Box::new(AddIndividualTool));
    registry.register(Box::new(GetClassesTool));
    registry.register(Box::new(GetPropertiesTool));
    registry.register(Box::new(GetIndividualsTool));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::tool::ToolInput;
    use crate::error::GraphError;
    use crate::graph::QueryEvaluator;
    use crate::index::EntitiesIndex;

    #[test]
    fn add_class_creates_then_updates() {
        let registry = builder_registry();
        let mut index = EntitiesIndex::new();

        let first = registry
            .execute(
                "add_class",
                &mut index,
                ToolInput::new()
                    .with_text("name", "Person")
                    .with_list("subclassOf", vec!["Mammal"])
                    .with_list("role", vec!["agent"]),
            )
            .unwrap();
        assert_eq!(first.payload, "Class `Person` created.");

        let second = registry
            .execute(
                "add_class",
                &mut index,
                ToolInput::new()
                    .with_text("name", "Person")
                    .with_list("subclassOf", vec!["LivingBeing"])
                    .with_list("role", vec!["human", "rational"]),
            )
            .unwrap();
        assert_eq!(second.payload, "Class `Person` updated.");

        let person = &index.classes()["Person"];
        assert_eq!(person.subclass_of.len(), 2);
        assert_eq!(person.role.len(), 3);
    }

    #[test]
    fn add_property_and_individual() {
        let registry = builder_registry();
        let mut index = EntitiesIndex::new();

        registry
            .execute(
                "add_property",
                &mut index,
                ToolInput::new()
                    .with_text("name", "hasAge")
                    .with_list("role", vec!["numeric"]),
            )
            .unwrap();

        let out = registry
            .execute(
                "add_individual",
                &mut index,
                ToolInput::new()
                    .with_text("name", "Alice")
                    .with_list("classes", vec!["Person"])
                    .with_pairs("properties", vec![("hasAge", "23"), ("hasName", "Alice")]),
            )
            .unwrap();
        assert_eq!(out.payload, "Individual `Alice` created.");
        assert_eq!(index.individuals()["Alice"].properties.len(), 2);
    }

    #[test]
    fn mutator_fault_leaves_index_unchanged() {
        let registry = builder_registry();
        let mut index = EntitiesIndex::new();

        let output = registry.dispatch("add_class", &mut index, "{\"role\": [\"agent\"]}");
        assert!(!output.success);
        assert!(output.payload.starts_with("error:"));
        assert!(index.is_empty());
    }

    #[test]
    fn get_classes_returns_full_records() {
        let registry = builder_registry();
        let mut index = EntitiesIndex::new();
        index.merge_class(
            "Person",
            vec!["Mammal".to_string()],
            vec!["agent".to_string()],
        );

        let output = registry
            .execute("get_classes", &mut index, ToolInput::new())
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output.payload).unwrap();
        assert_eq!(json["Person"]["subclassOf"][0], "Mammal");
        assert_eq!(json["Person"]["role"][0], "agent");
    }

    #[test]
    fn get_entities_honors_flags() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(GetEntitiesTool));
        let mut index = EntitiesIndex::new();
        index.merge_class("Product", vec![], vec!["an item".to_string()]);
        index.merge_property("hasWeight", vec!["numeric".to_string()]);
        index.merge_individual("EcoRing", vec![], vec![], vec!["a block".to_string()]);

        let output = registry
            .execute(
                "get_entities",
                &mut index,
                ToolInput::new()
                    .with_flag("classes", true)
                    .with_flag("properties", false)
                    .with_flag("individuals", true),
            )
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output.payload).unwrap();
        assert_eq!(json["classes"]["Product"][0], "an item");
        assert_eq!(json["individuals"]["EcoRing"][0], "a block");
        assert!(json.get("properties").is_none());
    }

    #[test]
    fn get_entities_requires_all_flags() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(GetEntitiesTool));
        let mut index = EntitiesIndex::new();

        let output = registry.dispatch("get_entities", &mut index, "{\"classes\": true}");
        assert!(!output.success);
    }

    struct FixedEvaluator(Vec<String>);
    impl QueryEvaluator for FixedEvaluator {
        fn evaluate(&self, _sparql: &str) -> Result<Vec<String>, GraphError> {
            Ok(self.0.clone())
        }
    }

    struct FailingEvaluator;
    impl QueryEvaluator for FailingEvaluator {
        fn evaluate(&self, _sparql: &str) -> Result<Vec<String>, GraphError> {
            Err(GraphError::Sparql {
                message: "bad query".into(),
            })
        }
    }

    #[test]
    fn query_tool_stringifies_rows() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(QueryOntologyTool::new(Box::new(FixedEvaluator(
            vec!["?s = <http://example.org/EcoRing>".into()],
        )))));
        let mut index = EntitiesIndex::new();

        let output = registry
            .execute(
                "query_ontology",
                &mut index,
                ToolInput::new().with_text("query_text", "SELECT ?s WHERE { ?s ?p ?o }"),
            )
            .unwrap();
        let rows: Vec<String> = serde_json::from_str(&output.payload).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains("EcoRing"));
    }

    #[test]
    fn query_tool_contains_evaluator_faults() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(QueryOntologyTool::new(Box::new(FailingEvaluator))));
        let mut index = EntitiesIndex::new();

        let output = registry.dispatch(
            "query_ontology",
            &mut index,
            "{\"query_text\": \"SELECT nonsense\"}",
        );
        assert!(!output.success);
        assert!(output.payload.contains("bad query"));
    }
}
