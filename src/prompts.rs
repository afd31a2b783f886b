//! Prompt templates for the building and question-answering sessions.
//!
//! Pure functions over the input data and the entities index; the session
//! loop and the transcription step inject their output as system messages.

use crate::index::EntitiesIndex;

/// Shared description of what an OWL ontology is and how to build one.
const ONTOLOGY_PREAMBLE: &str = "\
## Context
You are an **OWL-DL ontology expert**. Build an ontology from the data below.

An ontology consists of:
- **TBox**
  - **Classes**: group individuals; may have subclasses.
  - **Properties**: link individuals or individuals to literals as tuples:
    `(subject, property, object)` or `(subject, property, literal)`.
    Prefer linking individuals over literals.

- **ABox**
  - **Individuals**: belong to classes and have properties with other individuals or literals.
  - **Literals**: are data primitives (e.g., str, int, etc.).

Each class, property, and individual name is a unique identifier.

## Task
From the provided data:

1. Define relevant **classes**.
2. Define **properties** linking data.
3. Define **individuals** with their classes and properties.

Unify equivalent terms (e.g., `Kg` = `kg`, `MiniSplit` = `Mini Split`).
Do **not** omit any data.
";

/// System prompt for extracting an ontology from a product taxonomy tree.
pub fn product_tree_to_ontology(product_data: &serde_json::Value) -> String {
    format!(
        "{ONTOLOGY_PREAMBLE}
## Scenario
The data describes a **product taxonomy** and its features.

- **Classes**: represent product categories (e.g., `Retaining Walls`).
  All should be subclasses of a top-level class.
- **Properties**: represent product features (e.g., `Block weight (kg)`, `Color`).
  Generalize similar features for consistency across products.
- **Individuals**: represent specific products (tree leaves with an `ID`),
  each classified under its category and linked to its features.

The ontology should be derived from the following JSON-like product tree:
```{product_data}```
"
    )
}

/// System prompt for enriching the ontology from unstructured paragraphs.
pub fn paragraphs_to_ontology(paragraphs: &serde_json::Value) -> String {
    format!(
        "{ONTOLOGY_PREAMBLE}
## Scenario
The data contains **logistics details** about products already defined as ontology individuals.

- **Classes**: logistics concepts, all subclasses of **`Logistic`**.
- **Properties**: link **Product** individuals with logistics-related individuals or literals
  (e.g., cost, location, storage time, weight, arrangement).
- **Individuals/Literals**: represent logistics metrics extracted from the data.

Focus on defining new **properties**; derive related classes and individuals where needed.
Ensure the ontology supports reasoning between products and logistics entities.

**Examples**
- `(MiniEcoRing, averageStorageTimeDay, 10)` with `MiniEcoRing` a `Product`
- `(GrecCurb100, dailyStorageCostEuro, 1.25)` with `GrecCurb100` a `Product`
- `(Warehouse, hasSector, SectorA)`, `(SectorA, produces, EcoRing)` with
  `SectorA` a `Logistic` and `EcoRing` a `RetainingWalls`, itself a `Product`

Use the following text to infer ontology elements:
```{paragraphs}```
"
    )
}

/// System prompt asking the model to transcribe the entities index into a
/// complete RDF/XML ontology.
pub fn make_owl(index: &EntitiesIndex) -> String {
    let classes = serde_json::to_string_pretty(index.classes()).unwrap_or_default();
    let properties = serde_json::to_string_pretty(index.properties()).unwrap_or_default();
    let individuals = serde_json::to_string_pretty(index.individuals()).unwrap_or_default();

    format!(
        "## Scenario
Use the following information to build a complete **OWL ontology** (RDF/XML format)
compatible with **Protégé**. To unify terms, use symmetric properties to link
equivalent individuals (e.g., `describedAlsoBy(WavePave, WavePave_1074)`).

Include:
1. **Classes** with their names, descriptive roles, and subclasses.
2. **Properties** with their names and roles.
3. **Individuals** with their names, classifications, properties, roles.

### Input Data
- **Classes**
  ```{classes}```

- **Properties**
  ```{properties}```

- **Individuals**
  ```{individuals}```
"
    )
}

/// System prompt for answering user questions through SPARQL exploration.
pub fn explore_ontology() -> &'static str {
    "\
Using the ontology's semantic representation:

- Create **SPARQL queries** to explore the ontology data and answer the user's question.
- Provide only the query and its result; **do not propose other actions**.
- Briefly explain the query used in a **concise** manner.
"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_prompts_embed_the_data() {
        let data = serde_json::json!({"category": "Retaining Walls"});
        let prompt = product_tree_to_ontology(&data);
        assert!(prompt.contains("product taxonomy"));
        assert!(prompt.contains("Retaining Walls"));

        let paragraphs = serde_json::json!(["Blocks are stored in SectorA."]);
        let prompt = paragraphs_to_ontology(&paragraphs);
        assert!(prompt.contains("logistics"));
        assert!(prompt.contains("SectorA"));
    }

    #[test]
    fn make_owl_embeds_all_three_sections() {
        let mut index = EntitiesIndex::new();
        index.merge_class("Product", vec![], vec![]);
        index.merge_property("hasWeight", vec![]);
        index.merge_individual("EcoRing", vec![], vec![], vec![]);

        let prompt = make_owl(&index);
        assert!(prompt.contains("Product"));
        assert!(prompt.contains("hasWeight"));
        assert!(prompt.contains("EcoRing"));
        assert!(prompt.contains("RDF/XML"));
    }
}
