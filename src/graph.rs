//! SPARQL evaluation over the generated ontology, backed by oxigraph.
//!
//! The ontology artifact produced by a build session is RDF/XML text; this
//! module loads it into an in-memory store and evaluates model-written
//! SPARQL against it. The [`QueryEvaluator`] trait is the seam the query
//! tool binds to, so sessions can run against a stub in tests.

use std::path::Path;

use oxigraph::io::RdfFormat;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use crate::error::GraphError;

/// An opaque graph-query engine: takes a SPARQL string, returns one string
/// per result row.
pub trait QueryEvaluator: Send + Sync {
    /// Evaluate a query and stringify each result row.
    fn evaluate(&self, sparql: &str) -> Result<Vec<String>, GraphError>;
}

/// An RDF/XML ontology loaded into an in-memory SPARQL store.
pub struct OntologyGraph {
    store: Store,
}

impl OntologyGraph {
    /// Build a graph from RDF/XML bytes.
    pub fn from_rdf_xml(data: &[u8]) -> Result<Self, GraphError> {
        let store = Store::new().map_err(|e| GraphError::Load {
            message: format!("failed to create store: {e}"),
        })?;
        store
            .load_from_reader(RdfFormat::RdfXml, data)
            .map_err(|e| GraphError::Load {
                message: format!("failed to parse RDF/XML: {e}"),
            })?;
        Ok(Self { store })
    }

    /// Load an RDF/XML ontology file.
    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let data = std::fs::read(path).map_err(|e| GraphError::Load {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        let graph = Self::from_rdf_xml(&data)?;
        tracing::info!(
            path = %path.display(),
            triples = graph.len().unwrap_or(0),
            "ontology loaded"
        );
        Ok(graph)
    }

    /// Number of triples in the store.
    pub fn len(&self) -> Result<usize, GraphError> {
        self.store.len().map_err(|e| GraphError::Load {
            message: format!("failed to count triples: {e}"),
        })
    }

    /// Whether the store holds no triples.
    pub fn is_empty(&self) -> Result<bool, GraphError> {
        self.len().map(|n| n == 0)
    }
}

impl QueryEvaluator for OntologyGraph {
    fn evaluate(&self, sparql: &str) -> Result<Vec<String>, GraphError> {
        let results = self.store.query(sparql).map_err(|e| GraphError::Sparql {
            message: format!("query failed: {e}"),
        })?;

        match results {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(|e| GraphError::Sparql {
                        message: format!("solution error: {e}"),
                    })?;
                    let bindings: Vec<String> = solution
                        .iter()
                        .map(|(var, term)| format!("{var} = {term}"))
                        .collect();
                    rows.push(bindings.join(", "));
                }
                Ok(rows)
            }
            QueryResults::Boolean(b) => Ok(vec![b.to_string()]),
            QueryResults::Graph(_) => Err(GraphError::Unsupported {
                message: "CONSTRUCT/DESCRIBE queries are not supported".into(),
            }),
        }
    }
}

impl std::fmt::Debug for OntologyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OntologyGraph").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:ex="http://example.org/">
  <rdf:Description rdf:about="http://example.org/EcoRing">
    <rdf:type rdf:resource="http://example.org/RetainingWalls"/>
    <ex:hasWeight>12</ex:hasWeight>
  </rdf:Description>
  <rdf:Description rdf:about="http://example.org/WavePave">
    <rdf:type rdf:resource="http://example.org/Pavers"/>
  </rdf:Description>
</rdf:RDF>
"#;

    #[test]
    fn load_and_select() {
        let graph = OntologyGraph::from_rdf_xml(SAMPLE.as_bytes()).unwrap();
        assert_eq!(graph.len().unwrap(), 3);

        let rows = graph
            .evaluate(
                "SELECT ?s WHERE { ?s <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> \
                 <http://example.org/RetainingWalls> }",
            )
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains("EcoRing"));
    }

    #[test]
    fn ask_query_returns_boolean_row() {
        let graph = OntologyGraph::from_rdf_xml(SAMPLE.as_bytes()).unwrap();

        let yes = graph
            .evaluate("ASK { <http://example.org/EcoRing> ?p ?o }")
            .unwrap();
        assert_eq!(yes, vec!["true".to_string()]);

        let no = graph
            .evaluate("ASK { <http://example.org/Missing> ?p ?o }")
            .unwrap();
        assert_eq!(no, vec!["false".to_string()]);
    }

    #[test]
    fn select_with_no_matches_is_empty_not_error() {
        let graph = OntologyGraph::from_rdf_xml(SAMPLE.as_bytes()).unwrap();
        let rows = graph
            .evaluate("SELECT ?s WHERE { ?s <http://example.org/noSuch> ?o }")
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn construct_is_rejected() {
        let graph = OntologyGraph::from_rdf_xml(SAMPLE.as_bytes()).unwrap();
        let result = graph.evaluate("CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }");
        assert!(matches!(result, Err(GraphError::Unsupported { .. })));
    }

    #[test]
    fn malformed_query_errors() {
        let graph = OntologyGraph::from_rdf_xml(SAMPLE.as_bytes()).unwrap();
        assert!(graph.evaluate("SELECT nonsense").is_err());
    }

    #[test]
    fn malformed_xml_errors() {
        assert!(OntologyGraph::from_rdf_xml(b"<not-rdf>").is_err());
    }
}
