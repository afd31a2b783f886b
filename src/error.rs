//! Rich diagnostic error types for the ontoforge core.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Entities index errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum IndexError {
    #[error("I/O error on {path}: {source}")]
    #[diagnostic(
        code(onto::index::io),
        help(
            "A filesystem operation on the snapshot failed. Check that the \
             path exists, has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot serialization error: {message}")]
    #[diagnostic(
        code(onto::index::serde),
        help(
            "The snapshot file could not be encoded or decoded as JSON. \
             If loading, the file may be truncated or hand-edited; \
             regenerate it from a build session."
        )
    )]
    Serialization { message: String },
}

// ---------------------------------------------------------------------------
// Ontology graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("failed to load ontology: {message}")]
    #[diagnostic(
        code(onto::graph::load),
        help(
            "The RDF/XML document could not be parsed into the store. \
             The transcription step may have produced malformed markup; \
             inspect the .owl file or regenerate it."
        )
    )]
    Load { message: String },

    #[error("SPARQL query failed: {message}")]
    #[diagnostic(
        code(onto::graph::sparql),
        help("Check the query syntax and that the referenced IRIs exist in the ontology.")
    )]
    Sparql { message: String },

    #[error("unsupported query form: {message}")]
    #[diagnostic(
        code(onto::graph::unsupported),
        help("Only SELECT and ASK queries are evaluated. Rephrase CONSTRUCT/DESCRIBE as SELECT.")
    )]
    Unsupported { message: String },
}
