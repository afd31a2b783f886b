//! # ontoforge
//!
//! An LLM-driven OWL ontology builder. A chat model incrementally constructs
//! classes, properties, and individuals by calling tools against a shared
//! in-memory entities index, the index is snapshotted to JSON and transcribed
//! into an RDF/XML ontology, and later sessions answer questions by letting
//! the model generate SPARQL that runs against that ontology.
//!
//! ## Architecture
//!
//! - **Entities index** (`index`): three name-keyed mappings with set-union
//!   merge semantics and lossless JSON snapshots
//! - **Agent layer** (`agent`): trait-based tools with typed schemas, a
//!   synchronous chat-model client, and the bounded tool-calling loop
//! - **SPARQL evaluation** (`graph`): oxigraph-backed query evaluator over
//!   the generated RDF/XML artifact
//! - **Transcription** (`owl`): one-shot model transcription of the index
//!   into formal ontology syntax
//!
//! ## Library usage
//!
//! ```no_run
//! use ontoforge::agent::{Message, OpenAiClient, OpenAiConfig, Session, SessionConfig, ToolRegistry};
//! use ontoforge::agent::tools::AddClassTool;
//! use ontoforge::index::EntitiesIndex;
//!
//! let provider = OpenAiClient::new(OpenAiConfig::from_env().unwrap());
//! let mut registry = ToolRegistry::new();
//! registry.register(Box::new(AddClassTool));
//!
//! let mut index = EntitiesIndex::new();
//! let session = Session::new(&provider, &registry, SessionConfig::default());
//! let messages = vec![
//!     Message::system("Build an ontology from the data below."),
//!     Message::user("Dogs are mammals."),
//! ];
//! let outcome = session.run(messages, &mut index);
//! println!("{:?}", outcome.into_answer());
//! ```

pub mod agent;
pub mod error;
pub mod graph;
pub mod index;
pub mod owl;
pub mod prompts;
