//! Transcription of the entities index into a formal ontology artifact.
//!
//! A single model invocation (no tools) turns the index into RDF/XML text,
//! which is written next to the JSON snapshot. The artifact's grammar is the
//! concern of the downstream SPARQL evaluator, not of this module; we only
//! strip markdown fences the model may wrap around the markup.

use std::path::Path;

use crate::agent::llm::{ChatProvider, LlmError, Message};
use crate::error::IndexError;
use crate::index::EntitiesIndex;
use crate::prompts;

/// Ask the model to transcribe the index into an RDF/XML ontology.
pub fn transcribe(
    provider: &dyn ChatProvider,
    index: &EntitiesIndex,
) -> Result<String, LlmError> {
    let messages = vec![
        Message::system(prompts::make_owl(index)),
        Message::user("Generate the OWL file as specified."),
    ];
    let turn = provider.chat(&messages, &[])?;
    Ok(strip_code_fences(&turn.content).to_string())
}

/// Write the snapshot and the ontology artifact side by side.
pub fn write_artifacts(dir: &Path, index: &EntitiesIndex, owl: &str) -> Result<(), IndexError> {
    std::fs::create_dir_all(dir).map_err(|e| IndexError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    index.save(&dir.join("entities_index.json"))?;

    let owl_path = dir.join("ontology.owl");
    std::fs::write(&owl_path, owl).map_err(|e| IndexError::Io {
        path: owl_path.display().to_string(),
        source: e,
    })?;

    tracing::info!(dir = %dir.display(), "artifacts written");
    Ok(())
}

/// Strip a surrounding markdown code fence, if present.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.rsplit_once("```").map(|(body, _)| body).unwrap_or(body).trim()
}
