//! ontoforge CLI: build an OWL ontology with an LLM, then question it.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::Deserialize;

use ontoforge::agent::tools::{GetEntitiesTool, QueryOntologyTool, builder_registry};
use ontoforge::agent::{
    BackoffPolicy, LoopOutcome, Message, OpenAiClient, OpenAiConfig, Session, SessionConfig,
    ToolRegistry,
};
use ontoforge::graph::OntologyGraph;
use ontoforge::index::EntitiesIndex;
use ontoforge::{owl, prompts};

#[derive(Parser)]
#[command(name = "ontoforge", version, about = "LLM-driven OWL ontology builder")]
struct Cli {
    /// Model identifier (overrides OPENAI_MODEL).
    #[arg(long, global = true)]
    model: Option<String>,

    /// Base URL of the OpenAI-compatible API (overrides OPENAI_BASE_URL).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log per-iteration session progress.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an ontology from a product tree, optionally enriched from
    /// logistics guidelines, and write the snapshot + RDF/XML artifacts.
    Build {
        /// JSON product taxonomy tree.
        #[arg(long)]
        products: PathBuf,

        /// JSON logistics paragraphs used to enrich the ontology.
        #[arg(long)]
        guidelines: Option<PathBuf>,

        /// Directory receiving a timestamped artifact subdirectory.
        #[arg(long, default_value = "outcomes")]
        out_dir: PathBuf,

        /// Maximum loop iterations per conversation.
        #[arg(long, default_value = "80")]
        max_iterations: usize,
    },

    /// Answer a batch of questions against a previously built ontology.
    Ask {
        /// Entities snapshot produced by `build`.
        #[arg(long)]
        snapshot: PathBuf,

        /// RDF/XML ontology produced by `build`.
        #[arg(long)]
        ontology: PathBuf,

        /// JSON list of `{query, expected}` cases.
        #[arg(long)]
        questions: PathBuf,

        /// Maximum loop iterations per question.
        #[arg(long, default_value = "20")]
        max_iterations: usize,
    },

    /// Summarize the contents of a snapshot.
    Show {
        /// Entities snapshot produced by `build`.
        #[arg(long)]
        snapshot: PathBuf,
    },
}

/// One question of a batch: the query to pose and the answer the data
/// expects. Both are printed; no automated grading is performed.
#[derive(Debug, Deserialize)]
struct QuestionCase {
    query: String,
    expected: serde_json::Value,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let Cli {
        model,
        base_url,
        verbose,
        command,
    } = Cli::parse();

    match command {
        Commands::Build {
            products,
            guidelines,
            out_dir,
            max_iterations,
        } => {
            let provider = client(model, base_url)?;
            let registry = builder_registry();
            let config = SessionConfig {
                max_iterations,
                verbose,
                backoff: BackoffPolicy::default(),
            };
            let session = Session::new(&provider, &registry, config);
            let mut index = EntitiesIndex::new();

            let product_data = read_json(&products)?;
            let messages = vec![
                Message::system(prompts::product_tree_to_ontology(&product_data)),
                Message::user(
                    "Extract the classes, individuals and properties to generate \
                     the ontology as specified.",
                ),
            ];
            report(session.run(messages, &mut index));
            println!("Ontology state so far: {index}");

            if let Some(path) = guidelines {
                let guideline_data = read_json(&path)?;
                let messages = vec![
                    Message::system(prompts::paragraphs_to_ontology(&guideline_data)),
                    Message::user(
                        "Extract the classes, individuals and properties to enrich \
                         the ontology as specified.",
                    ),
                ];
                report(session.run(messages, &mut index));
                println!("Ontology state so far: {index}");
            }

            let owl_text = owl::transcribe(&provider, &index).into_diagnostic()?;

            let stamp = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs();
            let dir = out_dir.join(stamp.to_string());
            owl::write_artifacts(&dir, &index, &owl_text).into_diagnostic()?;
            println!("Artifacts written to {}", dir.display());
        }

        Commands::Ask {
            snapshot,
            ontology,
            questions,
            max_iterations,
        } => {
            let provider = client(model, base_url)?;
            let mut index = EntitiesIndex::load(&snapshot).into_diagnostic()?;

            let graph = OntologyGraph::load(&ontology).into_diagnostic()?;
            println!(
                "Loaded {} triples from {}",
                graph.len().into_diagnostic()?,
                ontology.display()
            );

            let mut registry = ToolRegistry::new();
            registry.register(Box::new(GetEntitiesTool));
            registry.register(Box::new(QueryOntologyTool::new(Box::new(graph))));

            let config = SessionConfig {
                max_iterations,
                verbose,
                backoff: BackoffPolicy::default(),
            };
            let session = Session::new(&provider, &registry, config);

            let content = std::fs::read_to_string(&questions).into_diagnostic()?;
            let cases: Vec<QuestionCase> =
                serde_json::from_str(&content).into_diagnostic()?;

            for (i, case) in cases.iter().enumerate() {
                let messages = vec![
                    Message::system(prompts::explore_ontology()),
                    Message::user(&case.query),
                ];
                let outcome = session.run(messages, &mut index);

                println!("======================================");
                println!(
                    "Question {}: `{}` (expected: `{}`)",
                    i + 1,
                    case.query,
                    case.expected
                );
                match outcome {
                    LoopOutcome::Answer(answer) => println!("Response:\n{answer}"),
                    LoopOutcome::Exhausted => println!("Response: no result"),
                }
            }
            println!("======================================");
            println!("Batch done");
        }

        Commands::Show { snapshot } => {
            let index = EntitiesIndex::load(&snapshot).into_diagnostic()?;
            println!("{index}");

            for (name, roles) in index.class_summaries() {
                println!("  class \"{}\": {}", name, join(&roles));
            }
            for (name, roles) in index.property_summaries() {
                println!("  property \"{}\": {}", name, join(&roles));
            }
            for (name, roles) in index.individual_summaries() {
                println!("  individual \"{}\": {}", name, join(&roles));
            }
        }
    }

    Ok(())
}

/// Build the chat client from the environment plus CLI overrides.
fn client(model: Option<String>, base_url: Option<String>) -> Result<OpenAiClient> {
    let mut config = OpenAiConfig::from_env().into_diagnostic()?;
    if let Some(model) = model {
        config.model = model;
    }
    if let Some(url) = base_url {
        config.base_url = url;
    }
    Ok(OpenAiClient::new(config))
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path).into_diagnostic()?;
    serde_json::from_str(&content).into_diagnostic()
}

fn report(outcome: LoopOutcome) {
    match outcome {
        LoopOutcome::Answer(answer) => println!("{answer}"),
        LoopOutcome::Exhausted => println!("no result"),
    }
}

fn join(roles: &std::collections::BTreeSet<String>) -> String {
    roles.iter().cloned().collect::<Vec<_>>().join(", ")
}
