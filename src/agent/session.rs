//! The bounded tool-calling loop that drives the model.
//!
//! Each iteration presents the registered tool schemas to the model,
//! dispatches any requested tool calls against the entities index, and
//! appends the correlated results so the next iteration has them as
//! context. The loop ends when the model answers without requesting tools,
//! or when the iteration budget runs out. Transport faults back off and
//! retry with unchanged state; they consume iterations, so a persistently
//! failing service degrades to the no-result outcome instead of an error.
//!
//! The loop is strictly single-threaded and synchronous. It blocks only on
//! the model call and the backoff sleep; the iteration budget is the only
//! cancellation mechanism.

use std::time::Duration;

use crate::index::EntitiesIndex;

use super::llm::{ChatProvider, Message};
use super::tool::ToolRegistry;

/// Retry behavior on model transport faults.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    /// Fixed delay before retrying a failed model call (default: 15s).
    pub delay: Duration,
    /// Consecutive transport faults tolerated before giving up early
    /// (default: 3).
    pub max_retries: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(15),
            max_retries: 3,
        }
    }
}

/// Configuration for a session loop.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum loop iterations before giving up (default: 10).
    pub max_iterations: usize,
    /// Log per-iteration progress at info level.
    pub verbose: bool,
    /// Retry behavior on transport faults.
    pub backoff: BackoffPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            verbose: false,
            backoff: BackoffPolicy::default(),
        }
    }
}

/// How a session loop ended.
///
/// Exhaustion is a designated absence of a result, not an error: the model
/// simply never produced a turn without tool calls within the budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopOutcome {
    /// The model's final text, produced on a turn with no tool calls.
    Answer(String),
    /// The iteration budget ran out without a final answer.
    Exhausted,
}

impl LoopOutcome {
    /// The answer text, or `None` if the budget was exhausted.
    pub fn into_answer(self) -> Option<String> {
        match self {
            LoopOutcome::Answer(text) => Some(text),
            LoopOutcome::Exhausted => None,
        }
    }
}

/// One conversation driven to completion against a tool registry.
pub struct Session<'a> {
    provider: &'a dyn ChatProvider,
    registry: &'a ToolRegistry,
    config: SessionConfig,
}

impl<'a> Session<'a> {
    /// Create a session over a provider and a registry.
    pub fn new(
        provider: &'a dyn ChatProvider,
        registry: &'a ToolRegistry,
        config: SessionConfig,
    ) -> Self {
        Self {
            provider,
            registry,
            config,
        }
    }

    /// Drive the conversation until the model stops calling tools or the
    /// iteration budget is exhausted.
    ///
    /// `messages` seeds the conversation (system and user turns); the
    /// sequence grows each iteration with the model's turns and the
    /// correlated tool results. Tool calls mutate `index` in place.
    pub fn run(&self, mut messages: Vec<Message>, index: &mut EntitiesIndex) -> LoopOutcome {
        let schemas = self.registry.schemas();
        let mut consecutive_faults: u32 = 0;
        let mut iteration = 0;

        while iteration < self.config.max_iterations {
            if self.config.verbose {
                tracing::info!(iteration = iteration + 1, "session iteration");
            }

            let turn = match self.provider.chat(&messages, &schemas) {
                Ok(turn) => turn,
                Err(e) => {
                    consecutive_faults += 1;
                    tracing::warn!(
                        error = %e,
                        attempt = consecutive_faults,
                        "model call failed, backing off"
                    );
                    if consecutive_faults > self.config.backoff.max_retries {
                        tracing::warn!(
                            max_retries = self.config.backoff.max_retries,
                            "giving up after repeated transport faults"
                        );
                        return LoopOutcome::Exhausted;
                    }
                    std::thread::sleep(self.config.backoff.delay);
                    // The failed turn is not appended; retry with the same state.
                    iteration += 1;
                    continue;
                }
            };
            consecutive_faults = 0;

            if turn.tool_calls.is_empty() {
                return LoopOutcome::Answer(turn.content);
            }

            let calls = turn.tool_calls.clone();
            messages.push(turn.into_message());

            for call in calls {
                if self.config.verbose {
                    tracing::info!(tool = %call.name, args = %call.arguments, "tool call");
                }
                let output = self.registry.dispatch(&call.name, index, &call.arguments);
                messages.push(Message::tool_result(call.id, output.payload));
            }

            iteration += 1;
        }

        if self.config.verbose {
            tracing::info!(
                max_iterations = self.config.max_iterations,
                "iteration budget exhausted without a final answer"
            );
        }
        LoopOutcome::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::llm::{AssistantTurn, ScriptedProvider, ScriptedTurn, ToolCall};
    use crate::agent::tools::AddClassTool;

    fn call_turn(name: &str, args: serde_json::Value) -> ScriptedTurn {
        ScriptedTurn::Reply(AssistantTurn {
            content: String::new(),
            tool_calls: vec![ToolCall {
                id: "call_1".into(),
                name: name.into(),
                arguments: args.to_string(),
            }],
        })
    }

    fn answer_turn(text: &str) -> ScriptedTurn {
        ScriptedTurn::Reply(AssistantTurn::answer(text))
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(AddClassTool));
        registry
    }

    fn fast_config(max_iterations: usize) -> SessionConfig {
        SessionConfig {
            max_iterations,
            verbose: false,
            backoff: BackoffPolicy {
                delay: Duration::ZERO,
                max_retries: 3,
            },
        }
    }

    fn seed() -> Vec<Message> {
        vec![Message::system("build"), Message::user("go")]
    }

    #[test]
    fn terminates_with_answer_after_tool_calls() {
        let provider = ScriptedProvider::new(vec![
            call_turn("add_class", serde_json::json!({"name": "Person"})),
            call_turn(
                "add_class",
                serde_json::json!({"name": "Student", "subclassOf": ["Person"]}),
            ),
            answer_turn("ontology built"),
        ]);
        let registry = registry();
        let session = Session::new(&provider, &registry, fast_config(10));

        let mut index = EntitiesIndex::new();
        let outcome = session.run(seed(), &mut index);

        assert_eq!(outcome, LoopOutcome::Answer("ontology built".into()));
        // Two tool-call iterations plus the final answer turn.
        assert_eq!(provider.calls(), 3);
        assert!(index.classes().contains_key("Person"));
        assert!(index.classes().contains_key("Student"));
    }

    #[test]
    fn exhausts_budget_when_model_never_stops() {
        let provider = ScriptedProvider::new(vec![call_turn(
            "add_class",
            serde_json::json!({"name": "Loop"}),
        )]);
        let registry = registry();
        let session = Session::new(&provider, &registry, fast_config(4));

        let mut index = EntitiesIndex::new();
        let outcome = session.run(seed(), &mut index);

        assert_eq!(outcome, LoopOutcome::Exhausted);
        assert_eq!(outcome.into_answer(), None);
        assert_eq!(provider.calls(), 4);
        // Repeated identical merges leave a single record.
        assert_eq!(index.classes().len(), 1);
    }

    #[test]
    fn transport_fault_consumes_iteration_then_recovers() {
        let provider = ScriptedProvider::new(vec![
            ScriptedTurn::Fail("service unavailable".into()),
            answer_turn("recovered"),
        ]);
        let registry = registry();
        let session = Session::new(&provider, &registry, fast_config(10));

        let mut index = EntitiesIndex::new();
        let outcome = session.run(seed(), &mut index);

        assert_eq!(outcome, LoopOutcome::Answer("recovered".into()));
        assert_eq!(provider.calls(), 2);
    }

    #[test]
    fn persistent_faults_give_up_early() {
        let provider = ScriptedProvider::new(vec![ScriptedTurn::Fail("down".into())]);
        let registry = registry();
        let mut config = fast_config(100);
        config.backoff.max_retries = 2;
        let session = Session::new(&provider, &registry, config);

        let mut index = EntitiesIndex::new();
        let outcome = session.run(seed(), &mut index);

        assert_eq!(outcome, LoopOutcome::Exhausted);
        // max_retries consecutive faults are tolerated, the next one gives up.
        assert_eq!(provider.calls(), 3);
    }

    #[test]
    fn unknown_tool_is_skipped_not_fatal() {
        let provider = ScriptedProvider::new(vec![
            call_turn("no_such_tool", serde_json::json!({})),
            answer_turn("done"),
        ]);
        let registry = registry();
        let session = Session::new(&provider, &registry, fast_config(10));

        let mut index = EntitiesIndex::new();
        let outcome = session.run(seed(), &mut index);

        assert_eq!(outcome, LoopOutcome::Answer("done".into()));
        assert!(index.is_empty());
    }

    #[test]
    fn malformed_arguments_leave_index_unchanged() {
        let provider = ScriptedProvider::new(vec![
            // Missing the required `name` parameter.
            call_turn("add_class", serde_json::json!({"role": ["agent"]})),
            answer_turn("done"),
        ]);
        let registry = registry();
        let session = Session::new(&provider, &registry, fast_config(10));

        let mut index = EntitiesIndex::new();
        let outcome = session.run(seed(), &mut index);

        assert_eq!(outcome, LoopOutcome::Answer("done".into()));
        assert!(index.is_empty());
    }

    #[test]
    fn loop_without_budget_is_never_entered() {
        let provider = ScriptedProvider::new(vec![answer_turn("unreachable")]);
        let registry = registry();
        let session = Session::new(&provider, &registry, fast_config(0));

        let mut index = EntitiesIndex::new();
        assert_eq!(session.run(seed(), &mut index), LoopOutcome::Exhausted);
        assert_eq!(provider.calls(), 0);
    }
}
