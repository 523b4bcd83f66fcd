//! Agent orchestrator
//!
//! The core controller: drives model gateway calls, dispatches requested
//! tool calls through the registry, appends results to the conversation,
//! and repeats until the model answers or the iteration bound trips.

use crate::agent::conversation::Conversation;
use crate::agent::loop_state::LoopState;
use crate::core::{Config, Result, RunInput, ToolCall, ToolResult};
use crate::llm::{ModelGateway, ModelResponse, OpenAiGateway};
use crate::tools::ToolRegistry;

/// Agent that orchestrates the model and the tools for one run at a time
pub struct Agent<G: ModelGateway> {
    /// Configuration
    config: Config,
    /// Model gateway
    gateway: G,
    /// Tool registry
    registry: ToolRegistry,
}

impl Agent<OpenAiGateway> {
    /// Create an agent backed by the configured chat completions endpoint
    pub fn new(config: Config) -> Result<Self> {
        let gateway = OpenAiGateway::from_config(&config)?;
        Self::with_gateway(config, gateway)
    }
}

impl<G: ModelGateway> Agent<G> {
    /// Create an agent with a custom gateway
    pub fn with_gateway(config: Config, gateway: G) -> Result<Self> {
        let registry = ToolRegistry::from_config(&config)?;

        Ok(Self {
            config,
            gateway,
            registry,
        })
    }

    /// Get the gateway backing this agent
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Run the agent once and return the model's final answer
    ///
    /// Conversation state and loop state are private to the run and
    /// discarded when it ends, successfully or not.
    pub async fn run(&self, input: &RunInput) -> Result<String> {
        let mut conversation = Conversation::new();
        conversation.push_user(input.as_prompt());

        let mut state = LoopState::new(self.config.agent.max_iterations);

        tracing::info!(
            city = %input.city,
            to = %input.to,
            max_iterations = state.max_iterations,
            "starting run"
        );

        let outcome = self.drive(&mut conversation, &mut state).await;

        match outcome {
            Ok(text) => {
                state.finish();
                tracing::info!(iterations = state.iterations, "run complete");
                Ok(text)
            }
            Err(e) => {
                state.fail();
                tracing::error!(iterations = state.iterations, error = %e, "run failed");
                Err(e)
            }
        }
    }

    /// The propose → dispatch → observe cycle
    async fn drive(&self, conversation: &mut Conversation, state: &mut LoopState) -> Result<String> {
        while state.is_running() {
            let response = self
                .gateway
                .converse(conversation.turns(), self.registry.definitions())
                .await?;

            match response {
                ModelResponse::Final(text) => {
                    // No tool calls present: the loop is done
                    return Ok(text);
                }
                ModelResponse::ToolCalls(calls) => {
                    conversation.push_model_calls(calls.clone());
                    state.begin_dispatch()?;

                    tracing::debug!(
                        iteration = state.iterations,
                        batch = calls.len(),
                        "dispatching tool calls"
                    );

                    let results = self.dispatch(&calls).await?;
                    conversation.push_tool_results(results);
                    state.resume();
                }
            }
        }

        // Every iteration either returns the final text, propagates an
        // error, or resumes the running phase
        unreachable!("loop exited without a terminal transition")
    }

    /// Execute one batch of tool calls sequentially, in emitted order
    ///
    /// Ordering is part of the contract: cause (call) then effect (result)
    /// must appear in the history in a reproducible order, so the batch is
    /// never fanned out in parallel.
    async fn dispatch(&self, calls: &[ToolCall]) -> Result<Vec<ToolResult>> {
        let mut results = Vec::with_capacity(calls.len());

        for call in calls {
            // Unknown tools end the run before any executor is touched
            self.registry.resolve(&call.name)?;

            let result = self.registry.invoke(call).await?;
            if let Some(ref error) = result.error {
                tracing::debug!(tool = %call.name, %error, "tool reported a failure to the model");
            }
            results.push(result);
        }

        Ok(results)
    }
}
