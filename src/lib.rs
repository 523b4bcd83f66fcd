//! Skybrief - a minimal weather-briefing agent
//!
//! Drives a language model through a bounded propose-tool-call /
//! execute-tool / feed-result-back loop until it emits a final answer.
//! Ships two tools: a text-weather lookup and an SMTP email sender.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Model gateway abstraction with an OpenAI-compatible client
//! - **Tools**: Tool registry with the weather and email executors
//! - **Agent**: Orchestration loop and conversation state

pub mod agent;
pub mod core;
pub mod llm;
pub mod tools;

// Re-export commonly used items
pub use agent::Agent;
pub use crate::core::{Config, Result, RunInput, SkybriefError};
