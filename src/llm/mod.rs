//! LLM module - model gateway abstraction and backends
//!
//! Contains the gateway trait the orchestration loop depends on and the
//! OpenAI-compatible HTTP implementation.

pub mod openai;
pub mod traits;

pub use openai::OpenAiGateway;
pub use traits::{ModelGateway, ModelResponse};
