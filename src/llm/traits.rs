//! Model gateway trait for abstracting the completion backend
//!
//! The orchestration loop only ever talks to this seam, so the loop can be
//! driven by a scripted gateway in tests.

use async_trait::async_trait;

use crate::core::{Result, ToolCall, ToolDefinition, Turn};

/// Response from one model gateway call
///
/// A backend response carrying both text and tool calls is reported as
/// `ToolCalls`; the accompanying text is discarded until the run terminates.
#[derive(Debug, Clone)]
pub enum ModelResponse {
    /// The model produced its final answer
    Final(String),
    /// The model requested one or more tool invocations
    ToolCalls(Vec<ToolCall>),
}

/// Boundary abstraction over the external language-model completion API
///
/// Gateways are stateless between calls: every call receives the full
/// conversation history plus the callable tool signatures.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Ask the model for its next step given the history so far
    async fn converse(&self, history: &[Turn], tools: &[ToolDefinition]) -> Result<ModelResponse>;
}
