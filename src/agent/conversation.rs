//! Conversation history management
//!
//! An append-only record of everything the model has seen this run. Turns
//! are never mutated or removed once pushed; the gateway receives the full
//! history on every call.

use crate::core::{ToolCall, ToolResult, Turn};

/// Append-only conversation history for one run
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    /// Turn history, oldest first
    turns: Vec<Turn>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Append a user turn
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::user(content));
    }

    /// Append a model turn recording the tool calls it requested
    pub fn push_model_calls(&mut self, tool_calls: Vec<ToolCall>) {
        self.turns.push(Turn::model_calls(tool_calls));
    }

    /// Append a tool turn carrying one batch of results
    pub fn push_tool_results(&mut self, results: Vec<ToolResult>) {
        self.turns.push(Turn::tool_results(results));
    }

    /// Get the full history, oldest first
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Get the most recent turn
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Get turn count
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
