//! Shared types used across Skybrief modules
//!
//! Contains conversation turns, tool calls, tool definitions, and tool results.

use serde::{Deserialize, Serialize};

/// Role of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Input from the person running the agent
    User,
    /// Output from the language model
    Model,
    /// Results of tool executions
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// One entry in the conversation history
///
/// Turns are immutable once appended: the conversation owns them and only
/// ever grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced this turn
    pub role: Role,
    /// Free-text content
    pub content: String,
    /// Tool calls requested by the model (model turns only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Results of executed tools (tool turns only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_results: Option<Vec<ToolResult>>,
}

impl Turn {
    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_calls: None,
            tool_results: None,
        }
    }

    /// Create a model turn recording the tool calls it requested
    pub fn model_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Model,
            content: String::new(),
            tool_calls: Some(tool_calls),
            tool_results: None,
        }
    }

    /// Create a tool turn carrying one batch of results
    pub fn tool_results(tool_results: Vec<ToolResult>) -> Self {
        Self {
            role: Role::Tool,
            content: String::new(),
            tool_calls: None,
            tool_results: Some(tool_results),
        }
    }
}

/// A tool call requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to invoke
    pub name: String,
    /// JSON arguments for the tool
    pub arguments: serde_json::Value,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Get a string argument by key
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.arguments
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }
}

/// Definition of a tool the model may call
///
/// `parameters` is the JSON schema for the arguments; `output` is the schema
/// a successful payload must satisfy before it is shown to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name
    pub name: String,
    /// Description shown to the model
    pub description: String,
    /// JSON schema for the input arguments
    pub parameters: serde_json::Value,
    /// JSON schema a successful payload must conform to
    #[serde(skip_serializing)]
    #[serde(default)]
    pub output: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
        output: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            output,
        }
    }
}

/// Outcome of one tool invocation
///
/// Either a payload conforming to the tool's output schema, or an error
/// message the model can read and react to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub name: String,
    /// Structured payload on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    /// Error message on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            payload: Some(payload),
            error: None,
        }
    }

    /// Create a failed result
    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: None,
            error: Some(error.into()),
        }
    }

    /// Whether the invocation failed
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Render the result as text the model can read
    pub fn as_model_text(&self) -> String {
        match (&self.payload, &self.error) {
            (Some(payload), _) => payload.to_string(),
            (None, Some(error)) => serde_json::json!({ "error": error }).to_string(),
            (None, None) => "{}".to_string(),
        }
    }
}

/// Input parameters for one agent run
#[derive(Debug, Clone)]
pub struct RunInput {
    /// City to look up the weather for
    pub city: String,
    /// Recipient email address
    pub to: String,
    /// Optional subject line; the model picks one when absent
    pub subject: Option<String>,
}

impl RunInput {
    /// Create run input from the three user-provided values
    pub fn new(city: impl Into<String>, to: impl Into<String>, subject: Option<String>) -> Self {
        Self {
            city: city.into(),
            to: to.into(),
            subject,
        }
    }

    /// Build the initial user turn text for this run
    pub fn as_prompt(&self) -> String {
        let mut prompt = format!(
            "Check the current weather in {} and send a short email briefing to {}.",
            self.city, self.to
        );
        match &self.subject {
            Some(subject) => prompt.push_str(&format!(" Use the subject line \"{}\".", subject)),
            None => prompt.push_str(" Pick a fitting subject line."),
        }
        prompt.push_str(" When the email has been sent, confirm it in one sentence.");
        prompt
    }
}
