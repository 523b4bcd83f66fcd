//! OpenAI-compatible chat completions client
//!
//! Async HTTP client for any chat completions endpoint that speaks the
//! OpenAI wire format, with tool calling support.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{Config, Result, Role, SkybriefError, ToolCall, ToolDefinition, Turn};
use crate::llm::traits::{ModelGateway, ModelResponse};

/// Chat completions API client
#[derive(Clone)]
pub struct OpenAiGateway {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

/// Chat completions request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
}

/// Wire message format
#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

/// Wire tool call format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: String,
    function: WireFunctionCall,
}

/// Function inside a wire tool call; arguments are a JSON-encoded string
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    arguments: String,
}

/// Declared tool signature
#[derive(Debug, Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: WireFunction,
}

/// Function signature within a declared tool
#[derive(Debug, Serialize)]
struct WireFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

/// Chat completions response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

/// One completion choice
#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

/// Assistant message in a completion choice
#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

impl OpenAiGateway {
    /// Create a gateway from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.llm.base_url.trim_end_matches('/').to_string(),
            api_key: config.llm.api_key.clone(),
            model: config.llm.model.clone(),
        })
    }

    /// Override the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Convert the conversation history to wire messages
    ///
    /// A tool turn always directly follows the model turn that requested the
    /// batch, so synthetic call ids are derived from the turn index and the
    /// position within the batch.
    fn to_wire_messages(history: &[Turn]) -> Vec<WireMessage> {
        let mut messages = Vec::new();
        // Index of the model turn whose batch the next tool turn answers
        let mut last_model_idx = 0;

        for (turn_idx, turn) in history.iter().enumerate() {
            match turn.role {
                Role::User => messages.push(WireMessage {
                    role: "user".to_string(),
                    content: Some(turn.content.clone()),
                    tool_calls: None,
                    tool_call_id: None,
                }),
                Role::Model => {
                    last_model_idx = turn_idx;
                    let calls = turn.tool_calls.as_deref().unwrap_or_default();
                    messages.push(WireMessage {
                        role: "assistant".to_string(),
                        content: if turn.content.is_empty() {
                            None
                        } else {
                            Some(turn.content.clone())
                        },
                        tool_calls: Some(
                            calls
                                .iter()
                                .enumerate()
                                .map(|(i, call)| WireToolCall {
                                    id: format!("call_{}_{}", turn_idx, i),
                                    call_type: "function".to_string(),
                                    function: WireFunctionCall {
                                        name: call.name.clone(),
                                        arguments: call.arguments.to_string(),
                                    },
                                })
                                .collect(),
                        ),
                        tool_call_id: None,
                    });
                }
                Role::Tool => {
                    // The batch index mirrors the ids of the preceding model turn
                    let results = turn.tool_results.as_deref().unwrap_or_default();
                    for (i, result) in results.iter().enumerate() {
                        messages.push(WireMessage {
                            role: "tool".to_string(),
                            content: Some(result.as_model_text()),
                            tool_calls: None,
                            tool_call_id: Some(format!("call_{}_{}", last_model_idx, i)),
                        });
                    }
                }
            }
        }

        messages
    }

    /// Convert a completion choice to a model response
    fn to_model_response(message: ChoiceMessage) -> Result<ModelResponse> {
        let tool_calls = message.tool_calls.unwrap_or_default();

        if tool_calls.is_empty() {
            return Ok(ModelResponse::Final(message.content.unwrap_or_default()));
        }

        // Any accompanying text is discarded until the loop terminates
        let calls = tool_calls
            .into_iter()
            .map(|tc| {
                let arguments = serde_json::from_str(&tc.function.arguments).map_err(|e| {
                    SkybriefError::gateway(format!(
                        "Malformed tool call arguments for '{}': {}",
                        tc.function.name, e
                    ))
                })?;
                Ok(ToolCall::new(tc.function.name, arguments))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ModelResponse::ToolCalls(calls))
    }
}

#[async_trait]
impl ModelGateway for OpenAiGateway {
    async fn converse(&self, history: &[Turn], tools: &[ToolDefinition]) -> Result<ModelResponse> {
        let request = ChatRequest {
            model: &self.model,
            messages: Self::to_wire_messages(history),
            tools: tools
                .iter()
                .map(|def| WireTool {
                    tool_type: "function".to_string(),
                    function: WireFunction {
                        name: def.name.clone(),
                        description: def.description.clone(),
                        parameters: def.parameters.clone(),
                    },
                })
                .collect(),
        };

        tracing::debug!(model = %self.model, turns = history.len(), "calling model gateway");

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                SkybriefError::gateway(format!(
                    "Cannot connect to the model API at {}. Is the endpoint reachable?",
                    self.base_url
                ))
            } else {
                SkybriefError::from(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SkybriefError::gateway(format!(
                "Model API returned {}: {}",
                status, error_text
            )));
        }

        let chat: ChatResponse = response.json().await?;
        let choice = chat
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SkybriefError::gateway("Model API returned no choices"))?;

        Self::to_model_response(choice.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ToolResult;

    #[test]
    fn test_wire_messages_roles_and_ids() {
        let history = vec![
            Turn::user("check the weather"),
            Turn::model_calls(vec![ToolCall::new(
                "get_weather",
                serde_json::json!({ "city": "Paris" }),
            )]),
            Turn::tool_results(vec![ToolResult::success(
                "get_weather",
                serde_json::json!({ "degree_c": 15 }),
            )]),
        ];

        let messages = OpenAiGateway::to_wire_messages(&history);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[1].role, "assistant");
        assert_eq!(messages[2].role, "tool");
        // The tool result id matches the id assigned to the model's call
        assert_eq!(
            messages[1].tool_calls.as_ref().unwrap()[0].id,
            messages[2].tool_call_id.clone().unwrap()
        );
    }

    #[test]
    fn test_tool_turn_without_a_model_turn_does_not_panic() {
        // The orchestrator never produces this shape, but converse is a
        // public API and must not blow up on it
        let history = vec![Turn::tool_results(vec![ToolResult::failure(
            "send_email",
            "relay unavailable",
        )])];

        let messages = OpenAiGateway::to_wire_messages(&history);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].tool_call_id.as_deref(), Some("call_0_0"));
    }

    #[test]
    fn test_response_with_tool_calls_discards_text() {
        let message = ChoiceMessage {
            content: Some("Let me check that.".to_string()),
            tool_calls: Some(vec![WireToolCall {
                id: "call_0".to_string(),
                call_type: "function".to_string(),
                function: WireFunctionCall {
                    name: "get_weather".to_string(),
                    arguments: r#"{"city":"Paris"}"#.to_string(),
                },
            }]),
        };

        match OpenAiGateway::to_model_response(message).unwrap() {
            ModelResponse::ToolCalls(calls) => {
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].name, "get_weather");
                assert_eq!(calls[0].arguments["city"], "Paris");
            }
            ModelResponse::Final(_) => panic!("expected tool calls"),
        }
    }

    #[test]
    fn test_response_without_tool_calls_is_final() {
        let message = ChoiceMessage {
            content: Some("All done.".to_string()),
            tool_calls: None,
        };

        match OpenAiGateway::to_model_response(message).unwrap() {
            ModelResponse::Final(text) => assert_eq!(text, "All done."),
            ModelResponse::ToolCalls(_) => panic!("expected final text"),
        }
    }

    #[test]
    fn test_malformed_arguments_are_a_gateway_error() {
        let message = ChoiceMessage {
            content: None,
            tool_calls: Some(vec![WireToolCall {
                id: "call_0".to_string(),
                call_type: "function".to_string(),
                function: WireFunctionCall {
                    name: "get_weather".to_string(),
                    arguments: "{not json".to_string(),
                },
            }]),
        };

        assert!(OpenAiGateway::to_model_response(message).is_err());
    }
}
