//! Tool registry - manages and dispatches tool calls
//!
//! Central hub mapping tool names to their schemas and executors. Dispatch
//! is a closed match over the registered names, so an unknown tool is a
//! checked error rather than a runtime surprise.

use std::collections::HashMap;

use crate::core::{Config, Result, SkybriefError, ToolCall, ToolDefinition, ToolResult};
use crate::tools::email::{EmailRequest, EmailTool};
use crate::tools::schema;
use crate::tools::weather::WeatherTool;

/// Registry of available tools
pub struct ToolRegistry {
    /// Tool definitions indexed by name
    definitions: HashMap<String, ToolDefinition>,
    /// Definitions in registration order, as declared to the model
    declared: Vec<ToolDefinition>,
    /// Weather executor
    weather: WeatherTool,
    /// Email executor
    email: EmailTool,
}

impl ToolRegistry {
    /// Create a registry with the two built-in tools
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = Self {
            definitions: HashMap::new(),
            declared: Vec::new(),
            weather: WeatherTool::from_config(config)?,
            email: EmailTool::from_config(config),
        };

        registry.register(WeatherTool::definition());
        registry.register(EmailTool::definition());

        Ok(registry)
    }

    /// Register a tool definition
    fn register(&mut self, definition: ToolDefinition) {
        self.declared.push(definition.clone());
        self.definitions.insert(definition.name.clone(), definition);
    }

    /// All definitions, in the order they are declared to the model
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.declared
    }

    /// Look up a tool by name; unknown names are a contract violation
    pub fn resolve(&self, name: &str) -> Result<&ToolDefinition> {
        self.definitions
            .get(name)
            .ok_or_else(|| SkybriefError::UnknownTool(name.to_string()))
    }

    /// Execute one tool call
    ///
    /// Input and output schema violations, bad argument shapes, and missing
    /// relay configuration come back as failed [`ToolResult`]s the model can
    /// react to. Unknown tools and executor network failures are errors that
    /// end the run.
    pub async fn invoke(&self, call: &ToolCall) -> Result<ToolResult> {
        let definition = self.resolve(&call.name)?;

        if let Err(violation) = schema::validate(&definition.parameters, &call.arguments) {
            tracing::debug!(tool = %call.name, %violation, "rejecting tool arguments");
            return Ok(ToolResult::failure(
                &call.name,
                format!("invalid arguments: {}", violation),
            ));
        }

        let payload = match call.name.as_str() {
            "get_weather" => {
                // Required by the input schema, so the unwrap path is unreachable
                let city = call.get_string("city").unwrap_or_default();
                self.weather.lookup(&city).await?.to_payload()
            }
            "send_email" => {
                let request = match EmailRequest::from_call(call) {
                    Ok(request) => request,
                    Err(violation) => return Ok(ToolResult::failure(&call.name, violation)),
                };

                // Relay configuration is checked before any network I/O
                let settings = match self.email.settings() {
                    Ok(settings) => settings,
                    Err(e) => return Ok(ToolResult::failure(&call.name, e.to_string())),
                };

                self.email.send(&settings, &request).await?
            }
            other => return Err(SkybriefError::UnknownTool(other.to_string())),
        };

        Ok(Self::check_output(definition, payload))
    }

    /// Validate an executor payload against the tool's output contract
    ///
    /// A violation means the executor itself is at fault, not the model, so
    /// it is logged at warn level and fed back as a failed result.
    fn check_output(definition: &ToolDefinition, payload: serde_json::Value) -> ToolResult {
        match schema::validate(&definition.output, &payload) {
            Ok(()) => ToolResult::success(&definition.name, payload),
            Err(violation) => {
                tracing::warn!(tool = %definition.name, %violation, "executor output failed validation");
                ToolResult::failure(
                    &definition.name,
                    format!("tool produced an invalid result: {}", violation),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> ToolRegistry {
        ToolRegistry::from_config(&Config::default()).unwrap()
    }

    #[test]
    fn test_resolve_known_tools() {
        let registry = registry();
        assert!(registry.resolve("get_weather").is_ok());
        assert!(registry.resolve("send_email").is_ok());
        assert_eq!(registry.definitions().len(), 2);
    }

    #[test]
    fn test_resolve_unknown_tool_is_fatal() {
        let err = registry().resolve("get_stock_price").unwrap_err();
        assert!(matches!(err, SkybriefError::UnknownTool(name) if name == "get_stock_price"));
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool_is_fatal() {
        let call = ToolCall::new("get_stock_price", json!({}));
        let err = registry().invoke(&call).await.unwrap_err();
        assert!(matches!(err, SkybriefError::UnknownTool(_)));
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_a_failed_result() {
        let call = ToolCall::new("get_weather", json!({}));
        let result = registry().invoke(&call).await.unwrap();

        assert!(result.is_error());
        assert!(result.error.as_ref().unwrap().contains("city"));
    }

    #[test]
    fn test_output_violating_the_contract_is_a_failed_result() {
        let payload = json!({ "city": "Paris", "degree_c": "fifteen", "condition": "Sunny" });
        let result = ToolRegistry::check_output(&WeatherTool::definition(), payload);

        assert!(result.is_error());
        assert!(result.error.as_ref().unwrap().contains("invalid result"));
        assert!(result.error.as_ref().unwrap().contains("degree_c"));
    }

    #[test]
    fn test_conforming_output_passes_through() {
        let payload = json!({ "city": "Paris", "degree_c": 15, "condition": "Partly cloudy" });
        let result = ToolRegistry::check_output(&WeatherTool::definition(), payload.clone());

        assert!(!result.is_error());
        assert_eq!(result.payload, Some(payload));
    }

    #[tokio::test]
    async fn test_missing_relay_config_is_a_failed_result() {
        // Default MailConfig in tests carries no relay settings unless the
        // environment provides them; skip when it does.
        let reg = registry();
        if reg.email.settings().is_ok() {
            return;
        }

        let call = ToolCall::new(
            "send_email",
            json!({ "to": "a@b.com", "subject": "Weather", "body": "hi" }),
        );
        let result = reg.invoke(&call).await.unwrap();

        assert!(result.is_error());
        assert!(result.error.as_ref().unwrap().contains("SMTP_"));
    }
}
