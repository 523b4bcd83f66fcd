//! Email sending tool
//!
//! Delivers a message through an operator-configured SMTP relay. The relay
//! settings come from the environment and are checked before any network
//! I/O happens.

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;

use crate::core::{Config, MailConfig, MailSettings, Result, SkybriefError, ToolCall, ToolDefinition};

/// Shape check for a plausible recipient address
fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

/// A validated email request
#[derive(Debug, Clone)]
pub struct EmailRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailRequest {
    /// Build a request from tool call arguments, checking their shape
    ///
    /// Violations come back as plain messages so the registry can feed them
    /// to the model as a failed result instead of ending the run.
    pub fn from_call(call: &ToolCall) -> std::result::Result<Self, String> {
        let to = call
            .get_string("to")
            .ok_or_else(|| "'to' must be a string".to_string())?;
        let subject = call
            .get_string("subject")
            .ok_or_else(|| "'subject' must be a string".to_string())?;
        let body = call
            .get_string("body")
            .ok_or_else(|| "'body' must be a string".to_string())?;

        if !email_pattern().is_match(&to) {
            return Err(format!("'{}' is not a valid email address", to));
        }
        if subject.trim().is_empty() {
            return Err("'subject' must not be empty".to_string());
        }
        if body.trim().is_empty() {
            return Err("'body' must not be empty".to_string());
        }

        Ok(Self { to, subject, body })
    }
}

/// Tool that submits mail through the configured relay
pub struct EmailTool {
    mail: MailConfig,
}

impl EmailTool {
    /// Create an email tool from configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            mail: config.mail.clone(),
        }
    }

    /// Tool definition registered at startup
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            "send_email",
            "Send an email to a recipient via the configured mail relay",
            json!({
                "type": "object",
                "properties": {
                    "to": {
                        "type": "string",
                        "description": "Recipient email address"
                    },
                    "subject": {
                        "type": "string",
                        "description": "Subject line"
                    },
                    "body": {
                        "type": "string",
                        "description": "Plain-text message body"
                    }
                },
                "required": ["to", "subject", "body"]
            }),
            json!({
                "type": "object",
                "properties": {
                    "delivery_id": { "type": "string" },
                    "to": { "type": "string" }
                },
                "required": ["delivery_id"]
            }),
        )
    }

    /// Resolve the relay settings, failing fast when any are missing
    pub fn settings(&self) -> Result<MailSettings> {
        self.mail.require()
    }

    /// Deliver the message; one SMTP round trip, no retries
    pub async fn send(&self, settings: &MailSettings, request: &EmailRequest) -> Result<serde_json::Value> {
        let from: Mailbox = settings
            .from
            .parse()
            .map_err(|e| SkybriefError::config(format!("SMTP_FROM is not a valid address: {}", e)))?;
        let to: Mailbox = request
            .to
            .parse()
            .map_err(|e| SkybriefError::tool(format!("recipient address rejected: {}", e)))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(request.subject.clone())
            .body(request.body.clone())
            .map_err(|e| SkybriefError::tool(format!("failed to build message: {}", e)))?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
            .map_err(|e| SkybriefError::tool(format!("relay setup failed: {}", e)))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        tracing::debug!(to = %request.to, relay = %settings.host, "submitting email");

        let response = mailer
            .send(email)
            .await
            .map_err(|e| SkybriefError::tool(format!("mail submission failed: {}", e)))?;

        let detail = response.message().collect::<Vec<&str>>().join(" ");
        let delivery_id = if detail.is_empty() {
            format!("{}", response.code())
        } else {
            detail
        };

        Ok(json!({
            "delivery_id": delivery_id,
            "to": request.to,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(args: serde_json::Value) -> ToolCall {
        ToolCall::new("send_email", args)
    }

    #[test]
    fn test_valid_request() {
        let request = EmailRequest::from_call(&call(json!({
            "to": "a@b.com",
            "subject": "Weather",
            "body": "Partly cloudy, 15°C"
        })))
        .unwrap();

        assert_eq!(request.to, "a@b.com");
        assert_eq!(request.subject, "Weather");
    }

    #[test]
    fn test_rejects_malformed_recipient() {
        let err = EmailRequest::from_call(&call(json!({
            "to": "not-an-address",
            "subject": "Weather",
            "body": "hi"
        })))
        .unwrap_err();

        assert!(err.contains("not a valid email address"));
    }

    #[test]
    fn test_rejects_empty_subject_and_body() {
        let err = EmailRequest::from_call(&call(json!({
            "to": "a@b.com",
            "subject": "  ",
            "body": "hi"
        })))
        .unwrap_err();
        assert!(err.contains("subject"));

        let err = EmailRequest::from_call(&call(json!({
            "to": "a@b.com",
            "subject": "Weather",
            "body": ""
        })))
        .unwrap_err();
        assert!(err.contains("body"));
    }

    #[test]
    fn test_missing_relay_settings_fail_before_any_network() {
        let tool = EmailTool {
            mail: MailConfig::default(),
        };

        let err = tool.settings().unwrap_err();
        assert!(err.to_string().contains("SMTP_HOST"));
    }
}
