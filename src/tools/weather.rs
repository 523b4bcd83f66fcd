//! Weather lookup tool
//!
//! Fetches free text from a wttr.in-style service and extracts a Celsius
//! temperature and a condition phrase with a permissive pattern match.

use regex::Regex;
use reqwest::Client;
use serde_json::json;
use std::sync::OnceLock;
use std::time::Duration;

use crate::core::{Config, Result, SkybriefError, ToolDefinition};

/// Pattern for a signed-integer Celsius temperature like `+15°C` or `-3°C`
fn temperature_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([+-]?\d+)\s*°C").expect("valid temperature regex"))
}

/// Parsed weather report for one city
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub city: String,
    /// Missing when no temperature pattern was found in the response text
    pub degree_c: Option<i32>,
    pub condition: String,
}

impl WeatherReport {
    /// Render the report as the tool's output payload
    pub fn to_payload(&self) -> serde_json::Value {
        json!({
            "city": self.city,
            "degree_c": self.degree_c,
            "condition": self.condition,
        })
    }
}

/// Tool that queries an external text-weather service
pub struct WeatherTool {
    client: Client,
    base_url: String,
}

impl WeatherTool {
    /// Create a weather tool from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.weather.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.weather.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Tool definition registered at startup
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            "get_weather",
            "Get the current weather (temperature in Celsius and conditions) for a city",
            json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "Name of the city to look up"
                    }
                },
                "required": ["city"]
            }),
            json!({
                "type": "object",
                "properties": {
                    "city": { "type": "string" },
                    "degree_c": { "type": ["integer", "null"] },
                    "condition": { "type": "string" }
                },
                "required": ["city", "condition"]
            }),
        )
    }

    /// Look up the weather for a city
    ///
    /// One outbound GET, no retries. A transport failure is an executor
    /// runtime failure and propagates as an error.
    pub async fn lookup(&self, city: &str) -> Result<WeatherReport> {
        let url = format!(
            "{}/{}",
            self.base_url,
            urlencoding::encode(&city.to_lowercase())
        );

        tracing::debug!(%city, %url, "fetching weather");

        let response = self
            .client
            .get(&url)
            .query(&[("format", "%C+%t")])
            .send()
            .await
            .map_err(|e| SkybriefError::tool(format!("weather fetch for '{}' failed: {}", city, e)))?;

        if !response.status().is_success() {
            return Err(SkybriefError::tool(format!(
                "weather service returned {} for '{}'",
                response.status(),
                city
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SkybriefError::tool(format!("weather response read failed: {}", e)))?;

        Ok(parse_weather_text(city, &body))
    }
}

/// Extract temperature and condition from unstructured weather text
///
/// When no temperature pattern matches, the numeric field is reported as
/// missing instead of failing the call; the model is expected to cope with
/// an unknown temperature.
pub fn parse_weather_text(city: &str, text: &str) -> WeatherReport {
    let trimmed = text.trim();

    let (degree_c, condition) = match temperature_pattern().captures(trimmed) {
        Some(captures) => {
            let degree = captures[1].parse::<i32>().ok();
            let full_match = captures.get(0).expect("capture 0 always present");
            let mut remainder = String::with_capacity(trimmed.len());
            remainder.push_str(&trimmed[..full_match.start()]);
            remainder.push_str(&trimmed[full_match.end()..]);
            (degree, remainder)
        }
        None => {
            tracing::warn!(%city, "no temperature pattern in weather text, reporting it as unknown");
            (None, trimmed.to_string())
        }
    };

    let condition = condition
        .trim_matches(|c: char| c.is_whitespace() || c == ',' || c == ':')
        .to_string();

    WeatherReport {
        city: city.to_string(),
        degree_c,
        condition,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_temperature() {
        let report = parse_weather_text("Paris", "Partly cloudy +15°C");
        assert_eq!(report.degree_c, Some(15));
        assert_eq!(report.condition, "Partly cloudy");
        assert_eq!(report.city, "Paris");
    }

    #[test]
    fn test_parse_negative_temperature() {
        let report = parse_weather_text("Oslo", "Light snow -7°C");
        assert_eq!(report.degree_c, Some(-7));
        assert_eq!(report.condition, "Light snow");
    }

    #[test]
    fn test_parse_unsigned_temperature() {
        let report = parse_weather_text("Lagos", "Sunny 31°C");
        assert_eq!(report.degree_c, Some(31));
        assert_eq!(report.condition, "Sunny");
    }

    #[test]
    fn test_no_temperature_reports_unknown() {
        let report = parse_weather_text("Atlantis", "Weather report unavailable");
        assert_eq!(report.degree_c, None);
        assert_eq!(report.condition, "Weather report unavailable");
    }

    #[test]
    fn test_parse_is_idempotent() {
        let first = parse_weather_text("Paris", "Partly cloudy +15°C");
        let second = parse_weather_text("Paris", "Partly cloudy +15°C");
        assert_eq!(first, second);
    }

    #[test]
    fn test_payload_shape() {
        let payload = parse_weather_text("Paris", "Partly cloudy +15°C").to_payload();
        assert_eq!(payload["city"], "Paris");
        assert_eq!(payload["degree_c"], 15);
        assert_eq!(payload["condition"], "Partly cloudy");

        let unknown = parse_weather_text("Atlantis", "no data").to_payload();
        assert!(unknown["degree_c"].is_null());
    }
}
