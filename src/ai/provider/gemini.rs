//! Google Gemini Provider
//!
//! LLM provider using the Gemini `generateContent` API with a response schema.
//! Returns LlmResponse with token usage metrics from `usageMetadata`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

use super::{
    Credentials, LlmProvider, LlmResponse, ProviderConfig, ResponseMetadata, ResponseTiming,
    TokenUsage, build_http_client, transport_error, validate_endpoint,
};
use crate::ai::validation::extract_json_from_response;
use crate::constants::provider::{GEMINI, GEMINI_API_BASE, GEMINI_DEFAULT_MODEL};
use crate::types::{ErrorCategory, ErrorClassifier, Result, StyleError};

/// Gemini API Provider. The key lives in [`Credentials`] and never reaches Debug output.
pub struct GeminiProvider {
    credentials: Credentials,
    api_base: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    system_instruction: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("credentials", &self.credentials)
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig, credentials: Credentials) -> Result<Self> {
        let api_base =
            validate_endpoint(config.api_base.as_deref().unwrap_or(GEMINI_API_BASE))?;

        let model = config
            .model
            .clone()
            .unwrap_or_else(|| GEMINI_DEFAULT_MODEL.to_string());

        Ok(Self {
            credentials,
            api_base,
            model,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            system_instruction: config.system_instruction.clone(),
            client: build_http_client(config.timeout_secs)?,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    fn build_request(&self, prompt: &str, schema: &Value) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            system_instruction: (!self.system_instruction.is_empty()).then(|| Content {
                role: None,
                parts: vec![Part {
                    text: self.system_instruction.clone(),
                }],
            }),
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: (!schema.is_null()).then(|| to_gemini_schema(schema)),
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<LlmResponse> {
        let api_key = self.credentials.require(GEMINI)?;

        info!(
            "Generating with Gemini (model: {}, temperature: {})",
            self.model, self.temperature
        );

        let start_time = Instant::now();
        let request = self.build_request(prompt, schema);

        debug!("Sending request to Gemini API");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(e, GEMINI))?;

        let elapsed = start_time.elapsed();

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("Gemini API error ({}): {}", status, body),
                GEMINI,
            )
            .into());
        }

        let response_body: GenerateContentResponse = response.json().await.map_err(|e| {
            StyleError::llm_with_category(
                ErrorCategory::ParseError,
                format!("Failed to parse Gemini response: {}", e),
            )
        })?;

        let usage = response_body
            .usage_metadata
            .map(|u| TokenUsage::new(u.prompt_token_count, u.candidates_token_count))
            .unwrap_or_default();

        let text = response_body
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                StyleError::llm_with_category(
                    ErrorCategory::ParseError,
                    "Empty response from Gemini",
                )
            })?;

        debug!("Received response from Gemini, parsing JSON");
        let content = extract_json_from_response(&text)?;

        Ok(LlmResponse {
            content,
            usage,
            timing: ResponseTiming::from_duration(elapsed),
            metadata: ResponseMetadata {
                model: self.model.clone(),
                provider: GEMINI.to_string(),
            },
        })
    }

    fn name(&self) -> &str {
        GEMINI
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Convert a JSON-Schema document into Gemini's OpenAPI subset.
///
/// Type names become uppercase and `additionalProperties` is dropped.
pub fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| key.as_str() != "additionalProperties")
                .map(|(key, value)| {
                    let converted = match (key.as_str(), value) {
                        ("type", Value::String(t)) => Value::String(t.to_uppercase()),
                        _ => to_gemini_schema(value),
                    };
                    (key.clone(), converted)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider(credentials: Credentials, api_base: Option<&str>) -> GeminiProvider {
        let config = ProviderConfig {
            api_base: api_base.map(String::from),
            timeout_secs: 5,
            ..ProviderConfig::default()
        };
        GeminiProvider::new(&config, credentials).unwrap()
    }

    #[test]
    fn test_gemini_schema_conversion() {
        let schema = json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "items": {
                    "type": "array",
                    "items": {"type": "object", "additionalProperties": false, "properties": {"id": {"type": "string"}}}
                }
            },
            "required": ["items"]
        });

        let converted = to_gemini_schema(&schema);
        assert_eq!(converted["type"], "OBJECT");
        assert!(converted.get("additionalProperties").is_none());
        assert_eq!(converted["properties"]["items"]["type"], "ARRAY");
        assert_eq!(
            converted["properties"]["items"]["items"]["properties"]["id"]["type"],
            "STRING"
        );
        assert!(
            converted["properties"]["items"]["items"]
                .get("additionalProperties")
                .is_none()
        );
        assert_eq!(converted["required"], json!(["items"]));
    }

    #[test]
    fn test_request_body_shape() {
        let p = provider(Credentials::from_key("k", "test"), None);
        let body =
            serde_json::to_value(p.build_request("hello", &json!({"type": "object"}))).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(body["systemInstruction"]["parts"][0]["text"].is_string());
        assert!(p.endpoint().ends_with("/models/gemini-2.5-flash:generateContent"));
    }

    #[test]
    fn test_invalid_api_base_rejected() {
        let config = ProviderConfig {
            api_base: Some("file:///etc/passwd".to_string()),
            ..ProviderConfig::default()
        };
        assert!(matches!(
            GeminiProvider::new(&config, Credentials::missing("GEMINI_API_KEY")),
            Err(StyleError::Config(_))
        ));
    }

    #[test]
    fn test_debug_hides_key() {
        let p = provider(Credentials::from_key("secret-value", "test"), None);
        assert!(!format!("{:?}", p).contains("secret-value"));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_network() {
        // Unroutable base: any network attempt would surface as LlmApi, not MissingCredentials
        let p = provider(
            Credentials::missing("GEMINI_API_KEY"),
            Some("http://127.0.0.1:1"),
        );
        let err = p.generate("prompt", &json!({})).await.unwrap_err();
        assert!(matches!(err, StyleError::MissingCredentials { .. }));
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        let p = provider(Credentials::from_key("k", "test"), Some("http://127.0.0.1:1"));
        let err = p.generate("prompt", &json!({})).await.unwrap_err();
        let classified = ErrorClassifier::classify_style_error(&err, GEMINI);
        assert_eq!(classified.category, ErrorCategory::Network);
    }
}
