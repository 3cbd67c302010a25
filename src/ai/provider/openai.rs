//! OpenAI API Provider
//!
//! LLM provider using OpenAI's Chat Completions API with strict JSON-schema output.
//! Returns LlmResponse with token usage metrics.

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
use crate::constants::provider::{OPENAI, OPENAI_API_BASE, OPENAI_DEFAULT_MODEL};
use crate::types::{ErrorCategory, ErrorClassifier, Result, StyleError};

const SCHEMA_NAME: &str = "analysis_result";

/// OpenAI API Provider with secure API key handling
pub struct OpenAiProvider {
    credentials: Credentials,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    system_instruction: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("credentials", &self.credentials)
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(config: &ProviderConfig, credentials: Credentials) -> Result<Self> {
        let api_base =
            validate_endpoint(config.api_base.as_deref().unwrap_or(OPENAI_API_BASE))?;

        let model = config
            .model
            .clone()
            .unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_string());

        Ok(Self {
            credentials,
            api_base,
            model,
            temperature: config.temperature,
            max_tokens: config.max_output_tokens,
            system_instruction: config.system_instruction.clone(),
            client: build_http_client(config.timeout_secs)?,
        })
    }

    fn build_request(&self, prompt: &str, schema: &Value) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if !self.system_instruction.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: self.system_instruction.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        let response_format = if schema.is_null() {
            ResponseFormat {
                format_type: "json_object".to_string(),
                json_schema: None,
            }
        } else {
            ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: Some(JsonSchemaFormat {
                    name: SCHEMA_NAME.to_string(),
                    strict: true,
                    schema: schema.clone(),
                }),
            }
        };

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: Some(self.max_tokens),
            response_format,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<LlmResponse> {
        let api_key = self.credentials.require(OPENAI)?;

        info!(
            "Generating with OpenAI (model: {}, temperature: {})",
            self.model, self.temperature
        );

        let start_time = Instant::now();
        let request = self.build_request(prompt, schema);
        let url = format!("{}/chat/completions", self.api_base);

        debug!("Sending request to OpenAI API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(e, OPENAI))?;

        let elapsed = start_time.elapsed();

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("OpenAI API error ({}): {}", status, body),
                OPENAI,
            )
            .into());
        }

        let response_body: ChatCompletionResponse = response.json().await.map_err(|e| {
            StyleError::llm_with_category(
                ErrorCategory::ParseError,
                format!("Failed to parse OpenAI response: {}", e),
            )
        })?;

        let usage = response_body
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let content_str = response_body
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| {
                StyleError::llm_with_category(
                    ErrorCategory::ParseError,
                    "Empty response from OpenAI",
                )
            })?;

        debug!("Received response from OpenAI, parsing JSON");
        let content = extract_json_from_response(content_str)?;

        Ok(LlmResponse {
            content,
            usage,
            timing: ResponseTiming::from_duration(elapsed),
            metadata: ResponseMetadata {
                model: self.model.clone(),
                provider: OPENAI.to_string(),
            },
        })
    }

    fn name(&self) -> &str {
        OPENAI
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    json_schema: Option<JsonSchemaFormat>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: String,
    strict: bool,
    schema: Value,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider(credentials: Credentials) -> OpenAiProvider {
        let config = ProviderConfig {
            provider: OPENAI.to_string(),
            api_base: Some("http://127.0.0.1:1/v1".to_string()),
            timeout_secs: 5,
            ..ProviderConfig::default()
        };
        OpenAiProvider::new(&config, credentials).unwrap()
    }

    #[test]
    fn test_strict_schema_request() {
        let p = provider(Credentials::from_key("k", "test"));
        let schema = json!({"type": "object", "additionalProperties": false});
        let body = serde_json::to_value(p.build_request("hi", &schema)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert_eq!(body["response_format"]["json_schema"]["schema"], schema);
    }

    #[test]
    fn test_schemaless_request_uses_json_object() {
        let p = provider(Credentials::from_key("k", "test"));
        let body = serde_json::to_value(p.build_request("hi", &Value::Null)).unwrap();
        assert_eq!(body["response_format"]["type"], "json_object");
        assert!(body["response_format"].get("json_schema").is_none());
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let p = provider(Credentials::missing("OPENAI_API_KEY"));
        let err = p.generate("prompt", &json!({})).await.unwrap_err();
        assert!(matches!(err, StyleError::MissingCredentials { .. }));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
