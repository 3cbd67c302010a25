//! LLM Provider Abstraction
//!
//! Defines the LlmProvider trait for schema-constrained JSON generation.
//! All providers return `LlmResponse` with token usage metrics.
//!
//! Credentials are injected, never read from ambient state inside a provider.
//! A provider built without a key still constructs; `generate` then fails with
//! a configuration error before touching the network.

mod gemini;
mod openai;

pub use gemini::{GeminiProvider, to_gemini_schema};
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::constants::{consultation, network, provider as provider_constants};
use crate::types::{ErrorCategory, ErrorClassifier, LlmError, Result, StyleError};

// =============================================================================
// LLM Response with Usage Metrics
// =============================================================================

/// Complete LLM response including content and usage metrics
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated content (structured JSON)
    pub content: Value,
    /// Token usage metrics
    pub usage: TokenUsage,
    /// Response timing
    pub timing: ResponseTiming,
    /// Provider and model info
    pub metadata: ResponseMetadata,
}

impl LlmResponse {
    /// Create response with content only (usage unknown)
    pub fn content_only(content: Value) -> Self {
        Self {
            content,
            usage: TokenUsage::default(),
            timing: ResponseTiming::default(),
            metadata: ResponseMetadata::default(),
        }
    }
}

/// Token usage metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input tokens (prompt)
    pub input_tokens: u32,
    /// Output tokens (response)
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }
}

/// Response timing metrics
#[derive(Debug, Clone, Default)]
pub struct ResponseTiming {
    /// Total response time in milliseconds (wall clock)
    pub total_ms: u64,
}

impl ResponseTiming {
    pub fn from_duration(duration: Duration) -> Self {
        Self {
            total_ms: duration.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResponseMetadata {
    pub model: String,
    pub provider: String,
}

/// Shared LLM provider type
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Credentials
// =============================================================================

/// API key handed to a provider, plus where it was expected to come from
#[derive(Clone)]
pub struct Credentials {
    key: Option<SecretString>,
    source: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("source", &self.source)
            .finish()
    }
}

impl Credentials {
    /// Credentials holding a key
    pub fn from_key(key: impl Into<String>, source: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            key: (!key.trim().is_empty()).then(|| SecretString::from(key)),
            source: source.into(),
        }
    }

    /// Explicitly absent credentials
    pub fn missing(source: impl Into<String>) -> Self {
        Self {
            key: None,
            source: source.into(),
        }
    }

    /// Resolve from config, then the provider's env var, then (Gemini only) the legacy `API_KEY`
    pub fn resolve(config: &crate::config::LlmConfig) -> Self {
        Self::resolve_with(config, |name| std::env::var(name).ok())
    }

    /// Resolve with a custom variable lookup
    pub fn resolve_with<F>(config: &crate::config::LlmConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = config.api_key.as_deref()
            && !key.trim().is_empty()
        {
            return Self::from_key(key, "llm.api_key");
        }

        let mut vars = vec![config.key_env()];
        if config.provider == provider_constants::GEMINI {
            vars.push(provider_constants::LEGACY_API_KEY_ENV);
        }

        for var in vars {
            if let Some(key) = lookup(var)
                && !key.trim().is_empty()
            {
                return Self::from_key(key, var);
            }
        }

        Self::missing(config.key_env())
    }

    pub fn is_present(&self) -> bool {
        self.key.is_some()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Borrow the key or fail with a configuration error
    pub(crate) fn require(&self, provider: &str) -> Result<&str> {
        self.key
            .as_ref()
            .map(|k| k.expose_secret())
            .ok_or_else(|| StyleError::MissingCredentials {
                provider: provider.to_string(),
                env_var: self.source.clone(),
            })
    }
}

// =============================================================================
// Provider Configuration
// =============================================================================

/// Runtime settings shared by all providers
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider type: "gemini" or "openai"
    pub provider: String,
    /// Model name (provider default when unset)
    pub model: Option<String>,
    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// System instruction sent with every request
    pub system_instruction: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: provider_constants::GEMINI.to_string(),
            model: None,
            api_base: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: consultation::DEFAULT_TEMPERATURE,
            max_output_tokens: consultation::DEFAULT_MAX_OUTPUT_TOKENS,
            system_instruction: consultation::DEFAULT_SYSTEM_INSTRUCTION.to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            provider: config.llm.provider.clone(),
            model: config.llm.model.clone(),
            api_base: config.llm.api_base.clone(),
            timeout_secs: config.llm.timeout_secs,
            temperature: config.llm.temperature,
            max_output_tokens: config.llm.max_output_tokens,
            system_instruction: config.consultation.system_instruction.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Validate an endpoint URL: http/https only, trailing slash removed
pub(crate) fn validate_endpoint(endpoint: &str) -> Result<String> {
    let url = url::Url::parse(endpoint).map_err(|e| {
        StyleError::Config(format!("Invalid API endpoint URL '{}': {}", endpoint, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(StyleError::Config(format!(
            "API endpoint must use http or https scheme, got: {}",
            url.scheme()
        )));
    }

    let mut result = url.to_string();
    if result.ends_with('/') {
        result.pop();
    }
    Ok(result)
}

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(network::CONNECTION_TIMEOUT_SECS))
        .build()
        .map_err(|e| StyleError::LlmApi(format!("Failed to create HTTP client: {}", e)))
}

/// Map a transport failure onto a categorized error, keeping the source chain
pub(crate) fn transport_error(err: reqwest::Error, provider: &str) -> StyleError {
    let mut message = format!("{} request failed: {}", provider, err);
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(&format!(": {}", cause));
        source = std::error::Error::source(cause);
    }

    let category = if err.is_timeout() || err.is_connect() {
        ErrorCategory::Network
    } else {
        ErrorClassifier::classify(&message, provider).category
    };
    LlmError::with_provider(category, message, provider).into()
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// LLM Provider trait for structured output generation
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate JSON output constrained by `schema`.
    ///
    /// Exactly one outbound request per call, no retries.
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<LlmResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Create a shared provider from configuration and injected credentials
pub fn create_provider(config: &ProviderConfig, credentials: Credentials) -> Result<SharedProvider> {
    match config.provider.as_str() {
        provider_constants::GEMINI => Ok(Arc::new(GeminiProvider::new(config, credentials)?)),
        provider_constants::OPENAI => Ok(Arc::new(OpenAiProvider::new(config, credentials)?)),
        _ => Err(StyleError::Config(format!(
            "Unknown provider: {}. Supported: {}",
            config.provider,
            provider_constants::SUPPORTED.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;

    #[test]
    fn test_credentials_prefer_config_key() {
        let config = LlmConfig {
            api_key: Some("from-config".to_string()),
            ..LlmConfig::default()
        };
        let creds = Credentials::resolve_with(&config, |_| Some("from-env".to_string()));
        assert_eq!(creds.source(), "llm.api_key");
        assert_eq!(creds.require("gemini").unwrap(), "from-config");
    }

    #[test]
    fn test_credentials_env_then_legacy() {
        let config = LlmConfig::default();

        let creds = Credentials::resolve_with(&config, |name| {
            (name == "API_KEY").then(|| "legacy".to_string())
        });
        assert_eq!(creds.source(), "API_KEY");

        let creds = Credentials::resolve_with(&config, |name| {
            (name == "GEMINI_API_KEY").then(|| "primary".to_string())
        });
        assert_eq!(creds.require("gemini").unwrap(), "primary");
    }

    #[test]
    fn test_openai_never_picks_up_gemini_key() {
        let config = LlmConfig {
            provider: "openai".to_string(),
            ..LlmConfig::default()
        };
        let lookup = |name: &str| {
            matches!(name, "GEMINI_API_KEY" | "API_KEY").then(|| "gemini-key".to_string())
        };

        let creds = Credentials::resolve_with(&config, lookup);
        assert!(!creds.is_present());
        assert_eq!(creds.source(), "OPENAI_API_KEY");

        let creds = Credentials::resolve_with(&config, |name| {
            (name == "OPENAI_API_KEY").then(|| "openai-key".to_string())
        });
        assert_eq!(creds.require("openai").unwrap(), "openai-key");
    }

    #[test]
    fn test_blank_key_is_missing() {
        let config = LlmConfig::default();
        let creds = Credentials::resolve_with(&config, |_| Some("   ".to_string()));
        assert!(!creds.is_present());

        let err = creds.require("gemini").unwrap_err();
        assert!(matches!(err, StyleError::MissingCredentials { .. }));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_credentials_debug_redacted() {
        let creds = Credentials::from_key("super-secret", "test");
        assert!(!format!("{:?}", creds).contains("super-secret"));
    }

    #[test]
    fn test_validate_endpoint() {
        assert_eq!(
            validate_endpoint("https://example.com/v1/").unwrap(),
            "https://example.com/v1"
        );
        assert!(validate_endpoint("ftp://example.com").is_err());
        assert!(validate_endpoint("not a url").is_err());
    }

    #[test]
    fn test_create_provider_unknown() {
        let config = ProviderConfig {
            provider: "ollama".to_string(),
            ..ProviderConfig::default()
        };
        assert!(create_provider(&config, Credentials::missing("X")).is_err());
    }
}
