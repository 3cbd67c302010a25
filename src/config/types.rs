//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/stylewise/) and project (.stylewise/) level configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{consultation, network, provider};
use crate::types::{Result, StyleError};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Consultation content settings
    pub consultation: ConsultationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            consultation: ConsultationConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        if !provider::SUPPORTED.contains(&self.llm.provider.as_str()) {
            return Err(StyleError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.llm.provider,
                provider::SUPPORTED.join(", ")
            )));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(StyleError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(StyleError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self
            .llm
            .api_key_env
            .as_deref()
            .is_some_and(|var| var.trim().is_empty())
        {
            return Err(StyleError::Config(
                "LLM api_key_env must name an environment variable".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: "gemini" or "openai"
    pub provider: String,

    /// Model name (provider default when unset)
    pub model: Option<String>,

    /// API base URL override
    pub api_base: Option<String>,

    /// API key. Never serialized; prefer `api_key_env`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Environment variable the API key is read from (provider default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens in the model's reply
    pub max_output_tokens: u32,
}

impl LlmConfig {
    /// Environment variable the key is read from for the selected provider
    pub fn key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| provider::default_api_key_env(&self.provider))
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_key_env", &self.api_key_env)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: provider::GEMINI.to_string(),
            model: None,
            api_base: None,
            api_key: None,
            api_key_env: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: consultation::DEFAULT_TEMPERATURE,
            max_output_tokens: consultation::DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

// =============================================================================
// Consultation Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsultationConfig {
    /// System instruction sent alongside every analysis prompt
    pub system_instruction: String,
}

impl Default for ConsultationConfig {
    fn default() -> Self {
        Self {
            system_instruction: consultation::DEFAULT_SYSTEM_INSTRUCTION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.key_env(), "GEMINI_API_KEY");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_key_env_follows_provider() {
        let mut config = Config::default();
        config.llm.provider = "openai".to_string();
        assert_eq!(config.llm.key_env(), "OPENAI_API_KEY");

        config.llm.api_key_env = Some("MY_KEY".to_string());
        assert_eq!(config.llm.key_env(), "MY_KEY");

        config.llm.api_key_env = Some("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.llm.temperature = 3.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.provider = "ollama".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_never_serialized() {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-secret".to_string());

        let rendered = toml::to_string_pretty(&config).unwrap();
        assert!(!rendered.contains("sk-secret"));
        assert!(!format!("{:?}", config.llm).contains("sk-secret"));
    }
}
