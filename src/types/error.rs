//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Categories
//!
//! - **RateLimit**: API rate limiting
//! - **Auth**: Authentication failures
//! - **Network**: Connectivity issues and timeouts
//! - **Unavailable**: Provider unavailable
//! - **ParseError**: Response body is not usable JSON
//! - **SchemaViolation**: Response parsed but does not match the requested shape
//!
//! Categories are diagnostic only. The analysis pipeline never retries; every
//! failure at the adapter boundary collapses into an [`AdapterError`] and is
//! answered with the offline fallback.

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories used for logging and failure attribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited by the provider
    RateLimit,
    /// Authentication failed (bad or revoked key)
    Auth,
    /// Network/connectivity issues, including timeouts
    Network,
    /// Provider unavailable (5xx, unknown model)
    Unavailable,
    /// Invalid request
    BadRequest,
    /// Empty or unparsable response body
    ParseError,
    /// Parsed response does not match the output schema
    SchemaViolation,
    /// Temporary server issues
    Transient,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::SchemaViolation => write!(f, "SCHEMA_VIOLATION"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// LLM error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category for attribution
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    /// Create error with provider context
    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps raw provider failures onto [`ErrorCategory`]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an error message from any provider
    pub fn classify(message: &str, provider: &str) -> LlmError {
        let lower = message.to_lowercase();

        if lower.contains("rate limit")
            || lower.contains("429")
            || lower.contains("too many requests")
            || lower.contains("quota")
        {
            return LlmError::with_provider(ErrorCategory::RateLimit, message, provider);
        }

        if lower.contains("401")
            || lower.contains("403")
            || lower.contains("api key")
            || lower.contains("unauthorized")
            || lower.contains("permission denied")
        {
            return LlmError::with_provider(ErrorCategory::Auth, message, provider);
        }

        if lower.contains("connect")
            || lower.contains("dns")
            || lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("unreachable")
        {
            return LlmError::with_provider(ErrorCategory::Network, message, provider);
        }

        if lower.contains("503")
            || lower.contains("502")
            || lower.contains("service unavailable")
            || lower.contains("not found")
        {
            return LlmError::with_provider(ErrorCategory::Unavailable, message, provider);
        }

        if lower.contains("parse") || lower.contains("json") || lower.contains("empty response")
        {
            return LlmError::with_provider(ErrorCategory::ParseError, message, provider);
        }

        if lower.contains("400") || lower.contains("bad request") {
            return LlmError::with_provider(ErrorCategory::BadRequest, message, provider);
        }

        LlmError::with_provider(ErrorCategory::Unknown, message, provider)
    }

    /// Classify HTTP status code directly (more accurate than string matching)
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 => ErrorCategory::BadRequest,
            404 => ErrorCategory::Unavailable,
            500 | 502 | 503 | 504 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        LlmError::with_provider(category, message, provider)
    }

    /// Classify a StyleError with type-based routing
    pub fn classify_style_error(err: &StyleError, provider: &str) -> LlmError {
        match err {
            StyleError::Llm(llm_err) => {
                let mut llm_err = llm_err.clone();
                if llm_err.provider.is_none() {
                    llm_err.provider = Some(provider.to_string());
                }
                llm_err
            }
            StyleError::LlmApi(msg) => Self::classify(msg, provider),
            StyleError::Timeout { .. } | StyleError::Io(_) => {
                LlmError::with_provider(ErrorCategory::Network, err.to_string(), provider)
            }
            StyleError::Json(_) => {
                LlmError::with_provider(ErrorCategory::ParseError, err.to_string(), provider)
            }
            StyleError::Validation(_) => {
                LlmError::with_provider(ErrorCategory::SchemaViolation, err.to_string(), provider)
            }
            _ => LlmError::with_provider(ErrorCategory::Unknown, err.to_string(), provider),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Structured validation error with context
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// What validation failed
    pub kind: ValidationErrorKind,
    /// Field that failed validation
    pub field: Option<String>,
    /// Detailed message
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Validation failed for '{}': {}", field, self.message)
        } else {
            write!(f, "Validation failed: {}", self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
        }
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Validation error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Output schema validation failed
    Schema,
    /// Required field missing
    MissingField,
    /// Value out of range
    Range,
}

// =============================================================================
// Adapter Error
// =============================================================================

/// Terminal failure of the AI client adapter.
///
/// Both variants route to the offline fallback; nothing here escapes the pipeline.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    /// Credentials or provider configuration missing; no request was attempted
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The call failed, timed out, or returned an unusable payload
    #[error("upstream error: {0}")]
    Upstream(LlmError),
}

impl AdapterError {
    /// Convert any crate error raised while calling a provider
    pub fn from_style_error(err: StyleError, provider: &str) -> Self {
        match err {
            StyleError::Config(msg) => Self::Configuration(msg),
            StyleError::MissingCredentials { .. } => Self::Configuration(err.to_string()),
            other => Self::Upstream(ErrorClassifier::classify_style_error(&other, provider)),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Structured LLM error with category
    #[error("LLM error: {0}")]
    Llm(LlmError),

    /// Simple LLM API error (use Llm variant for structured errors)
    #[error("LLM API error: {0}")]
    LlmApi(String),

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    #[error("{0}")]
    Validation(ValidationError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("No API key for {provider}: set {env_var} or llm.api_key")]
    MissingCredentials { provider: String, env_var: String },
}

impl From<LlmError> for StyleError {
    fn from(err: LlmError) -> Self {
        StyleError::Llm(err)
    }
}

impl From<ValidationError> for StyleError {
    fn from(err: ValidationError) -> Self {
        StyleError::Validation(err)
    }
}

pub type Result<T> = std::result::Result<T, StyleError>;

impl StyleError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create an LLM error with category
    pub fn llm_with_category(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self::Llm(LlmError::new(category, message))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::SchemaViolation.to_string(), "SCHEMA_VIOLATION");
        assert_eq!(ErrorCategory::Auth.to_string(), "AUTH");
    }

    #[test]
    fn test_classify_rate_limit() {
        let err = ErrorClassifier::classify("Rate limit exceeded", "gemini");
        assert_eq!(err.category, ErrorCategory::RateLimit);
    }

    #[test]
    fn test_classify_auth() {
        let err = ErrorClassifier::classify("Invalid API key provided", "openai");
        assert_eq!(err.category, ErrorCategory::Auth);
    }

    #[test]
    fn test_classify_network() {
        let err = ErrorClassifier::classify("error trying to connect: refused", "gemini");
        assert_eq!(err.category, ErrorCategory::Network);
    }

    #[test]
    fn test_classify_unknown() {
        let err = ErrorClassifier::classify("Something weird happened", "test");
        assert_eq!(err.category, ErrorCategory::Unknown);
    }

    #[test]
    fn test_classify_http_status() {
        assert_eq!(
            ErrorClassifier::classify_http_status(429, "slow down", "t").category,
            ErrorCategory::RateLimit
        );
        assert_eq!(
            ErrorClassifier::classify_http_status(403, "forbidden", "t").category,
            ErrorCategory::Auth
        );
        assert_eq!(
            ErrorClassifier::classify_http_status(503, "busy", "t").category,
            ErrorCategory::Transient
        );
    }

    #[test]
    fn test_adapter_error_from_missing_credentials() {
        let err = StyleError::MissingCredentials {
            provider: "gemini".to_string(),
            env_var: "GEMINI_API_KEY".to_string(),
        };
        let adapted = AdapterError::from_style_error(err, "gemini");
        assert!(adapted.is_configuration());
        assert!(adapted.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_adapter_error_from_timeout() {
        let err = StyleError::timeout("style analysis", Duration::from_secs(5));
        match AdapterError::from_style_error(err, "gemini") {
            AdapterError::Upstream(llm) => {
                assert_eq!(llm.category, ErrorCategory::Network);
                assert_eq!(llm.provider.as_deref(), Some("gemini"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[test]
    fn test_adapter_error_from_validation() {
        let err = StyleError::from(ValidationError::new(
            ValidationErrorKind::Schema,
            "recommendations must contain 3 items",
        ));
        match AdapterError::from_style_error(err, "openai") {
            AdapterError::Upstream(llm) => {
                assert_eq!(llm.category, ErrorCategory::SchemaViolation)
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::with_provider(ErrorCategory::RateLimit, "Too many requests", "openai");
        assert_eq!(err.to_string(), "[openai:RATE_LIMIT] Too many requests");

        let err_no_provider = LlmError::new(ErrorCategory::Network, "Connection failed");
        assert_eq!(err_no_provider.to_string(), "[NETWORK] Connection failed");
    }
}
