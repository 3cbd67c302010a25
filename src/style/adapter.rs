//! AI client adapter.
//!
//! One provider call per consultation, bounded by a timeout, with the reply
//! validated before it becomes an [`AnalysisResult`]. Every failure is mapped
//! onto [`AdapterError`].

use std::time::Duration;
use tracing::{debug, info};

use super::request::AnalysisRequest;
use crate::ai::provider::{ResponseMetadata, ResponseTiming, SharedProvider, TokenUsage};
use crate::ai::timeout::with_timeout;
use crate::ai::validation::ValidationPipeline;
use crate::types::{AdapterError, AnalysisResult};

/// Validated model output plus call metrics
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub result: AnalysisResult,
    pub usage: TokenUsage,
    pub timing: ResponseTiming,
    pub metadata: ResponseMetadata,
}

pub struct StyleAdapter {
    provider: SharedProvider,
    timeout: Duration,
    validation: ValidationPipeline,
}

impl StyleAdapter {
    pub fn new(provider: SharedProvider, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            validation: ValidationPipeline::new(),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Perform the model call. No retries.
    pub async fn call_model(
        &self,
        request: &AnalysisRequest,
    ) -> std::result::Result<ModelReply, AdapterError> {
        let provider = self.provider.name().to_string();

        info!(
            "Requesting consultation from {} ({})",
            provider,
            self.provider.model()
        );

        let response = with_timeout(
            self.timeout,
            self.provider
                .generate(&request.prompt, &request.output_schema),
            "style analysis",
        )
        .await
        .map_err(|e| AdapterError::from_style_error(e, &provider))?;

        debug!(
            "Model replied in {}ms ({} input / {} output tokens)",
            response.timing.total_ms, response.usage.input_tokens, response.usage.output_tokens
        );

        let result = self
            .validation
            .analysis_from_value(response.content)
            .map_err(|e| AdapterError::from_style_error(e, &provider))?;

        Ok(ModelReply {
            result,
            usage: response.usage,
            timing: response.timing,
            metadata: response.metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::{LlmProvider, LlmResponse};
    use crate::types::{ErrorCategory, Result, StyleError};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedProvider {
        reply: fn() -> Result<Value>,
        calls: AtomicUsize,
        delay: Duration,
    }

    impl ScriptedProvider {
        fn new(reply: fn() -> Result<Value>) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn generate(&self, _prompt: &str, _schema: &Value) -> Result<LlmResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            (self.reply)().map(LlmResponse::content_only)
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "test-model"
        }
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            prompt: "prompt".to_string(),
            output_schema: json!({}),
        }
    }

    fn valid_reply() -> Result<Value> {
        Ok(json!({
            "bodyShape": "Inverted Triangle",
            "advice": "Balance broad shoulders with volume below the waist.",
            "recommendations": [
                {"id": "a", "name": "V-Neck Tee", "description": "Softens the shoulder line.", "category": "Top", "buyUrl": "#"},
                {"id": "b", "name": "Wide-Leg Trousers", "description": "Adds lower volume.", "category": "Bottom", "buyUrl": "#"},
                {"id": "c", "name": "Chunky Sneakers", "description": "Grounds the look.", "category": "Shoes", "buyUrl": "#"}
            ]
        }))
    }

    #[tokio::test]
    async fn test_success_single_call() {
        let provider = Arc::new(ScriptedProvider::new(valid_reply));
        let adapter = StyleAdapter::new(provider.clone(), Duration::from_secs(1));

        let reply = adapter.call_model(&request()).await.unwrap();
        assert_eq!(reply.result.body_shape, "Inverted Triangle");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_credentials_is_configuration() {
        let provider = Arc::new(ScriptedProvider::new(|| {
            Err(StyleError::MissingCredentials {
                provider: "scripted".to_string(),
                env_var: "GEMINI_API_KEY".to_string(),
            })
        }));
        let err = StyleAdapter::new(provider, Duration::from_secs(1))
            .call_model(&request())
            .await
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_schema_violation_is_upstream() {
        let provider = Arc::new(ScriptedProvider::new(|| {
            Ok(json!({"bodyShape": "Oval", "advice": "x", "recommendations": []}))
        }));
        let err = StyleAdapter::new(provider.clone(), Duration::from_secs(1))
            .call_model(&request())
            .await
            .unwrap_err();

        match err {
            AdapterError::Upstream(e) => assert_eq!(e.category, ErrorCategory::SchemaViolation),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timeout_is_upstream() {
        let provider = Arc::new(ScriptedProvider {
            delay: Duration::from_secs(5),
            ..ScriptedProvider::new(valid_reply)
        });
        let err = StyleAdapter::new(provider, Duration::from_millis(20))
            .call_model(&request())
            .await
            .unwrap_err();

        match err {
            AdapterError::Upstream(e) => assert_eq!(e.category, ErrorCategory::Network),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
