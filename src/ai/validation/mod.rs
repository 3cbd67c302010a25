//! AI Response Validation
//!
//! Validation layer for LLM responses ensuring:
//! - JSON extraction from noisy replies
//! - Structural integrity (required fields, valid enums, exact counts)
//! - Typed conversion into [`AnalysisResult`]
//!
//! A reply that fails validation is never handed to rendering.

mod extract;
mod response;

pub use extract::{JsonExtractor, extract_json_from_response};
pub use response::{IssueSeverity, ResponseValidator, ValidationIssue, ValidationResult};

use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{AnalysisResult, Result, StyleError, ValidationError, ValidationErrorKind};

/// Validation pipeline: structural check, then typed conversion
pub struct ValidationPipeline {
    validator: ResponseValidator,
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationPipeline {
    pub fn new() -> Self {
        Self {
            validator: ResponseValidator::new(),
        }
    }

    /// Validate parsed model output and convert it into an [`AnalysisResult`]
    pub fn analysis_from_value(&self, value: Value) -> Result<AnalysisResult> {
        let validation = self.validator.validate_analysis(&value);

        for issue in validation
            .issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
        {
            debug!("Response validation: {}", issue);
        }

        if !validation.is_valid() {
            warn!(
                "Model response violates output schema ({} errors)",
                validation.error_count()
            );
            return Err(ValidationError::new(
                ValidationErrorKind::Schema,
                validation.error_summary(),
            )
            .into());
        }

        serde_json::from_value(value).map_err(|e| {
            StyleError::from(ValidationError::new(
                ValidationErrorKind::Schema,
                e.to_string(),
            ))
        })
    }

    /// Extract, validate and convert a raw text reply
    pub fn process(&self, raw_response: &str) -> Result<AnalysisResult> {
        let value = extract_json_from_response(raw_response)?;
        self.analysis_from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductCategory;

    const VALID: &str = r#"```json
    {
        "bodyShape": "Rectangle",
        "advice": "Add structure at the shoulders.",
        "recommendations": [
            {"id": "1", "name": "Peplum Top", "description": "Adds curves.", "category": "Top", "buyUrl": "https://shop.example/1"},
            {"id": "2", "name": "Flared Jeans", "description": "Balances hips.", "category": "Bottom", "buyUrl": "https://shop.example/2"},
            {"id": "3", "name": "Block Heels", "description": "Adds height.", "category": "Shoes", "buyUrl": "https://shop.example/3"}
        ]
    }
    ```"#;

    #[test]
    fn test_pipeline_valid_response() {
        let result = ValidationPipeline::new().process(VALID).unwrap();
        assert_eq!(result.body_shape, "Rectangle");
        assert_eq!(result.recommendations.len(), 3);
        assert_eq!(result.recommendations[2].category, ProductCategory::Shoes);
    }

    #[test]
    fn test_pipeline_rejects_schema_violation() {
        let raw = r#"{"bodyShape": "Oval", "advice": "x", "recommendations": []}"#;
        let err = ValidationPipeline::new().process(raw).unwrap_err();
        match err {
            StyleError::Validation(v) => assert_eq!(v.kind, ValidationErrorKind::Schema),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_pipeline_keeps_empty_buy_url() {
        let raw = VALID.replace("https://shop.example/1", "");
        let result = ValidationPipeline::new().process(&raw).unwrap();
        assert_eq!(result.recommendations[0].buy_url, "");
    }

    #[test]
    fn test_pipeline_rejects_unparsable() {
        assert!(matches!(
            ValidationPipeline::new().process("not json at all"),
            Err(StyleError::Llm(_))
        ));
    }
}
