//! Response Validation
//!
//! Validates a parsed model reply against the analysis output contract:
//! - Required fields presence and types
//! - Valid category enum values
//! - Exact recommendation count
//! - Unique recommendation ids

use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

use crate::constants::consultation::RECOMMENDATION_COUNT;
use crate::types::ProductCategory;

/// Severity levels for validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Response is unusable
    Error,
    /// Response usable but degraded quality
    Warning,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueSeverity::Error => write!(f, "ERROR"),
            IssueSeverity::Warning => write!(f, "WARN"),
        }
    }
}

/// A single validation issue
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub message: String,
    pub location: Option<String>,
}

impl ValidationIssue {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            message: message.into(),
            location: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            message: message.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "[{}] {}: {}", self.severity, loc, self.message),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// Validation result containing all issues found
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if response is valid (no errors)
    pub fn is_valid(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|i| i.severity == IssueSeverity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
            .count()
    }

    /// Error messages joined for logging
    pub fn error_summary(&self) -> String {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }
}

/// Response validator for analysis output
pub struct ResponseValidator {
    valid_categories: HashSet<&'static str>,
    expected_recommendations: usize,
}

impl Default for ResponseValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseValidator {
    pub fn new() -> Self {
        Self {
            valid_categories: ProductCategory::ALL.iter().map(|c| c.as_str()).collect(),
            expected_recommendations: RECOMMENDATION_COUNT,
        }
    }

    /// Validate an analysis response
    pub fn validate_analysis(&self, response: &Value) -> ValidationResult {
        let mut result = ValidationResult::new();

        if !response.is_object() {
            result.add(ValidationIssue::error("Response must be a JSON object"));
            return result;
        }

        require_text(response, "bodyShape", "$", &mut result);
        require_text(response, "advice", "$", &mut result);

        let recommendations = match response.get("recommendations") {
            Some(Value::Array(arr)) => arr,
            Some(_) => {
                result.add(ValidationIssue::error("'recommendations' must be an array"));
                return result;
            }
            None => {
                result.add(ValidationIssue::error(
                    "Missing required 'recommendations' field",
                ));
                return result;
            }
        };

        if recommendations.len() != self.expected_recommendations {
            result.add(ValidationIssue::error(format!(
                "Expected {} recommendations, got {}",
                self.expected_recommendations,
                recommendations.len()
            )));
        }

        let mut seen_ids = HashSet::new();
        for (idx, item) in recommendations.iter().enumerate() {
            self.validate_recommendation(item, idx, &mut seen_ids, &mut result);
        }

        if let Some(extra) = response.as_object().map(|obj| {
            obj.keys()
                .filter(|k| !matches!(k.as_str(), "bodyShape" | "advice" | "recommendations"))
                .cloned()
                .collect::<Vec<_>>()
        }) && !extra.is_empty()
        {
            result.add(ValidationIssue::warning(format!(
                "Ignoring unexpected fields: {}",
                extra.join(", ")
            )));
        }

        result
    }

    fn validate_recommendation<'a>(
        &self,
        item: &'a Value,
        idx: usize,
        seen_ids: &mut HashSet<&'a str>,
        result: &mut ValidationResult,
    ) {
        let location = format!("recommendations[{}]", idx);

        if !item.is_object() {
            result.add(ValidationIssue::error("Recommendation must be an object").at(&location));
            return;
        }

        for field in ["id", "name", "description"] {
            require_text(item, field, &location, result);
        }
        // May be a placeholder, including empty
        if !item.get("buyUrl").is_some_and(Value::is_string) {
            result.add(ValidationIssue::error("Missing or invalid 'buyUrl'").at(&location));
        }

        if let Some(id) = item.get("id").and_then(Value::as_str)
            && !id.is_empty()
            && !seen_ids.insert(id)
        {
            result.add(
                ValidationIssue::error(format!("Duplicate recommendation id '{}'", id))
                    .at(&location),
            );
        }

        match item.get("category").and_then(Value::as_str) {
            Some(category) if self.valid_categories.contains(category) => {}
            Some(category) => {
                result.add(
                    ValidationIssue::error(format!(
                        "Invalid category '{}', expected one of: Top, Bottom, Dress, Shoes, Accessory",
                        category
                    ))
                    .at(format!("{}.category", location)),
                );
            }
            None => {
                result.add(
                    ValidationIssue::error("Missing or invalid 'category'")
                        .at(format!("{}.category", location)),
                );
            }
        }
    }
}

fn require_text(value: &Value, field: &str, location: &str, result: &mut ValidationResult) {
    match value.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => {}
        Some(Value::String(_)) => {
            result.add(ValidationIssue::error(format!("Empty '{}'", field)).at(location));
        }
        _ => {
            result.add(
                ValidationIssue::error(format!("Missing or invalid '{}'", field)).at(location),
            );
        }
    }
}
