//! JSON Extraction
//!
//! Pulls the JSON payload out of an LLM reply.
//!
//! Handles the formatting noise models add around otherwise valid JSON:
//! - Markdown code fence wrapping (```json ... ```)
//! - Byte order marks and surrounding whitespace
//! - A JSON object embedded in explanatory text
//!
//! Truncated or malformed JSON is never patched up: an unusable body is an error.

use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{ErrorCategory, Result, StyleError};

/// Extract and parse JSON from an LLM response
pub fn extract_json_from_response(content: &str) -> Result<Value> {
    JsonExtractor::new().extract(content)
}

/// JSON extraction strategies
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExtractor;

impl JsonExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse the reply, falling back to the first balanced object inside it
    pub fn extract(&self, raw: &str) -> Result<Value> {
        let cleaned = self.preprocess(raw);

        if cleaned.is_empty() {
            return Err(StyleError::llm_with_category(
                ErrorCategory::ParseError,
                "Empty response from model",
            ));
        }

        match serde_json::from_str::<Value>(&cleaned) {
            Ok(value) => return Ok(value),
            Err(e) => debug!("Direct JSON parse failed: {}", e),
        }

        if let Some(embedded) = self.find_embedded_object(&cleaned)
            && let Ok(value) = serde_json::from_str::<Value>(embedded)
        {
            warn!("JSON extracted from mixed content");
            return Ok(value);
        }

        Err(StyleError::llm_with_category(
            ErrorCategory::ParseError,
            format!(
                "Failed to parse JSON from model response. Content preview: {}...",
                cleaned.chars().take(200).collect::<String>()
            ),
        ))
    }

    fn preprocess(&self, raw: &str) -> String {
        let s = raw.trim().trim_start_matches('\u{feff}');
        self.strip_code_fences(s).trim().to_string()
    }

    /// Strip markdown code fences
    fn strip_code_fences<'a>(&self, s: &'a str) -> &'a str {
        let mut result = s;

        if result.starts_with("```")
            && let Some(first_newline) = result.find('\n')
        {
            result = &result[first_newline + 1..];
        }

        if let Some(stripped) = result.trim_end().strip_suffix("```") {
            result = stripped;
        }

        result
    }

    /// Locate the first complete `{ ... }` block, respecting string literals
    fn find_embedded_object<'a>(&self, s: &'a str) -> Option<&'a str> {
        let start = s.find('{')?;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escape = false;

        for (offset, ch) in s[start..].char_indices() {
            if escape {
                escape = false;
                continue;
            }

            match ch {
                '\\' if in_string => escape = true,
                '"' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&s[start..start + offset + 1]);
                    }
                }
                _ => {}
            }
        }

        None
    }
}
