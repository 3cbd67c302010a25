//! JSON Schema for the consultation output.
//!
//! Sent to the provider as the response schema and mirrored by
//! [`ResponseValidator`](crate::ai::validation::ResponseValidator) on the way back.

use serde_json::{Value, json};

use crate::types::ProductCategory;

/// Schema provider for consultation output
pub struct StyleSchemas;

impl StyleSchemas {
    /// JSON schema for a single product recommendation
    pub fn recommendation_schema() -> Value {
        let categories: Vec<&str> = ProductCategory::ALL.iter().map(|c| c.as_str()).collect();

        json!({
            "type": "object",
            "description": "A clothing product that flatters the user",
            "required": ["id", "name", "description", "category", "buyUrl"],
            "additionalProperties": false,
            "properties": {
                "id": {"type": "string", "description": "Identifier, unique within this result"},
                "name": {"type": "string", "description": "Product name"},
                "description": {"type": "string", "description": "Why this product suits the user"},
                "category": {
                    "type": "string",
                    "description": "Product category",
                    "enum": categories
                },
                "buyUrl": {"type": "string", "description": "Where to buy, or a placeholder"}
            }
        })
    }

    /// JSON schema for the full analysis result
    pub fn analysis_schema() -> Value {
        json!({
            "type": "object",
            "description": "Body-shape analysis with styling advice and product recommendations",
            "required": ["bodyShape", "advice", "recommendations"],
            "additionalProperties": false,
            "properties": {
                "bodyShape": {"type": "string", "description": "Body shape classification"},
                "advice": {
                    "type": "string",
                    "description": "Styling advice tailored to gender, body shape and skin tone"
                },
                "recommendations": {
                    "type": "array",
                    "description": "Exactly three products: a Top, a Bottom and one other item",
                    "items": Self::recommendation_schema()
                }
            }
        })
    }
}
