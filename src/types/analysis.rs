//! Analysis result types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of product categories a recommendation may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    Top,
    Bottom,
    Dress,
    Shoes,
    Accessory,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 5] = [
        ProductCategory::Top,
        ProductCategory::Bottom,
        ProductCategory::Dress,
        ProductCategory::Shoes,
        ProductCategory::Accessory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Top => "Top",
            ProductCategory::Bottom => "Bottom",
            ProductCategory::Dress => "Dress",
            ProductCategory::Shoes => "Shoes",
            ProductCategory::Accessory => "Accessory",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One suggested product. Opaque display data, not tied to a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecommendation {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub buy_url: String,
}

/// Body shape, advice and recommendations for one profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub body_shape: String,
    pub advice: String,
    pub recommendations: Vec<ProductRecommendation>,
}

/// Why a consultation fell back to the offline result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegradeReason {
    /// Credentials or provider configuration missing
    Configuration,
    /// The model call failed or returned unusable data
    Upstream,
}

impl fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradeReason::Configuration => write!(f, "configuration"),
            DegradeReason::Upstream => write!(f, "upstream"),
        }
    }
}

/// Result of one pipeline invocation, tagged with its origin.
///
/// Serialises as `{"kind": "ai", "data": {...}}` or
/// `{"kind": "fallback", "data": {...}, "reason": "upstream"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnalysisOutcome {
    Ai {
        data: AnalysisResult,
    },
    Fallback {
        data: AnalysisResult,
        reason: DegradeReason,
    },
}

impl AnalysisOutcome {
    pub fn result(&self) -> &AnalysisResult {
        match self {
            AnalysisOutcome::Ai { data } | AnalysisOutcome::Fallback { data, .. } => data,
        }
    }

    pub fn into_result(self) -> AnalysisResult {
        match self {
            AnalysisOutcome::Ai { data } | AnalysisOutcome::Fallback { data, .. } => data,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, AnalysisOutcome::Fallback { .. })
    }

    pub fn reason(&self) -> Option<DegradeReason> {
        match self {
            AnalysisOutcome::Ai { .. } => None,
            AnalysisOutcome::Fallback { reason, .. } => Some(*reason),
        }
    }
}
