//! Offline consultation result.

use crate::constants::consultation::OFFLINE_BODY_SHAPE;
use crate::types::{AnalysisResult, ProductCategory, ProductRecommendation};

const OFFLINE_ADVICE: &str = "We couldn't reach our AI stylist right now, but based on your measurements, focus on balancing your proportions.";

const PLACEHOLDER_URL: &str = "#";

/// Fixed result used when the model call fails for any reason.
pub fn fallback() -> AnalysisResult {
    let items = [
        (
            "1",
            "Classic Fit Shirt",
            "A versatile staple.",
            ProductCategory::Top,
        ),
        (
            "2",
            "Straight Leg Jeans",
            "Timeless and flattering.",
            ProductCategory::Bottom,
        ),
        (
            "3",
            "Leather Belt",
            "Adds a finishing touch.",
            ProductCategory::Accessory,
        ),
    ];

    AnalysisResult {
        body_shape: OFFLINE_BODY_SHAPE.to_string(),
        advice: OFFLINE_ADVICE.to_string(),
        recommendations: items
            .into_iter()
            .map(|(id, name, description, category)| ProductRecommendation {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                category,
                buy_url: PLACEHOLDER_URL.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_shape() {
        let result = fallback();
        assert_eq!(result.body_shape, "Calculated (Offline)");
        let ids: Vec<_> = result.recommendations.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        let categories: Vec<_> = result.recommendations.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            [
                ProductCategory::Top,
                ProductCategory::Bottom,
                ProductCategory::Accessory
            ]
        );
        assert!(result.recommendations.iter().all(|r| r.buy_url == "#"));
    }

    #[test]
    fn test_fallback_idempotent() {
        assert_eq!(fallback(), fallback());
    }
}
