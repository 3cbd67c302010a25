//! Consultation request builder.
//!
//! Turns a complete profile into the prompt text and output schema for a
//! single model call. Pure: no I/O, no failure mode.

use serde::Serialize;
use serde_json::Value;

use super::schemas::StyleSchemas;
use crate::ai::prompt::PromptBuilder;
use crate::constants::consultation::RECOMMENDATION_COUNT;
use crate::types::{Gender, UserMeasurements};

const FEMALE_SHAPES: &str = "Pear, Hourglass, Rectangle, Apple, Inverted Triangle";
const MALE_SHAPES: &str = "Trapezoid, Rectangle, Oval, Triangle";

/// Prompt and output schema for one consultation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub prompt: String,
    pub output_schema: Value,
}

/// Build the request for a profile
pub fn build_request(measurements: &UserMeasurements) -> AnalysisRequest {
    AnalysisRequest {
        prompt: build_prompt(measurements),
        output_schema: StyleSchemas::analysis_schema(),
    }
}

fn shape_vocabulary(gender: Gender) -> String {
    match gender {
        Gender::Female => format!("{} for women", FEMALE_SHAPES),
        Gender::Male => format!("{} for men", MALE_SHAPES),
        Gender::Other => format!("{} for women; {} for men", FEMALE_SHAPES, MALE_SHAPES),
    }
}

fn build_prompt(m: &UserMeasurements) -> String {
    PromptBuilder::new()
        .role("fashion stylist", "body-shape analysis")
        .text("Analyze the user based on these metrics:")
        .context_item("Name", &m.name)
        .context_item("Gender", m.gender)
        .context_item("Height", format!("{}cm", m.height))
        .context_item("Weight", format!("{}kg", m.weight))
        .context_item("Chest", format!("{}cm", m.chest))
        .context_item("Waist", format!("{}cm", m.waist))
        .context_item("Hips", format!("{}cm", m.hip))
        .context_item("Skin Tone", m.skin_tone)
        .objectives([
            format!(
                "Determine their body shape (e.g., {}).",
                shape_vocabulary(m.gender)
            ),
            "Provide a brief styling advice summary customized to their gender, body shape, and skin tone.".to_string(),
            format!(
                "Suggest exactly {} specific clothing products (a Top, a Bottom, and one other item like a Dress, Shoes or an Accessory) that would flatter them.",
                RECOMMENDATION_COUNT
            ),
        ])
        .focus(
            "styling this user",
            vec![
                "Use only these categories: Top, Bottom, Dress, Shoes, Accessory",
                "Do NOT invent measurements that were not given",
            ],
        )
        .text("Return the response in strict JSON format.")
        .build()
}
