//! Profile measurement types.
//!
//! A [`DraftProfile`] is what a form collects; only a completed draft becomes a
//! [`UserMeasurements`], which is the sole input type the analysis pipeline accepts.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{ValidationError, ValidationErrorKind};

/// Message shown when a draft is submitted with missing fields
pub const INCOMPLETE_PROFILE_MESSAGE: &str =
    "Please fill in all fields to receive your consultation.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
            Gender::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(format!(
                "Unknown gender: {}. Valid values: male, female, other",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkinTone {
    Warm,
    Cool,
    Neutral,
}

impl fmt::Display for SkinTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkinTone::Warm => write!(f, "Warm"),
            SkinTone::Cool => write!(f, "Cool"),
            SkinTone::Neutral => write!(f, "Neutral"),
        }
    }
}

impl std::str::FromStr for SkinTone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warm" => Ok(SkinTone::Warm),
            "cool" => Ok(SkinTone::Cool),
            "neutral" => Ok(SkinTone::Neutral),
            _ => Err(format!(
                "Unknown skin tone: {}. Valid values: warm, cool, neutral",
                s
            )),
        }
    }
}

/// A fully populated profile.
///
/// Lengths are centimeters, weight is kilograms. Every numeric field is finite
/// and strictly positive when built through [`DraftProfile::complete`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMeasurements {
    pub name: String,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
    pub chest: f64,
    pub waist: f64,
    pub hip: f64,
    pub skin_tone: SkinTone,
}

/// Partially filled profile as collected by a form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DraftProfile {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hip: Option<f64>,
    pub skin_tone: Option<SkinTone>,
}

impl DraftProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of fields that are still empty, in form order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.as_deref().map(str::trim).unwrap_or("").is_empty() {
            missing.push("name");
        }
        if self.gender.is_none() {
            missing.push("gender");
        }
        for (field, value) in self.numeric_fields() {
            if value.is_none() {
                missing.push(field);
            }
        }
        if self.skin_tone.is_none() {
            missing.push("skinTone");
        }
        missing
    }

    /// Promote the draft into a complete profile
    pub fn complete(self) -> Result<UserMeasurements, ValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::new(
                ValidationErrorKind::MissingField,
                INCOMPLETE_PROFILE_MESSAGE,
            )
            .with_field(missing.join(", ")));
        }

        for (field, value) in self.numeric_fields() {
            if let Some(v) = value
                && !(v.is_finite() && v > 0.0)
            {
                return Err(ValidationError::new(
                    ValidationErrorKind::Range,
                    format!("must be a positive number, got {}", v),
                )
                .with_field(field));
            }
        }

        // Presence was checked above
        match self {
            DraftProfile {
                name: Some(name),
                gender: Some(gender),
                height: Some(height),
                weight: Some(weight),
                chest: Some(chest),
                waist: Some(waist),
                hip: Some(hip),
                skin_tone: Some(skin_tone),
            } => Ok(UserMeasurements {
                name: name.trim().to_string(),
                gender,
                height,
                weight,
                chest,
                waist,
                hip,
                skin_tone,
            }),
            _ => Err(ValidationError::new(
                ValidationErrorKind::MissingField,
                INCOMPLETE_PROFILE_MESSAGE,
            )),
        }
    }

    fn numeric_fields(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("height", self.height),
            ("weight", self.weight),
            ("chest", self.chest),
            ("waist", self.waist),
            ("hip", self.hip),
        ]
    }
}
