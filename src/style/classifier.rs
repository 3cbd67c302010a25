//! Rule-based body-shape pre-check.
//!
//! Deterministic and synchronous. The label is a diagnostic signal reported to
//! observers; it never reaches the prompt or the final result.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Gender, UserMeasurements};

/// Hip must exceed waist by more than this (cm) for the pear rule
const PEAR_HIP_WAIST_MARGIN: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleShape {
    PearFemale,
    MaleBodyType,
    Other,
}

impl RuleShape {
    pub const ALL: [RuleShape; 3] = [
        RuleShape::PearFemale,
        RuleShape::MaleBodyType,
        RuleShape::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RuleShape::PearFemale => "Pear Shape (Female)",
            RuleShape::MaleBodyType => "Male Body Type",
            RuleShape::Other => "Other",
        }
    }
}

impl fmt::Display for RuleShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a profile. Always returns a shape, `Other` when no rule matches.
pub fn classify(measurements: &UserMeasurements) -> RuleShape {
    match measurements.gender {
        Gender::Female
            if measurements.hip > measurements.waist + PEAR_HIP_WAIST_MARGIN
                && measurements.hip > measurements.chest =>
        {
            RuleShape::PearFemale
        }
        Gender::Female => RuleShape::Other,
        Gender::Male => RuleShape::MaleBodyType,
        Gender::Other => RuleShape::Other,
    }
}
