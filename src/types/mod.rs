//! Core Types
//!
//! Shared data contract between profile input, the analysis pipeline and rendering,
//! plus the crate-wide error types.

pub mod analysis;
pub mod error;
pub mod measurements;

pub use analysis::{
    AnalysisOutcome, AnalysisResult, DegradeReason, ProductCategory, ProductRecommendation,
};
pub use error::{
    AdapterError, ErrorCategory, ErrorClassifier, LlmError, Result, StyleError, ValidationError,
    ValidationErrorKind,
};
pub use measurements::{DraftProfile, Gender, SkinTone, UserMeasurements};
