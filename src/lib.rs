//! Stylewise - AI-Assisted Body-Shape Consultations
//!
//! Turns a set of body measurements into a body-shape label, styling advice
//! and three product recommendations, using a schema-constrained LLM call
//! with a deterministic offline fallback.
//!
//! ## Quick Start
//!
//! ```ignore
//! use stylewise::{ConfigLoader, DraftProfile, StylePipeline};
//!
//! let config = ConfigLoader::load()?;
//! let pipeline = StylePipeline::from_config(&config)?;
//! let profile = DraftProfile { /* form input */ ..Default::default() }.complete()?;
//!
//! let outcome = pipeline.analyze(&profile).await;
//! if outcome.is_degraded() {
//!     println!("AI stylist offline");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: LLM provider abstraction, prompts, response validation
//! - [`style`]: Classifier, request builder, adapter, fallback and pipeline
//! - [`types`]: Measurements, analysis results and errors
//! - [`config`]: Layered configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod style;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, LlmConfig};

// Error Types
pub use types::error::{AdapterError, ErrorCategory, LlmError, Result, StyleError};

// Data Model
pub use types::{
    AnalysisOutcome, AnalysisResult, DegradeReason, DraftProfile, Gender, ProductCategory,
    ProductRecommendation, SkinTone, UserMeasurements,
};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use style::{
    AnalysisMetrics, AnalysisObserver, PipelineState, RuleShape, StylePipeline, TracingObserver,
    build_request, classify, fallback,
};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{Credentials, LlmProvider, LlmResponse, ProviderConfig, SharedProvider, with_timeout};
