//! Style consultation domain
//!
//! ```text
//! UserMeasurements → classifier (diagnostic, to observers)
//!                  → request builder → adapter ─┬─ Ok  → AnalysisOutcome::Ai
//!                                               └─ Err → fallback → AnalysisOutcome::Fallback
//! ```

pub mod adapter;
pub mod classifier;
pub mod fallback;
pub mod metrics;
pub mod observer;
pub mod pipeline;
pub mod request;
pub mod schemas;

pub use adapter::{ModelReply, StyleAdapter};
pub use classifier::{RuleShape, classify};
pub use fallback::fallback;
pub use metrics::{AnalysisMetrics, MetricsSummary};
pub use observer::{AnalysisObserver, SharedObserver, TracingObserver};
pub use pipeline::{PipelineState, StylePipeline};
pub use request::{AnalysisRequest, build_request};
pub use schemas::StyleSchemas;
