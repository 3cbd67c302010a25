//! Pipeline observers.
//!
//! Observers receive the rule-based label and lifecycle events of each
//! consultation. They are the only consumers of the rule-based label.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::classifier::RuleShape;
use super::pipeline::PipelineState;
use crate::ai::provider::TokenUsage;
use crate::types::{AdapterError, AnalysisOutcome};

/// Hooks invoked by [`StylePipeline`](super::StylePipeline). All methods default to no-ops.
pub trait AnalysisObserver: Send + Sync {
    fn on_rule_shape(&self, _shape: RuleShape) {}

    fn on_state(&self, _state: PipelineState) {}

    fn on_usage(&self, _usage: &TokenUsage) {}

    fn on_degraded(&self, _error: &AdapterError) {}

    fn on_completed(&self, _outcome: &AnalysisOutcome, _elapsed: Duration) {}
}

pub type SharedObserver = Arc<dyn AnalysisObserver>;

/// Default observer: writes events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl AnalysisObserver for TracingObserver {
    fn on_rule_shape(&self, shape: RuleShape) {
        info!(rule_shape = %shape, "Rule-based pre-check");
    }

    fn on_state(&self, state: PipelineState) {
        debug!(state = %state, "Pipeline state changed");
    }

    fn on_usage(&self, usage: &TokenUsage) {
        debug!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Model usage"
        );
    }

    fn on_degraded(&self, error: &AdapterError) {
        warn!("AI stylist unavailable, using offline result: {}", error);
    }

    fn on_completed(&self, outcome: &AnalysisOutcome, elapsed: Duration) {
        info!(
            degraded = outcome.is_degraded(),
            body_shape = %outcome.result().body_shape,
            elapsed_ms = elapsed.as_millis() as u64,
            "Consultation complete"
        );
    }
}
