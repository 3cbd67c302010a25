//! Consultation Metrics
//!
//! Thread-safe counters fed through the observer hooks.
//!
//! ```ignore
//! let metrics = Arc::new(AnalysisMetrics::new());
//! let pipeline = StylePipeline::new(provider, timeout).with_observer(metrics.clone());
//! pipeline.analyze(&profile).await;
//! println!("{}", metrics.summary().display());
//! ```

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use super::classifier::RuleShape;
use super::observer::AnalysisObserver;
use crate::ai::provider::TokenUsage;
use crate::types::{AnalysisOutcome, DegradeReason};

/// Aggregated consultation counters
#[derive(Debug, Default)]
pub struct AnalysisMetrics {
    analyses: AtomicU32,
    ai_results: AtomicU32,
    configuration_fallbacks: AtomicU32,
    upstream_fallbacks: AtomicU32,
    pear_shapes: AtomicU32,
    male_shapes: AtomicU32,
    other_shapes: AtomicU32,
    input_tokens: AtomicU64,
    output_tokens: AtomicU64,
    total_latency_ms: AtomicU64,
}

/// Point-in-time copy of [`AnalysisMetrics`]
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    pub analyses: u32,
    pub ai_results: u32,
    pub configuration_fallbacks: u32,
    pub upstream_fallbacks: u32,
    /// Rule-based label counts, in [`RuleShape::ALL`] order
    pub rule_shapes: Vec<(RuleShape, u32)>,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub avg_latency_ms: f64,
}

impl AnalysisMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn shape_counter(&self, shape: RuleShape) -> &AtomicU32 {
        match shape {
            RuleShape::PearFemale => &self.pear_shapes,
            RuleShape::MaleBodyType => &self.male_shapes,
            RuleShape::Other => &self.other_shapes,
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        let analyses = self.analyses.load(Ordering::Relaxed);
        let total_latency = self.total_latency_ms.load(Ordering::Relaxed);

        let avg_latency_ms = if analyses > 0 {
            total_latency as f64 / analyses as f64
        } else {
            0.0
        };

        MetricsSummary {
            analyses,
            ai_results: self.ai_results.load(Ordering::Relaxed),
            configuration_fallbacks: self.configuration_fallbacks.load(Ordering::Relaxed),
            upstream_fallbacks: self.upstream_fallbacks.load(Ordering::Relaxed),
            rule_shapes: RuleShape::ALL
                .iter()
                .map(|s| (*s, self.shape_counter(*s).load(Ordering::Relaxed)))
                .collect(),
            input_tokens: self.input_tokens.load(Ordering::Relaxed),
            output_tokens: self.output_tokens.load(Ordering::Relaxed),
            avg_latency_ms,
        }
    }
}

impl AnalysisObserver for AnalysisMetrics {
    fn on_rule_shape(&self, shape: RuleShape) {
        self.shape_counter(shape).fetch_add(1, Ordering::Relaxed);
    }

    fn on_usage(&self, usage: &TokenUsage) {
        self.input_tokens
            .fetch_add(usage.input_tokens as u64, Ordering::Relaxed);
        self.output_tokens
            .fetch_add(usage.output_tokens as u64, Ordering::Relaxed);
    }

    fn on_completed(&self, outcome: &AnalysisOutcome, elapsed: Duration) {
        self.analyses.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);

        let counter = match outcome.reason() {
            None => &self.ai_results,
            Some(DegradeReason::Configuration) => &self.configuration_fallbacks,
            Some(DegradeReason::Upstream) => &self.upstream_fallbacks,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl MetricsSummary {
    pub fn fallbacks(&self) -> u32 {
        self.configuration_fallbacks + self.upstream_fallbacks
    }

    /// Format summary for display
    pub fn display(&self) -> String {
        let shapes = self
            .rule_shapes
            .iter()
            .map(|(shape, count)| format!("{}: {}", shape, count))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Consultations: {}\n\
             AI Results: {}\n\
             Offline Results: {} (configuration: {}, upstream: {})\n\
             Rule Shapes: {}\n\
             Tokens: {} (input: {}, output: {})\n\
             Avg Latency: {:.0}ms",
            self.analyses,
            self.ai_results,
            self.fallbacks(),
            self.configuration_fallbacks,
            self.upstream_fallbacks,
            shapes,
            self.input_tokens + self.output_tokens,
            self.input_tokens,
            self.output_tokens,
            self.avg_latency_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::fallback::fallback;
    use std::sync::Arc;

    #[test]
    fn test_counts_by_outcome() {
        let metrics = AnalysisMetrics::new();
        let ai = AnalysisOutcome::Ai { data: fallback() };
        let offline = AnalysisOutcome::Fallback {
            data: fallback(),
            reason: DegradeReason::Configuration,
        };

        metrics.on_completed(&ai, Duration::from_millis(300));
        metrics.on_completed(&offline, Duration::from_millis(100));
        metrics.on_rule_shape(RuleShape::MaleBodyType);
        metrics.on_usage(&TokenUsage::new(120, 80));

        let summary = metrics.summary();
        assert_eq!(summary.analyses, 2);
        assert_eq!(summary.ai_results, 1);
        assert_eq!(summary.configuration_fallbacks, 1);
        assert_eq!(summary.fallbacks(), 1);
        assert_eq!(summary.rule_shapes[1], (RuleShape::MaleBodyType, 1));
        assert!((summary.avg_latency_ms - 200.0).abs() < f64::EPSILON);
        assert!(summary.display().contains("Tokens: 200"));
    }

    #[test]
    fn test_concurrent_recording() {
        use std::thread;

        let metrics = Arc::new(AnalysisMetrics::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let m = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..50 {
                        m.on_rule_shape(RuleShape::Other);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.summary().rule_shapes[2], (RuleShape::Other, 400));
    }
}
