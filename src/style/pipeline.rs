//! Style Analysis Pipeline
//!
//! Orchestrates one consultation:
//!
//! ```text
//! Idle → Running ─┬─ model reply validated ─→ Succeeded  (AnalysisOutcome::Ai)
//!                 └─ any adapter failure ────→ Degraded   (AnalysisOutcome::Fallback)
//! ```
//!
//! `analyze` always yields a renderable result. Failures are reported to the
//! observers and folded into the tagged outcome, never returned as errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::instrument;
use uuid::Uuid;

use super::adapter::StyleAdapter;
use super::classifier::classify;
use super::fallback::fallback;
use super::observer::{AnalysisObserver, SharedObserver, TracingObserver};
use super::request::build_request;
use crate::ai::provider::{Credentials, ProviderConfig, SharedProvider, create_provider};
use crate::config::Config;
use crate::types::{AdapterError, AnalysisOutcome, DegradeReason, Result, UserMeasurements};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    Idle,
    Running,
    Succeeded,
    Degraded,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Running => "running",
            PipelineState::Succeeded => "succeeded",
            PipelineState::Degraded => "degraded",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct StylePipeline {
    adapter: StyleAdapter,
    observers: Vec<SharedObserver>,
}

impl StylePipeline {
    /// Pipeline over an existing provider, logging through [`TracingObserver`]
    pub fn new(provider: SharedProvider, timeout: Duration) -> Self {
        Self {
            adapter: StyleAdapter::new(provider, timeout),
            observers: vec![Arc::new(TracingObserver) as SharedObserver],
        }
    }

    /// Build the configured provider with credentials resolved from config and environment
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::from_parts(
            &ProviderConfig::from_config(config),
            Credentials::resolve(&config.llm),
        )
    }

    pub fn from_parts(provider_config: &ProviderConfig, credentials: Credentials) -> Result<Self> {
        let provider = create_provider(provider_config, credentials)?;
        Ok(Self::new(provider, provider_config.timeout()))
    }

    /// Register an additional observer
    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observers.push(observer);
        self
    }

    /// Replace all observers, including the default tracing one
    pub fn with_observers(mut self, observers: Vec<SharedObserver>) -> Self {
        self.observers = observers;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.adapter.provider_name()
    }

    pub fn model(&self) -> &str {
        self.adapter.model()
    }

    fn notify(&self, event: impl Fn(&dyn AnalysisObserver)) {
        for observer in &self.observers {
            event(observer.as_ref());
        }
    }

    fn enter(&self, state: PipelineState) {
        self.notify(|o| o.on_state(state));
    }

    /// Run one consultation
    #[instrument(
        skip_all,
        fields(consultation_id = %Uuid::new_v4(), provider = self.adapter.provider_name())
    )]
    pub async fn analyze(&self, measurements: &UserMeasurements) -> AnalysisOutcome {
        let start = Instant::now();
        self.enter(PipelineState::Idle);
        self.enter(PipelineState::Running);

        let shape = classify(measurements);
        self.notify(|o| o.on_rule_shape(shape));

        let request = build_request(measurements);

        let outcome = match self.adapter.call_model(&request).await {
            Ok(reply) => {
                self.notify(|o| o.on_usage(&reply.usage));
                self.enter(PipelineState::Succeeded);
                AnalysisOutcome::Ai { data: reply.result }
            }
            Err(err) => {
                self.notify(|o| o.on_degraded(&err));
                self.enter(PipelineState::Degraded);
                let reason = match err {
                    AdapterError::Configuration(_) => DegradeReason::Configuration,
                    AdapterError::Upstream(_) => DegradeReason::Upstream,
                };
                AnalysisOutcome::Fallback {
                    data: fallback(),
                    reason,
                }
            }
        };

        let elapsed = start.elapsed();
        self.notify(|o| o.on_completed(&outcome, elapsed));
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::{LlmProvider, LlmResponse};
    use crate::style::classifier::RuleShape;
    use crate::style::metrics::AnalysisMetrics;
    use crate::types::{ErrorCategory, Gender, SkinTone, StyleError};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    enum Behavior {
        Valid,
        Malformed,
        NetworkDown,
        WrongCount,
    }

    struct MockProvider {
        behavior: Behavior,
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        async fn generate(&self, _prompt: &str, _schema: &Value) -> crate::types::Result<LlmResponse> {
            let item = |id: &str, category: &str| {
                json!({"id": id, "name": "Item", "description": "Nice.", "category": category, "buyUrl": "#"})
            };
            match self.behavior {
                Behavior::Valid => Ok(LlmResponse::content_only(json!({
                    "bodyShape": "Hourglass",
                    "advice": "Celebrate your waist.",
                    "recommendations": [item("x", "Top"), item("y", "Bottom"), item("z", "Dress")]
                }))),
                Behavior::WrongCount => Ok(LlmResponse::content_only(json!({
                    "bodyShape": "Hourglass",
                    "advice": "Celebrate your waist.",
                    "recommendations": [item("x", "Top"), item("y", "Bottom")]
                }))),
                Behavior::Malformed => Err(StyleError::llm_with_category(
                    ErrorCategory::ParseError,
                    "Failed to parse JSON from model response",
                )),
                Behavior::NetworkDown => Err(StyleError::LlmApi(
                    "mock request failed: connection refused".to_string(),
                )),
            }
        }

        fn name(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-model"
        }
    }

    fn pipeline(behavior: Behavior) -> StylePipeline {
        StylePipeline::new(
            Arc::new(MockProvider { behavior }),
            Duration::from_secs(1),
        )
    }

    fn profile() -> UserMeasurements {
        UserMeasurements {
            name: "Grace".to_string(),
            gender: Gender::Female,
            height: 170.0,
            weight: 62.0,
            chest: 90.0,
            waist: 80.0,
            hip: 100.0,
            skin_tone: SkinTone::Warm,
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl AnalysisObserver for Recorder {
        fn on_rule_shape(&self, shape: RuleShape) {
            self.events.lock().unwrap().push(format!("shape:{}", shape));
        }

        fn on_state(&self, state: PipelineState) {
            self.events.lock().unwrap().push(format!("state:{}", state));
        }

        fn on_degraded(&self, _error: &AdapterError) {
            self.events.lock().unwrap().push("degraded".to_string());
        }
    }

    #[tokio::test]
    async fn test_ai_result_passes_through() {
        let outcome = pipeline(Behavior::Valid).analyze(&profile()).await;
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.result().body_shape, "Hourglass");
    }

    #[tokio::test]
    async fn test_upstream_failures_fall_back() {
        for behavior in [Behavior::Malformed, Behavior::NetworkDown, Behavior::WrongCount] {
            let outcome = pipeline(behavior).analyze(&profile()).await;
            assert_eq!(outcome.reason(), Some(DegradeReason::Upstream));
            assert_eq!(outcome.into_result(), fallback());
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_fall_back() {
        let config = ProviderConfig {
            api_base: Some("http://127.0.0.1:1".to_string()),
            ..ProviderConfig::default()
        };
        let pipeline =
            StylePipeline::from_parts(&config, Credentials::missing("GEMINI_API_KEY")).unwrap();

        let outcome = pipeline.analyze(&profile()).await;
        assert_eq!(outcome.reason(), Some(DegradeReason::Configuration));

        let result = outcome.into_result();
        assert_eq!(result.body_shape, "Calculated (Offline)");
        let ids: Vec<_> = result.recommendations.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, ["1", "2", "3"]);

        let upstream = pipeline_result(Behavior::NetworkDown).await;
        assert_eq!(result, upstream);
    }

    async fn pipeline_result(behavior: Behavior) -> crate::types::AnalysisResult {
        pipeline(behavior).analyze(&profile()).await.into_result()
    }

    #[tokio::test]
    async fn test_observer_sees_lifecycle() {
        let recorder = Arc::new(Recorder::default());
        let pipeline = pipeline(Behavior::Malformed).with_observers(vec![recorder.clone() as SharedObserver]);

        pipeline.analyze(&profile()).await;

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(
            events,
            [
                "state:idle",
                "state:running",
                "shape:Pear Shape (Female)",
                "degraded",
                "state:degraded"
            ]
        );
    }

    #[tokio::test]
    async fn test_rule_shape_does_not_leak_into_result() {
        let outcome = pipeline(Behavior::Valid).analyze(&profile()).await;
        assert_ne!(outcome.result().body_shape, "Pear Shape (Female)");
    }

    #[tokio::test]
    async fn test_metrics_observer() {
        let metrics = Arc::new(AnalysisMetrics::new());
        let ok = pipeline(Behavior::Valid).with_observer(metrics.clone());
        let bad = pipeline(Behavior::NetworkDown).with_observer(metrics.clone());

        ok.analyze(&profile()).await;
        bad.analyze(&profile()).await;

        let summary = metrics.summary();
        assert_eq!(summary.analyses, 2);
        assert_eq!(summary.ai_results, 1);
        assert_eq!(summary.upstream_fallbacks, 1);
    }

    fn gender() -> impl Strategy<Value = Gender> {
        prop_oneof![Just(Gender::Male), Just(Gender::Female), Just(Gender::Other)]
    }

    fn skin_tone() -> impl Strategy<Value = SkinTone> {
        prop_oneof![
            Just(SkinTone::Warm),
            Just(SkinTone::Cool),
            Just(SkinTone::Neutral)
        ]
    }

    prop_compose! {
        fn measurements()(
            name in "[A-Za-z][A-Za-z ]{0,15}",
            gender in gender(),
            height in 50.0f64..250.0,
            weight in 20.0f64..250.0,
            chest in 40.0f64..200.0,
            waist in 40.0f64..200.0,
            hip in 40.0f64..200.0,
            skin_tone in skin_tone(),
        ) -> UserMeasurements {
            UserMeasurements { name, gender, height, weight, chest, waist, hip, skin_tone }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_always_three_recommendations(m in measurements(), mode in 0u8..4) {
            let behavior = match mode {
                0 => Behavior::Valid,
                1 => Behavior::Malformed,
                2 => Behavior::NetworkDown,
                _ => Behavior::WrongCount,
            };
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            let outcome = rt.block_on(pipeline(behavior).analyze(&m));
            prop_assert_eq!(outcome.result().recommendations.len(), 3);
            prop_assert_eq!(outcome.is_degraded(), mode != 0);
        }
    }
}
