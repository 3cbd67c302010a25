//! AI Integration Layer
//!
//! Provides LLM integration for body-shape consultations.

pub mod prompt;
pub mod provider;
pub mod timeout;
pub mod validation;

pub use prompt::{PromptBuilder, PromptSection};
pub use provider::{
    Credentials, GeminiProvider, LlmProvider, LlmResponse, OpenAiProvider, ProviderConfig,
    ResponseMetadata, ResponseTiming, SharedProvider, TokenUsage, create_provider,
};
pub use timeout::with_timeout;
pub use validation::{ResponseValidator, ValidationPipeline, extract_json_from_response};
