//! Global Constants
//!
//! Centralized constants for configuration and tuning.

/// Network constants for provider calls
pub mod network {
    /// Default request timeout for a single analysis call (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// TCP connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 10;
}

/// Provider defaults
pub mod provider {
    pub const GEMINI: &str = "gemini";
    pub const OPENAI: &str = "openai";

    /// Supported provider names, in order of preference
    pub const SUPPORTED: [&str; 2] = [GEMINI, OPENAI];

    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.5-flash";

    pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
    pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

    pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
    pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

    /// Legacy variable consulted for Gemini when the configured one is unset
    pub const LEGACY_API_KEY_ENV: &str = "API_KEY";

    /// Environment variable holding a provider's API key unless configured otherwise
    pub fn default_api_key_env(provider: &str) -> &'static str {
        match provider {
            OPENAI => OPENAI_API_KEY_ENV,
            _ => GEMINI_API_KEY_ENV,
        }
    }
}

/// Consultation content constants
pub mod consultation {
    /// Number of products each analysis must recommend
    pub const RECOMMENDATION_COUNT: usize = 3;

    /// Body-shape label marking an offline (fallback) result
    pub const OFFLINE_BODY_SHAPE: &str = "Calculated (Offline)";

    pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a helpful, polite, and expert fashion consultant. Your goal is to make the user feel confident.";

    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;
}
