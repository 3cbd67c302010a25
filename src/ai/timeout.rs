//! Timeout helpers for provider calls.
//!
//! ```ignore
//! use crate::ai::timeout::with_timeout;
//!
//! let result = with_timeout(
//!     Duration::from_secs(60),
//!     async { /* LLM call */ },
//!     "style analysis"
//! ).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use crate::types::{Result, StyleError};

/// Execute an async operation with a timeout
///
/// Returns [`StyleError::Timeout`] if the operation doesn't complete in time.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(StyleError::timeout(operation_name, timeout)),
    }
}
