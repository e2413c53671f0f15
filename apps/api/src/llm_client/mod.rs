//! Suggestion service seam: the single point through which the engine talks
//! to an external language model.
//!
//! ARCHITECTURAL RULE: the engine never performs network I/O itself. A caller
//! that wants model-backed analysis supplies a `SuggestionService`
//! implementation; everything on this side of the trait is transport-agnostic.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

/// Keys shorter than this are rejected before any call is made.
const MIN_API_KEY_LEN: usize = 10;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("suggestion service timed out after {0:?}")]
    Timeout(Duration),

    #[error("suggestion service returned empty content")]
    EmptyContent,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An external language-model service: one prompt in, raw text out.
///
/// Implementations own transport, auth and model selection. Callers bound
/// every call with `submit_with_timeout`.
#[async_trait]
pub trait SuggestionService: Send + Sync {
    async fn submit(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Submits `prompt` and fails with `LlmError::Timeout` once `timeout` elapses.
/// The in-flight call is dropped (cancelled) on timeout. No retries.
pub async fn submit_with_timeout(
    service: &dyn SuggestionService,
    prompt: &str,
    timeout: Duration,
) -> Result<String, LlmError> {
    let text = match tokio::time::timeout(timeout, service.submit(prompt)).await {
        Ok(result) => result?,
        Err(_) => {
            warn!("Suggestion service exceeded {}ms", timeout.as_millis());
            return Err(LlmError::Timeout(timeout));
        }
    };

    if text.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }

    debug!("Suggestion service returned {} chars", text.len());
    Ok(text)
}

/// Trims an API key and rejects ones that cannot be valid: non-ASCII
/// characters are dropped and the remainder must be at least 10 chars.
pub fn sanitize_api_key(raw: &str) -> Result<String, LlmError> {
    let key: String = raw.trim().chars().filter(char::is_ascii).collect();
    if key.len() < MIN_API_KEY_LEN {
        return Err(LlmError::Auth(
            "API key is missing or too short".to_string(),
        ));
    }
    Ok(key)
}

/// Deserializes model output that should be JSON but may not be clean.
///
/// Recovery order:
/// 1. strip markdown code fences and stray backticks, parse
/// 2. parse the outermost `{ ... }` span of the raw text
///
/// Returns the first parse error if neither works.
pub fn parse_json_lenient<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let first_error = match serde_json::from_str(strip_json_fences(text)) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let Some(object) = extract_json_object(text) {
        if let Ok(value) = serde_json::from_str(object) {
            debug!("Recovered JSON object from surrounding text");
            return Ok(value);
        }
    }

    Err(LlmError::Parse(first_error))
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output, then any
/// leftover backticks at either end.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    };
    inner.trim_matches('`').trim()
}

/// The span from the first `{` to the last `}`, if any.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
