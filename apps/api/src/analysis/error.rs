use thiserror::Error;

use crate::llm_client::LlmError;

/// Errors an analysis can surface. Extraction, matching and suggestion
/// generation are total; only input validation and delegation can fail.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Blank resume or job text. The caller should prompt the user.
    #[error("Input error: {0}")]
    Input(String),

    /// Delegation to the suggestion service failed. Local analysis is still
    /// available through `Analyzer::analyze_local`.
    #[error("Suggestion service error: {0}")]
    SuggestionService(#[from] LlmError),
}

impl AnalysisError {
    pub fn is_input(&self) -> bool {
        matches!(self, AnalysisError::Input(_))
    }
}
