//! Axum route handlers for the Analysis API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::analysis::keywords::KeywordSet;
use crate::analysis::matcher::{MatchResult, ScoreBand};
use crate::analysis::orchestrator::{AnalysisResult, AnalyzeOptions};
use crate::analysis::prompts::AnalysisKind;
use crate::analysis::suggestions::{generate_suggestions, RandomChooser, Suggestion};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct KeywordsRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub keywords: KeywordSet,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    pub job_text: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    #[serde(flatten)]
    pub match_result: MatchResult,
    pub band: ScoreBand,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsRequest {
    pub resume_text: String,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_text: String,
    #[serde(default)]
    pub analysis_kind: AnalysisKind,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/keywords
///
/// Ranked keyword candidates for one document.
pub async fn handle_keywords(
    State(state): State<AppState>,
    Json(request): Json<KeywordsRequest>,
) -> Result<Json<KeywordsResponse>, AppError> {
    require_text("text", &request.text)?;

    let keywords = state.analyzer.matcher().extractor().extract(&request.text);

    Ok(Json(KeywordsResponse { keywords }))
}

/// POST /api/v1/match
///
/// Keyword comparison only: matched/missing lists, score and band.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    require_text("resume_text", &request.resume_text)?;
    require_text("job_text", &request.job_text)?;

    let match_result = state
        .analyzer
        .matcher()
        .match_texts(&request.resume_text, &request.job_text);

    Ok(Json(MatchResponse {
        band: match_result.band(),
        match_result,
    }))
}

/// POST /api/v1/suggestions
///
/// Template suggestions for keywords the caller already knows are missing.
pub async fn handle_suggestions(
    Json(request): Json<SuggestionsRequest>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    require_text("resume_text", &request.resume_text)?;

    let bullets: Vec<&str> = request.resume_text.lines().collect();
    let suggestions = generate_suggestions(
        bullets.as_slice(),
        request.missing_keywords.as_slice(),
        &mut RandomChooser::from_entropy(),
    );

    Ok(Json(SuggestionsResponse { suggestions }))
}

/// POST /api/v1/analyze
///
/// Full analysis. Uses the configured suggestion service when there is one and
/// falls back to the local result if it fails.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let options = AnalyzeOptions {
        kind: request.analysis_kind,
        service: state.suggestion_service.as_deref(),
    };
    let mut chooser = RandomChooser::from_entropy();

    let result = state
        .analyzer
        .analyze_with_fallback(&request.resume_text, &request.job_text, options, &mut chooser)
        .await?;

    Ok(Json(result))
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
