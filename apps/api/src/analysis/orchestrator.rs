//! Analysis Orchestrator: sequences matching and suggestion generation into
//! one `AnalysisResult`, optionally delegating to a suggestion service.
//!
//! Flow: validate inputs → match_texts → generate_suggestions → (optional)
//!       suggestion service → merge or degrade → AnalysisResult.
//!
//! The local path never touches the network. Delegation failures come back as
//! `AnalysisError::SuggestionService`; `analyze_with_fallback` turns them into
//! the local result instead.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::analysis::error::AnalysisError;
use crate::analysis::matcher::{MatchResult, Matcher, ScoreBand};
use crate::analysis::prompts::{build_analysis_prompt, AnalysisKind};
use crate::analysis::suggestions::{generate_suggestions, Suggestion, TemplateChooser};
use crate::config::EngineConfig;
use crate::llm_client::{parse_json_lenient, submit_with_timeout, SuggestionService};

/// Recommendation attached to a degraded (unparseable) model response.
const DEGRADED_RECOMMENDATION: &str = "Please try the analysis again. \
    If the issue persists, check the suggestion service settings.";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Which path produced an `AnalysisResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    /// Deterministic local matcher and templates.
    Local,
    /// Suggestion service response, merged over the local result.
    Model,
    /// Suggestion service answered but the response could not be parsed.
    Degraded,
}

/// One finished analysis. Built once per call and never mutated afterwards;
/// persistence is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub match_result: MatchResult,
    pub band: ScoreBand,
    pub suggestions: Vec<Suggestion>,
    pub insights: Option<String>,
    pub recommendations: Option<String>,
    pub recommended_keywords: Vec<String>,
    pub ats_optimization: Option<String>,
    pub source: AnalysisSource,
    /// Set when a delegation failed and this is the local fallback.
    pub service_error: Option<String>,
    pub analyzed_at: DateTime<Utc>,
}

/// Per-call options. `service: None` keeps the analysis fully local.
#[derive(Clone, Copy, Default)]
pub struct AnalyzeOptions<'a> {
    pub kind: AnalysisKind,
    pub service: Option<&'a dyn SuggestionService>,
}

/// Fields pulled out of a model response. Every field is optional; absent,
/// null or oddly shaped fields fall back to the local result.
#[derive(Debug)]
struct ModelAnalysis {
    match_score: Option<f64>,
    matched_keywords: Vec<String>,
    missing_keywords: Vec<String>,
    recommended_keywords: Vec<String>,
    keyword_suggestions: Vec<String>,
    insights: Option<String>,
    recommendations: Option<String>,
    /// Kept as raw values so one malformed bullet doesn't sink the response.
    bullet_suggestions: Vec<Value>,
    ats_optimization: Option<String>,
}

impl ModelAnalysis {
    /// Reads each field independently. Returns `None` only when the response
    /// is not a JSON object at all.
    fn from_value(value: &Value) -> Option<Self> {
        static NULL: Value = Value::Null;
        let object = value.as_object()?;
        let field = |key: &str| object.get(key).unwrap_or(&NULL);

        Some(Self {
            match_score: number_field(field("matchScore")),
            matched_keywords: string_list(field("matchedKeywords")),
            missing_keywords: string_list(field("missingKeywords")),
            recommended_keywords: string_list(field("recommendedKeywords")),
            keyword_suggestions: string_list(field("keywordSuggestions")),
            insights: text_field(field("insights")),
            recommendations: text_field(field("recommendations")),
            bullet_suggestions: field("bulletSuggestions")
                .as_array()
                .cloned()
                .unwrap_or_default(),
            ats_optimization: text_field(field("atsOptimization")),
        })
    }
}

/// A number, or a numeric string such as `"85"` or `"85%"`.
fn number_field(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

/// An array of strings or numbers (other items are skipped), a
/// comma-separated string, or nothing.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) => s.split(',').map(|k| k.trim().to_string()).collect(),
        _ => Vec::new(),
    }
}

/// A string, or an array of strings joined with newlines. Blank text is `None`.
fn text_field(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ModelBullet {
    New { content: String },
    Modify { original: String, improved: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

/// Runs analyses with a fixed engine configuration. Holds no mutable state.
#[derive(Debug, Clone)]
pub struct Analyzer {
    matcher: Matcher,
    service_timeout: Duration,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Analyzer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            matcher: Matcher::from_config(config),
            service_timeout: config.suggestion_timeout,
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Deterministic local analysis. Fails only on blank input.
    pub fn analyze_local<C>(
        &self,
        resume_text: &str,
        job_text: &str,
        chooser: &mut C,
    ) -> Result<AnalysisResult, AnalysisError>
    where
        C: TemplateChooser + ?Sized,
    {
        validate_inputs(resume_text, job_text)?;
        Ok(self.run_local(resume_text, job_text, chooser))
    }

    /// Full analysis. With a service configured, its response is merged over
    /// the local result; a transport, auth or timeout failure is returned as
    /// `AnalysisError::SuggestionService`.
    pub async fn analyze(
        &self,
        resume_text: &str,
        job_text: &str,
        options: AnalyzeOptions<'_>,
        chooser: &mut (dyn TemplateChooser + Send),
    ) -> Result<AnalysisResult, AnalysisError> {
        validate_inputs(resume_text, job_text)?;

        info!(
            "Analyzing resume ({} chars) against posting ({} chars)",
            resume_text.len(),
            job_text.len()
        );
        let local = self.run_local(resume_text, job_text, chooser);

        let Some(service) = options.service else {
            info!("Local analysis complete: score={}", local.match_result.score);
            return Ok(local);
        };

        let prompt = build_analysis_prompt(options.kind, resume_text, job_text);
        let text = submit_with_timeout(service, &prompt, self.service_timeout).await?;
        let result = merge_model_response(local, &text);

        info!(
            "Model analysis complete: score={} source={:?}",
            result.match_result.score, result.source
        );
        Ok(result)
    }

    /// Like `analyze`, but a suggestion-service failure yields the local
    /// result with `service_error` set. Only `AnalysisError::Input` escapes.
    pub async fn analyze_with_fallback(
        &self,
        resume_text: &str,
        job_text: &str,
        options: AnalyzeOptions<'_>,
        chooser: &mut (dyn TemplateChooser + Send),
    ) -> Result<AnalysisResult, AnalysisError> {
        let outcome = self.analyze(resume_text, job_text, options, chooser).await;
        match outcome {
            Err(AnalysisError::SuggestionService(e)) => {
                warn!("Suggestion service failed, falling back to local analysis: {e}");
                let mut local = self.run_local(resume_text, job_text, chooser);
                local.service_error = Some(e.to_string());
                Ok(local)
            }
            other => other,
        }
    }

    fn run_local<C>(&self, resume_text: &str, job_text: &str, chooser: &mut C) -> AnalysisResult
    where
        C: TemplateChooser + ?Sized,
    {
        let match_result = self.matcher.match_texts(resume_text, job_text);
        let bullets: Vec<&str> = resume_text.lines().collect();
        let suggestions = generate_suggestions(
            bullets.as_slice(),
            match_result.missing_keywords.as_slice(),
            chooser,
        );

        AnalysisResult {
            band: match_result.band(),
            insights: Some(build_insights(&match_result)),
            recommendations: Some(build_recommendation(&match_result)),
            match_result,
            suggestions,
            recommended_keywords: Vec::new(),
            ats_optimization: None,
            source: AnalysisSource::Local,
            service_error: None,
            analyzed_at: Utc::now(),
        }
    }
}

fn validate_inputs(resume_text: &str, job_text: &str) -> Result<(), AnalysisError> {
    if resume_text.trim().is_empty() {
        return Err(AnalysisError::Input("resume text cannot be empty".to_string()));
    }
    if job_text.trim().is_empty() {
        return Err(AnalysisError::Input("job text cannot be empty".to_string()));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Model response handling
// ────────────────────────────────────────────────────────────────────────────

/// Merges a raw service response over `local`, or degrades when it is not
/// parseable JSON.
fn merge_model_response(local: AnalysisResult, text: &str) -> AnalysisResult {
    let value: Value = match parse_json_lenient(text) {
        Ok(value) => value,
        Err(e) => {
            warn!("Unparseable suggestion service response, degrading: {e}");
            return degraded_result(text);
        }
    };
    let Some(model) = ModelAnalysis::from_value(&value) else {
        warn!("Suggestion service response is not a JSON object, degrading");
        return degraded_result(text);
    };

    let score = model
        .match_score
        .filter(|s| s.is_finite())
        .map(|s| s.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(local.match_result.score);

    let keep_local_lists = model.matched_keywords.is_empty() && model.missing_keywords.is_empty();
    let (matched_keywords, missing_keywords, matched_count, scored_count) = if keep_local_lists {
        let local_match = &local.match_result;
        (
            local_match.matched_keywords.clone(),
            local_match.missing_keywords.clone(),
            local_match.matched_count,
            local_match.scored_count,
        )
    } else {
        let (matched, missing) = disjoint_keywords(model.matched_keywords, model.missing_keywords);
        let (matched_count, scored_count) = (matched.len(), matched.len() + missing.len());
        (matched, missing, matched_count, scored_count)
    };

    let model_bullets = map_model_bullets(&model.bullet_suggestions, &missing_keywords);
    let suggestions = if model_bullets.is_empty() {
        local.suggestions
    } else {
        model_bullets
    };

    let match_result = MatchResult {
        matched_keywords,
        missing_keywords,
        score,
        matched_count,
        scored_count,
    };

    AnalysisResult {
        band: match_result.band(),
        match_result,
        suggestions,
        insights: model.insights.or(local.insights),
        recommendations: model.recommendations.or(local.recommendations),
        recommended_keywords: dedup_case_insensitive(
            model
                .recommended_keywords
                .into_iter()
                .chain(model.keyword_suggestions),
        ),
        ats_optimization: model.ats_optimization,
        source: AnalysisSource::Model,
        service_error: None,
        analyzed_at: local.analyzed_at,
    }
}

/// Raw text carried in insights, everything else empty.
fn degraded_result(text: &str) -> AnalysisResult {
    let match_result = MatchResult::default();
    AnalysisResult {
        band: match_result.band(),
        match_result,
        suggestions: Vec::new(),
        insights: Some(format!(
            "Unable to parse AI response. Raw response: {}",
            text.trim()
        )),
        recommendations: Some(DEGRADED_RECOMMENDATION.to_string()),
        recommended_keywords: Vec::new(),
        ats_optimization: None,
        source: AnalysisSource::Degraded,
        service_error: None,
        analyzed_at: Utc::now(),
    }
}

/// Dedups both lists and drops any missing keyword that is also matched.
fn disjoint_keywords(matched: Vec<String>, missing: Vec<String>) -> (Vec<String>, Vec<String>) {
    let matched = dedup_case_insensitive(matched);
    let seen: HashSet<String> = matched.iter().map(|k| k.to_lowercase()).collect();
    let missing = dedup_case_insensitive(missing)
        .into_iter()
        .filter(|k| !seen.contains(&k.to_lowercase()))
        .collect();
    (matched, missing)
}

fn dedup_case_insensitive<I>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && seen.insert(k.to_lowercase()))
        .collect()
}

fn map_model_bullets(raw: &[Value], missing_keywords: &[String]) -> Vec<Suggestion> {
    raw.iter()
        .filter_map(|value| match serde_json::from_value::<ModelBullet>(value.clone()) {
            Ok(bullet) => Some(bullet),
            Err(e) => {
                warn!("Skipping malformed bullet suggestion: {e}");
                None
            }
        })
        .map(|bullet| match bullet {
            ModelBullet::New { content } => {
                let keyword = keyword_in(&content, missing_keywords);
                Suggestion::new_bullet(keyword, content)
            }
            ModelBullet::Modify { original, improved } => {
                let keyword = keyword_in(&improved, missing_keywords);
                Suggestion::modified_bullet(keyword, original, improved)
            }
        })
        .collect()
}

/// First missing keyword the text mentions, or an empty string.
fn keyword_in(text: &str, missing_keywords: &[String]) -> String {
    let lower = text.to_lowercase();
    missing_keywords
        .iter()
        .find(|k| lower.contains(&k.to_lowercase()))
        .cloned()
        .unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Local insight text
// ────────────────────────────────────────────────────────────────────────────

fn build_insights(result: &MatchResult) -> String {
    let headline = match result.band() {
        ScoreBand::Strong => format!("Strong keyword alignment ({}/100).", result.score),
        ScoreBand::Moderate => format!("Moderate keyword alignment ({}/100).", result.score),
        ScoreBand::Weak => format!("Weak keyword alignment ({}/100).", result.score),
    };

    let mut parts = vec![
        headline,
        format!(
            "Matched {} of {} top job keywords.",
            result.matched_count, result.scored_count
        ),
    ];
    if !result.matched_keywords.is_empty() {
        parts.push(format!("Strongest overlap: {}.", top_three(&result.matched_keywords)));
    }
    if !result.missing_keywords.is_empty() {
        parts.push(format!("Biggest gaps: {}.", top_three(&result.missing_keywords)));
    }
    parts.join(" ")
}

fn build_recommendation(result: &MatchResult) -> String {
    let score = result.score;
    let gaps = top_three(&result.missing_keywords);

    if result.missing_keywords.is_empty() {
        "Your resume already covers the posting's top keywords.".to_string()
    } else if score >= 70 {
        format!("Strong match. Mention {gaps} where you have real experience with them.")
    } else if score >= 50 {
        format!("Moderate match ({score}/100). Work these keywords into your bullets: {gaps}.")
    } else {
        format!(
            "Low match ({score}/100). Significant gaps: {gaps}. Consider tailoring your resume before applying."
        )
    }
}

fn top_three(keywords: &[String]) -> String {
    keywords
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

static DEFAULT_ANALYZER: Lazy<Analyzer> = Lazy::new(Analyzer::default);

/// Runs `Analyzer::analyze` with the default engine settings.
pub async fn analyze(
    resume_text: &str,
    job_text: &str,
    options: AnalyzeOptions<'_>,
    chooser: &mut (dyn TemplateChooser + Send),
) -> Result<AnalysisResult, AnalysisError> {
    DEFAULT_ANALYZER
        .analyze(resume_text, job_text, options, chooser)
        .await
}
