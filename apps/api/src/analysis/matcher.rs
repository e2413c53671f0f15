//! Matcher: compares a resume against a job posting by keyword overlap.
//!
//! A job keyword counts as matched when:
//! - the lowercased resume text contains it, OR
//! - some resume candidate contains it, or is contained by it.
//!
//! The bidirectional rule tolerates phrase-boundary mismatches ("aws" vs
//! "aws lambda") at the cost of false positives on short keywords.
//! `MatchMode::WordBoundary` tightens every containment check to whole words.

use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::keywords::{KeywordExtractor, KeywordSet};
use crate::analysis::tokenizer::contains_token_run;
use crate::config::EngineConfig;

/// Top job keywords the score is computed over.
pub const SCORING_WINDOW: usize = 30;
/// Max entries returned in each of the matched / missing lists.
pub const DISPLAY_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Plain case-insensitive substring containment.
    #[default]
    Substring,
    /// Containment only at word boundaries ("java" no longer matches "javascript").
    WordBoundary,
}

#[derive(Debug, Error)]
#[error("unknown match mode '{0}' (expected 'substring' or 'word_boundary')")]
pub struct ParseMatchModeError(String);

impl FromStr for MatchMode {
    type Err = ParseMatchModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(MatchMode::Substring),
            "word_boundary" | "word-boundary" => Ok(MatchMode::WordBoundary),
            other => Err(ParseMatchModeError(other.to_string())),
        }
    }
}

/// Qualitative band for a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Strong,   // ≥ 70
    Moderate, // 50 – 69
    Weak,     // < 50
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        if score >= 70 {
            ScoreBand::Strong
        } else if score >= 50 {
            ScoreBand::Moderate
        } else {
            ScoreBand::Weak
        }
    }
}

/// Outcome of comparing one resume with one job posting.
///
/// `matched_keywords` and `missing_keywords` never share an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    /// 0 – 100
    pub score: u8,
    /// Matched job keywords within the scoring window, before display truncation.
    #[serde(default)]
    pub matched_count: usize,
    /// Job keywords the score was computed over.
    #[serde(default)]
    pub scored_count: usize,
}

impl MatchResult {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }
}

#[derive(Debug, Clone)]
pub struct Matcher {
    extractor: KeywordExtractor,
    scoring_window: usize,
    display_window: usize,
    mode: MatchMode,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Matcher {
    pub fn new(
        extractor: KeywordExtractor,
        scoring_window: usize,
        display_window: usize,
        mode: MatchMode,
    ) -> Self {
        Self {
            extractor,
            scoring_window,
            display_window,
            mode,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.extractor(),
            config.scoring_window,
            config.display_window,
            config.match_mode,
        )
    }

    pub fn extractor(&self) -> &KeywordExtractor {
        &self.extractor
    }

    /// Extracts both keyword sets and compares them.
    pub fn match_texts(&self, resume_text: &str, job_text: &str) -> MatchResult {
        let resume_keywords = self.extractor.extract(resume_text);
        let job_keywords = self.extractor.extract(job_text);
        self.match_keyword_sets(resume_text, &resume_keywords, &job_keywords)
    }

    /// Compares pre-extracted keyword sets. `resume_text` is the full resume,
    /// searched directly in addition to its keyword set.
    pub fn match_keyword_sets(
        &self,
        resume_text: &str,
        resume_keywords: &KeywordSet,
        job_keywords: &KeywordSet,
    ) -> MatchResult {
        let resume_lower = resume_text.to_lowercase();
        let scored = job_keywords.top(self.scoring_window);

        let mut matched_keywords = Vec::new();
        let mut missing_keywords = Vec::new();

        for candidate in scored {
            if self.is_matched(&candidate.text, &resume_lower, resume_keywords) {
                matched_keywords.push(candidate.text.clone());
            } else {
                missing_keywords.push(candidate.text.clone());
            }
        }

        let matched_count = matched_keywords.len();
        let score = compute_score(matched_count, scored.len());

        matched_keywords.truncate(self.display_window);
        missing_keywords.truncate(self.display_window);

        MatchResult {
            matched_keywords,
            missing_keywords,
            score,
            matched_count,
            scored_count: scored.len(),
        }
    }

    fn is_matched(&self, keyword: &str, resume_lower: &str, resume_keywords: &KeywordSet) -> bool {
        match self.mode {
            MatchMode::Substring => {
                resume_lower.contains(keyword)
                    || resume_keywords
                        .iter()
                        .any(|c| c.text.contains(keyword) || keyword.contains(c.text.as_str()))
            }
            MatchMode::WordBoundary => {
                let keyword_tokens: Vec<&str> = keyword.split_whitespace().collect();
                contains_word(resume_lower, keyword)
                    || resume_keywords.iter().any(|c| {
                        let tokens: Vec<&str> = c.text.split_whitespace().collect();
                        contains_token_run(&tokens, &keyword_tokens)
                            || contains_token_run(&keyword_tokens, &tokens)
                    })
            }
        }
    }
}

/// `round(100 * matched / window)`, clamped to 0–100. An empty window scores 0.
fn compute_score(matched: usize, window: usize) -> u8 {
    if window == 0 {
        return 0;
    }
    let ratio = matched as f64 / window as f64;
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Substring search that only accepts hits flanked by non-alphanumerics.
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, hit)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + hit.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

static DEFAULT_MATCHER: Lazy<Matcher> = Lazy::new(Matcher::default);

/// Compares `resume_text` against `job_text` with the default engine settings.
pub fn match_texts(resume_text: &str, job_text: &str) -> MatchResult {
    DEFAULT_MATCHER.match_texts(resume_text, job_text)
}
