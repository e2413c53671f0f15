use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis::keywords::{DomainVocabulary, KeywordExtractor, DEFAULT_DOMAIN_TERMS, EXTRACTION_LIMIT};
use crate::analysis::matcher::{MatchMode, DISPLAY_WINDOW, SCORING_WINDOW};

/// Default time budget for one suggestion-service call.
pub const DEFAULT_SUGGESTION_TIMEOUT_SECS: u64 = 30;

/// Service configuration loaded from environment variables.
/// Every variable is optional; defaults match the engine constants.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub engine: EngineConfig,
}

/// Tunables for the keyword engine. Passed explicitly into every analysis.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Candidates kept per document after ranking.
    pub keyword_limit: usize,
    /// Top job keywords the score is computed over.
    pub scoring_window: usize,
    /// Max entries returned in each of the matched / missing lists.
    pub display_window: usize,
    pub match_mode: MatchMode,
    pub domain_terms: Vec<String>,
    pub suggestion_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            keyword_limit: EXTRACTION_LIMIT,
            scoring_window: SCORING_WINDOW,
            display_window: DISPLAY_WINDOW,
            match_mode: MatchMode::default(),
            domain_terms: DEFAULT_DOMAIN_TERMS.iter().map(|t| t.to_string()).collect(),
            suggestion_timeout: Duration::from_secs(DEFAULT_SUGGESTION_TIMEOUT_SECS),
        }
    }
}

impl EngineConfig {
    pub fn extractor(&self) -> KeywordExtractor {
        KeywordExtractor::new(
            DomainVocabulary::new(&self.domain_terms),
            self.keyword_limit,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = EngineConfig::default();
        let domain_terms = match std::env::var("DOMAIN_TERMS") {
            Ok(raw) => parse_term_list(&raw),
            Err(_) => defaults.domain_terms,
        };

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            engine: EngineConfig {
                keyword_limit: parse_env("KEYWORD_LIMIT", defaults.keyword_limit)?,
                scoring_window: parse_env("SCORING_WINDOW", defaults.scoring_window)?,
                display_window: parse_env("DISPLAY_WINDOW", defaults.display_window)?,
                match_mode: parse_env("MATCH_MODE", defaults.match_mode)?,
                domain_terms,
                suggestion_timeout: Duration::from_secs(parse_env(
                    "SUGGESTION_TIMEOUT_SECS",
                    DEFAULT_SUGGESTION_TIMEOUT_SECS,
                )?),
            },
        })
    }
}

/// Reads `key` and parses it, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

/// Splits a comma-separated term list, dropping blanks.
fn parse_term_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_defaults_match_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.keyword_limit, 50);
        assert_eq!(config.scoring_window, 30);
        assert_eq!(config.display_window, 20);
        assert_eq!(config.match_mode, MatchMode::Substring);
        assert_eq!(config.domain_terms.len(), DEFAULT_DOMAIN_TERMS.len());
    }

    #[test]
    fn test_parse_term_list_drops_blanks() {
        assert_eq!(
            parse_term_list(" rust, ,tokio ,axum,"),
            vec!["rust", "tokio", "axum"]
        );
    }

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: usize = parse_env("JOBFIT_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_parse_env_rejects_invalid_value() {
        std::env::set_var("JOBFIT_TEST_BAD_WINDOW", "thirty");
        let result: Result<usize> = parse_env("JOBFIT_TEST_BAD_WINDOW", 30);
        assert!(result.is_err());
        std::env::remove_var("JOBFIT_TEST_BAD_WINDOW");
    }

    #[test]
    fn test_custom_terms_flow_into_extractor() {
        let config = EngineConfig {
            domain_terms: vec!["underwriting".to_string()],
            ..EngineConfig::default()
        };
        let extractor = config.extractor();
        assert!(extractor.vocabulary().is_domain_term("underwriting"));
        assert!(!extractor.vocabulary().is_domain_term("python"));
    }
}
