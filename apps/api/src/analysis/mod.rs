// Resume ↔ job-posting analysis engine.
// Implements: tokenizing, keyword extraction, matching, suggestion generation,
// and the orchestrator that ties them to an optional suggestion service.
// All model calls go through llm_client::SuggestionService, never a transport here.

pub mod error;
pub mod handlers;
pub mod keywords;
pub mod matcher;
pub mod orchestrator;
pub mod prompts;
pub mod source;
pub mod suggestions;
pub mod tokenizer;

pub use error::AnalysisError;
pub use keywords::{extract_keywords, Candidate, KeywordExtractor, KeywordSet};
pub use matcher::{match_texts, MatchMode, MatchResult, Matcher, ScoreBand};
pub use orchestrator::{analyze, AnalysisResult, AnalysisSource, AnalyzeOptions, Analyzer};
pub use prompts::AnalysisKind;
pub use suggestions::{generate_suggestions, Suggestion, TemplateChooser};
