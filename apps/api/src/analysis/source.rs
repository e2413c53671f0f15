//! Document sources: where job-posting text comes from.
//!
//! Scraping a particular job site is an implementation detail of a
//! `DocumentSource`. Whatever a source scrapes goes through
//! `clean_posting_text` so the engine only ever sees text that plausibly is a
//! job posting.

use once_cell::sync::Lazy;
use regex::Regex;

/// Cleaned postings shorter than this are rejected.
pub const MIN_POSTING_CHARS: usize = 50;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// At least one of these must appear for text to count as a posting.
static JOB_WORDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(responsibilities|requirements|qualifications|experience|skills|duties|role|position|job|work|team|company|candidate|applicant|looking for|seeking)\b",
    )
    .expect("valid regex")
});

/// Supplies job-posting text for one family of sites.
pub trait DocumentSource: Send + Sync {
    /// Raw posting text, or `None` when nothing usable was found.
    fn job_text(&self) -> Option<String>;
}

/// A source over text the caller already has, e.g. pasted by the user.
#[derive(Debug, Clone)]
pub struct PlainTextSource {
    text: String,
}

impl PlainTextSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl DocumentSource for PlainTextSource {
    fn job_text(&self) -> Option<String> {
        clean_posting_text(&self.text)
    }
}

/// Collapses whitespace runs to single spaces and trims. Returns `None` when
/// the result is shorter than `MIN_POSTING_CHARS` or mentions no job-related
/// vocabulary.
pub fn clean_posting_text(raw: &str) -> Option<String> {
    let text = WHITESPACE_RE.replace_all(raw, " ").trim().to_string();

    if text.chars().count() < MIN_POSTING_CHARS {
        return None;
    }
    if !JOB_WORDS_RE.is_match(&text) {
        return None;
    }
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSTING: &str = "Senior Rust Engineer\n\n  Responsibilities:\n\t- Build services\n\
        - Own the ingestion pipeline\n\nRequirements: 5+ years of experience";

    #[test]
    fn test_clean_posting_collapses_whitespace() {
        let text = clean_posting_text(POSTING).unwrap();
        assert!(text.starts_with("Senior Rust Engineer Responsibilities: - Build services"));
        assert!(!text.contains('\n'));
        assert!(!text.contains("  "));
    }

    #[test]
    fn test_clean_posting_rejects_short_text() {
        assert_eq!(clean_posting_text("Job: Rust dev"), None);
        assert_eq!(clean_posting_text("   \n\t "), None);
    }

    #[test]
    fn test_clean_posting_requires_job_vocabulary() {
        let recipe = "Preheat the oven to 200 degrees and roast the vegetables for forty minutes.";
        assert_eq!(clean_posting_text(recipe), None);
    }

    #[test]
    fn test_job_words_match_whole_words_only() {
        // "networking" and "teammate" must not count as "work" or "team"
        let text = "Networking teammates gathered at the conference hall for the annual dinner event.";
        assert_eq!(clean_posting_text(text), None);
    }

    #[test]
    fn test_plain_text_source_cleans_text() {
        let source = PlainTextSource::new(POSTING);
        let text = source.job_text().unwrap();
        assert!(text.contains("Requirements: 5+ years of experience"));

        assert!(PlainTextSource::new("too short").job_text().is_none());
    }
}
