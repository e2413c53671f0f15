//! Keyword Extractor: turns a document into a ranked `KeywordSet`.
//!
//! Algorithm:
//! 1. normalize() → ordered tokens
//! 2. at every position emit the token, the 2-token phrase and the 3-token phrase
//! 3. tally frequency per distinct candidate
//! 4. sort by frequency desc, truncate to the extraction limit
//! 5. stable re-sort: domain terms first, frequency desc within each group,
//!    first-seen order on ties
//!
//! Both sorts MUST be stable. Tie order is part of the output contract.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::{clean_text, contains_token_run, normalize};

/// Default number of candidates kept after ranking.
pub const EXTRACTION_LIMIT: usize = 50;

/// Longest phrase (in tokens) emitted as a candidate.
const MAX_PHRASE_TOKENS: usize = 3;

/// Built-in technical / skill vocabulary. Overridable via `DOMAIN_TERMS`.
pub const DEFAULT_DOMAIN_TERMS: &[&str] = &[
    // languages
    "javascript", "typescript", "python", "java", "golang", "rust", "ruby", "php", "kotlin",
    "swift", "scala", "sql", "nosql", "html", "css", "bash",
    // frameworks and APIs
    "react", "angular", "vue", "node.js", "nodejs", "express", "django", "flask", "spring",
    "rails", "graphql", "rest", "api", "apis", "microservices", "next.js",
    // cloud and devops
    "aws", "azure", "gcp", "cloud", "docker", "kubernetes", "terraform", "ansible", "jenkins",
    "ci-cd", "devops", "linux", "git", "github", "gitlab", "serverless", "lambda",
    // data and ML
    "machine learning", "deep learning", "data science", "analytics", "tensorflow", "pytorch",
    "pandas", "numpy", "spark", "hadoop", "kafka", "airflow", "tableau", "power bi",
    "snowflake", "postgresql", "mysql", "mongodb", "redis", "elasticsearch", "nlp", "llm",
];

/// A single keyword candidate: a token or a contiguous 2–3 token phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    /// Occurrences in the source document.
    pub frequency: u32,
    pub is_domain_term: bool,
}

/// Ranked candidates for one document, capped at the extraction limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet {
    candidates: Vec<Candidate>,
}

impl KeywordSet {
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidate texts in rank order.
    pub fn texts(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.text.as_str()).collect()
    }

    /// The `n` highest-ranked candidates.
    pub fn top(&self, n: usize) -> &[Candidate] {
        &self.candidates[..n.min(self.candidates.len())]
    }

    pub fn contains(&self, text: &str) -> bool {
        self.candidates.iter().any(|c| c.text == text)
    }
}

/// Curated technical vocabulary. A candidate is a domain term when any
/// configured term appears in it as a whole-token sequence.
#[derive(Debug, Clone)]
pub struct DomainVocabulary {
    /// Each term pre-split into normalized tokens.
    terms: Vec<Vec<String>>,
}

impl DomainVocabulary {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|term| {
                // Same shape as extracted tokens: "node.js" → ["node"]
                clean_text(term.as_ref())
                    .split_whitespace()
                    .filter(|t| t.len() > 2)
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|tokens| !tokens.is_empty())
            .collect();
        Self { terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_domain_term(&self, candidate: &str) -> bool {
        let tokens: Vec<&str> = candidate.split_whitespace().collect();
        self.terms
            .iter()
            .any(|term| contains_token_run(&tokens, term))
    }
}

impl Default for DomainVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAIN_TERMS)
    }
}

/// Extracts ranked keyword sets. Holds only immutable configuration, so one
/// instance can be shared freely across callers.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    vocabulary: DomainVocabulary,
    limit: usize,
}

impl KeywordExtractor {
    pub fn new(vocabulary: DomainVocabulary, limit: usize) -> Self {
        Self { vocabulary, limit }
    }

    pub fn vocabulary(&self) -> &DomainVocabulary {
        &self.vocabulary
    }

    pub fn extract(&self, text: &str) -> KeywordSet {
        let tokens = normalize(text);

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut candidates: Vec<Candidate> = Vec::new();

        for start in 0..tokens.len() {
            for width in 1..=MAX_PHRASE_TOKENS {
                let end = start + width;
                if end > tokens.len() {
                    break;
                }
                let phrase = tokens[start..end].join(" ");
                match index.get(&phrase) {
                    Some(&i) => candidates[i].frequency += 1,
                    None => {
                        index.insert(phrase.clone(), candidates.len());
                        candidates.push(Candidate {
                            text: phrase,
                            frequency: 1,
                            is_domain_term: false,
                        });
                    }
                }
            }
        }

        // Vec::sort_by is stable: equal counts keep first-seen order
        candidates.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        candidates.truncate(self.limit);

        for candidate in &mut candidates {
            candidate.is_domain_term = self.vocabulary.is_domain_term(&candidate.text);
        }
        candidates.sort_by_key(|c| !c.is_domain_term);

        KeywordSet { candidates }
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(DomainVocabulary::default(), EXTRACTION_LIMIT)
    }
}

static DEFAULT_EXTRACTOR: Lazy<KeywordExtractor> = Lazy::new(KeywordExtractor::default);

/// Extracts the top-50 keyword set using the built-in vocabulary.
pub fn extract_keywords(text: &str) -> KeywordSet {
    DEFAULT_EXTRACTOR.extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSTING: &str = r#"
        Senior Backend Engineer
        We need a Python engineer with Kafka and AWS experience.
        Responsibilities: design Python services, operate Kafka clusters,
        mentor engineers, write documentation.
    "#;

    #[test]
    fn test_extract_is_idempotent() {
        assert_eq!(extract_keywords(POSTING), extract_keywords(POSTING));
    }

    #[test]
    fn test_empty_text_yields_empty_set() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("the and of").is_empty());
    }

    #[test]
    fn test_emits_single_tokens_and_phrases() {
        let set = extract_keywords("Distributed systems engineering");
        assert_eq!(
            set.texts(),
            vec![
                "distributed",
                "distributed systems",
                "distributed systems engineering",
                "systems",
                "systems engineering",
                "engineering",
            ]
        );
    }

    #[test]
    fn test_phrases_span_removed_stop_words() {
        let set = extract_keywords("react and redux");
        assert!(set.contains("react redux"));
    }

    #[test]
    fn test_domain_terms_rank_before_non_domain_regardless_of_frequency() {
        let set = extract_keywords("meeting meeting meeting meeting docker");
        let first_non_domain = set
            .iter()
            .position(|c| !c.is_domain_term)
            .expect("non-domain candidates present");
        assert!(set.iter().skip(first_non_domain).all(|c| !c.is_domain_term));

        let docker = set.texts().iter().position(|t| *t == "docker").unwrap();
        let meeting = set.texts().iter().position(|t| *t == "meeting").unwrap();
        assert!(docker < meeting);
        assert_eq!(set.candidates()[meeting].frequency, 4);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let set = extract_keywords("kafka python kafka python");
        assert_eq!(
            set.texts(),
            vec![
                "kafka",
                "kafka python",
                "python",
                "kafka python kafka",
                "python kafka",
                "python kafka python",
            ]
        );
        assert_eq!(set.candidates()[0].frequency, 2);
        assert_eq!(set.candidates()[3].frequency, 1);
    }

    #[test]
    fn test_frequency_orders_within_group() {
        let set = extract_keywords("budget budget forecast budget");
        assert_eq!(set.candidates()[0].text, "budget");
        assert_eq!(set.candidates()[0].frequency, 3);
        assert!(set
            .candidates()
            .windows(2)
            .all(|w| w[0].frequency >= w[1].frequency));
    }

    #[test]
    fn test_truncates_to_limit() {
        let extractor = KeywordExtractor::new(DomainVocabulary::default(), 5);
        let set = extractor.extract(POSTING);
        assert_eq!(set.len(), 5);

        let full = extract_keywords(POSTING);
        assert!(full.len() <= EXTRACTION_LIMIT);
    }

    #[test]
    fn test_truncation_happens_before_domain_boost() {
        // "docker" is seen last with frequency 1, so the count cut drops it
        let extractor = KeywordExtractor::new(DomainVocabulary::default(), 2);
        let set = extractor.extract("budget budget review review docker");
        assert!(!set.contains("docker"));
    }

    #[test]
    fn test_custom_vocabulary() {
        let vocabulary = DomainVocabulary::new(["underwriting", "risk models"]);
        let extractor = KeywordExtractor::new(vocabulary, EXTRACTION_LIMIT);
        let set = extractor.extract("Team culture. Built risk models for underwriting.");
        assert!(set.candidates()[0].is_domain_term);
        assert!(set.iter().any(|c| c.text == "risk models" && c.is_domain_term));
        assert!(set.iter().any(|c| c.text == "culture" && !c.is_domain_term));
    }

    #[test]
    fn test_vocabulary_normalizes_terms() {
        let vocabulary = DomainVocabulary::new(["Node.js", "C++", "Machine Learning"]);
        // "c++" normalizes to nothing usable and is skipped
        assert_eq!(vocabulary.len(), 2);
        assert!(vocabulary.is_domain_term("node"));
        assert!(vocabulary.is_domain_term("applied machine learning"));
        assert!(!vocabulary.is_domain_term("machine shop"));
    }

    #[test]
    fn test_vocabulary_matches_whole_tokens_only() {
        let vocabulary = DomainVocabulary::default();
        assert!(vocabulary.is_domain_term("aws lambda"));
        assert!(!vocabulary.is_domain_term("restaurant"));
    }
}
