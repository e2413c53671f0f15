// Prompt templates for model-backed analysis.
// Reuses cross-cutting fragments from llm_client::prompts.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(resume_text|job_text)\}").expect("placeholder pattern is valid"));

/// How much the suggestion service is asked to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    /// Score, keywords, insights, recommendations, bullets and ATS tips.
    #[default]
    Comprehensive,
    /// Score, keywords and a short insight only.
    Quick,
    /// Focused on rewriting bullets for the posting.
    Optimization,
}

/// Full analysis. Replace `{resume_text}` and `{job_text}` before sending.
pub const COMPREHENSIVE_PROMPT_TEMPLATE: &str = r#"Analyze this resume against the job posting and provide detailed insights.

RESUME:
{resume_text}

JOB POSTING:
{job_text}

Return a JSON object with this schema:
{
  "matchScore": 85,
  "matchedKeywords": ["JavaScript", "React", "Node.js"],
  "missingKeywords": ["Python", "AWS", "Docker"],
  "recommendedKeywords": ["TypeScript", "GraphQL"],
  "insights": "Analysis of strengths and gaps",
  "recommendations": "Specific actionable recommendations",
  "bulletSuggestions": [
    {"type": "new", "content": "New bullet point that addresses missing keywords"},
    {"type": "modify", "original": "Existing bullet from the resume", "improved": "Enhanced version with relevant keywords"}
  ],
  "atsOptimization": "Tips for ATS optimization"
}

matchScore is an integer from 0 to 100."#;

/// Keyword-only pass. Replace `{resume_text}` and `{job_text}` before sending.
pub const QUICK_PROMPT_TEMPLATE: &str = r#"Quickly analyze this resume against the job posting for keyword matching.

RESUME:
{resume_text}

JOB POSTING:
{job_text}

Return JSON: {"matchScore": 75, "matchedKeywords": ["keyword1"], "missingKeywords": ["keyword2"], "insights": "brief analysis"}"#;

/// Rewrite-focused pass. Replace `{resume_text}` and `{job_text}` before sending.
pub const OPTIMIZATION_PROMPT_TEMPLATE: &str = r#"Help improve this resume for the specific job posting.

RESUME:
{resume_text}

JOB POSTING:
{job_text}

Return a JSON object with optimization suggestions:
{
  "matchScore": 70,
  "matchedKeywords": ["keyword1"],
  "missingKeywords": ["keyword2"],
  "recommendations": "specific improvements",
  "bulletSuggestions": [
    {"type": "new", "content": "New bullet point that addresses missing keywords"},
    {"type": "modify", "original": "Existing bullet from the resume", "improved": "Enhanced version with relevant keywords"}
  ],
  "keywordSuggestions": ["keyword1"]
}"#;

impl AnalysisKind {
    pub fn template(self) -> &'static str {
        match self {
            AnalysisKind::Comprehensive => COMPREHENSIVE_PROMPT_TEMPLATE,
            AnalysisKind::Quick => QUICK_PROMPT_TEMPLATE,
            AnalysisKind::Optimization => OPTIMIZATION_PROMPT_TEMPLATE,
        }
    }
}

/// Fills the template for `kind`. The system instruction is inlined because
/// the service contract takes a single prompt.
pub fn build_analysis_prompt(kind: AnalysisKind, resume_text: &str, job_text: &str) -> String {
    // One pass over the template: placeholders inside the documents stay literal
    let body = PLACEHOLDER_RE.replace_all(kind.template(), |caps: &Captures| match &caps[1] {
        "resume_text" => resume_text.trim(),
        _ => job_text.trim(),
    });

    match kind {
        AnalysisKind::Quick => format!("{JSON_ONLY_SYSTEM}\n\n{body}"),
        _ => format!("{JSON_ONLY_SYSTEM}\n{GROUNDING_INSTRUCTION}\n\n{body}"),
    }
}
