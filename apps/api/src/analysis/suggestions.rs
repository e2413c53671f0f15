//! Suggestion Generator: bullet ideas for keywords the resume is missing.
//!
//! Two kinds of output:
//! - `NewBullet`: a fresh bullet built from a category template per missing keyword
//! - `ModifiedBullet`: an existing resume bullet with a missing keyword spliced in
//!
//! Category classification is deterministic. Template choice goes through a
//! `TemplateChooser` so callers decide between randomness and a fixed pick.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Label attached to every new-bullet suggestion.
pub const NEW_BULLET_IMPROVEMENT: &str = "+12% to +15%";
/// Label attached to every modified-bullet suggestion.
pub const MODIFIED_BULLET_IMPROVEMENT: &str = "+8% to +10%";

/// Leading missing keywords that get a new bullet.
const MAX_NEW_BULLETS: usize = 8;
/// Resume bullets considered for keyword insertion.
const MAX_MODIFIED_BULLETS: usize = 5;
/// Missing keywords eligible for insertion into existing bullets.
const INSERTION_KEYWORDS: usize = 3;
/// Bullets must be longer than this (in chars) to be rewritten.
const MIN_BULLET_CHARS: usize = 20;

const BULLET_MARKERS: &[char] = &['•', '·', '▪', '‣', '-', '*', '–'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Suggestion {
    NewBullet {
        keyword: String,
        text: String,
        estimated_improvement: String,
    },
    ModifiedBullet {
        keyword: String,
        original: String,
        improved: String,
        estimated_improvement: String,
    },
}

impl Suggestion {
    pub fn keyword(&self) -> &str {
        match self {
            Suggestion::NewBullet { keyword, .. } | Suggestion::ModifiedBullet { keyword, .. } => {
                keyword
            }
        }
    }

    pub fn new_bullet(keyword: impl Into<String>, text: impl Into<String>) -> Self {
        Suggestion::NewBullet {
            keyword: keyword.into(),
            text: text.into(),
            estimated_improvement: NEW_BULLET_IMPROVEMENT.to_string(),
        }
    }

    pub fn modified_bullet(
        keyword: impl Into<String>,
        original: impl Into<String>,
        improved: impl Into<String>,
    ) -> Self {
        Suggestion::ModifiedBullet {
            keyword: keyword.into(),
            original: original.into(),
            improved: improved.into(),
            estimated_improvement: MODIFIED_BULLET_IMPROVEMENT.to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Keyword categories
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCategory {
    Technical,
    Management,
    Analytical,
    General,
}

static TECHNICAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(javascript|typescript|python|java|golang|rust|ruby|php|kotlin|swift|scala|sql|nosql|html|css|react|angular|vue|node|nodejs|django|flask|spring|rails|graphql|rest|apis?|microservices?|aws|azure|gcp|cloud|docker|kubernetes|terraform|ansible|jenkins|ci-cd|devops|linux|git|github|gitlab|serverless|lambda|software|programming|backend|frontend|full-stack|database|infrastructure)\b",
    )
    .expect("technical category pattern is valid")
});

static MANAGEMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(lead|leads|leading|leadership|led|manage|managed|management|manager|managing|agile|scrum|kanban|stakeholders?|team|teams|mentor\w*|projects?|program|strategy|strategic|planning|roadmaps?|coordinat\w*|process|processes|budget\w*|hiring|cross-functional)\b",
    )
    .expect("management category pattern is valid")
});

static ANALYTICAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(data|analytics?|analysis|analy[sz]\w*|reporting|reports?|metrics|kpis?|insights?|statistics|statistical|dashboards?|excel|tableau|forecast\w*|research|modeling|modelling|visualization)\b",
    )
    .expect("analytical category pattern is valid")
});

static USING_WITH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(using|with)\b").expect("clause pattern is valid"));

static BUILD_VERB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(developed|created|built)\b").expect("verb pattern is valid")
});

const TECHNICAL_TEMPLATES: [&str; 4] = [
    "Developed and deployed {keyword} solutions that improved system performance and reliability",
    "Implemented {keyword} to streamline development workflows and shorten delivery cycles",
    "Built scalable applications with {keyword}, supporting production workloads for thousands of users",
    "Integrated {keyword} into the existing technology stack to modernize core services",
];

const MANAGEMENT_TEMPLATES: [&str; 4] = [
    "Led cross-functional initiatives applying {keyword} practices to deliver projects on schedule",
    "Drove {keyword} improvements across teams, increasing delivery predictability",
    "Coordinated stakeholders through {keyword} processes to align priorities and outcomes",
    "Mentored team members on {keyword}, strengthening team capability and ownership",
];

const ANALYTICAL_TEMPLATES: [&str; 4] = [
    "Analyzed {keyword} to uncover trends that informed key business decisions",
    "Produced {keyword} reports and dashboards that gave leadership actionable insights",
    "Applied {keyword} techniques to measure performance and identify optimization opportunities",
    "Translated {keyword} findings into recommendations adopted by stakeholders",
];

const GENERAL_TEMPLATES: [&str; 4] = [
    "Demonstrated strong {keyword} skills while delivering high-impact results",
    "Applied {keyword} expertise to improve team outcomes and customer satisfaction",
    "Strengthened {keyword} capabilities through hands-on project work",
    "Leveraged {keyword} to contribute to key organizational goals",
];

impl KeywordCategory {
    pub fn templates(self) -> &'static [&'static str; 4] {
        match self {
            KeywordCategory::Technical => &TECHNICAL_TEMPLATES,
            KeywordCategory::Management => &MANAGEMENT_TEMPLATES,
            KeywordCategory::Analytical => &ANALYTICAL_TEMPLATES,
            KeywordCategory::General => &GENERAL_TEMPLATES,
        }
    }
}

/// Classifies a keyword. Rules are checked in order: technical, management,
/// analytical, then general.
pub fn classify_keyword(keyword: &str) -> KeywordCategory {
    if TECHNICAL_RE.is_match(keyword) {
        KeywordCategory::Technical
    } else if MANAGEMENT_RE.is_match(keyword) {
        KeywordCategory::Management
    } else if ANALYTICAL_RE.is_match(keyword) {
        KeywordCategory::Analytical
    } else {
        KeywordCategory::General
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Template choice
// ────────────────────────────────────────────────────────────────────────────

/// Picks which of `count` templates to use.
pub trait TemplateChooser {
    /// Returns an index in `0..count`. `count` is never zero.
    fn choose(&mut self, count: usize) -> usize;
}

/// Uniform random choice backed by any `rand` RNG.
#[derive(Debug, Clone)]
pub struct RandomChooser<R>(pub R);

impl RandomChooser<StdRng> {
    pub fn from_entropy() -> Self {
        RandomChooser(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        RandomChooser(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TemplateChooser for RandomChooser<R> {
    fn choose(&mut self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        self.0.gen_range(0..count)
    }
}

/// Always picks the same slot (wrapped into range).
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedChooser(pub usize);

impl TemplateChooser for FixedChooser {
    fn choose(&mut self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        self.0 % count
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generation
// ────────────────────────────────────────────────────────────────────────────

/// Builds new-bullet and modified-bullet suggestions for `missing_keywords`.
///
/// Returns an empty list when there is nothing to suggest.
pub fn generate_suggestions<B, K, C>(
    resume_bullets: &[B],
    missing_keywords: &[K],
    chooser: &mut C,
) -> Vec<Suggestion>
where
    B: AsRef<str>,
    K: AsRef<str>,
    C: TemplateChooser + ?Sized,
{
    let missing: Vec<&str> = missing_keywords
        .iter()
        .map(|k| k.as_ref().trim())
        .filter(|k| !k.is_empty())
        .collect();

    if missing.is_empty() {
        return Vec::new();
    }

    let mut suggestions = Vec::new();

    for keyword in missing.iter().take(MAX_NEW_BULLETS) {
        let templates = classify_keyword(keyword).templates();
        let template = templates[chooser.choose(templates.len()) % templates.len()];
        suggestions.push(Suggestion::new_bullet(
            *keyword,
            template.replace("{keyword}", keyword),
        ));
    }

    let insertable = &missing[..missing.len().min(INSERTION_KEYWORDS)];
    let bullets = resume_bullets
        .iter()
        .map(|b| clean_bullet(b.as_ref()))
        .filter(|b| b.chars().count() > MIN_BULLET_CHARS)
        .take(MAX_MODIFIED_BULLETS);

    for (i, bullet) in bullets.enumerate() {
        let Some(keyword) = pick_insertable(bullet, insertable, i) else {
            continue;
        };
        suggestions.push(Suggestion::modified_bullet(
            keyword,
            bullet,
            insert_keyword(bullet, keyword),
        ));
    }

    suggestions
}

/// Strips surrounding whitespace and a leading bullet glyph.
pub fn clean_bullet(line: &str) -> &str {
    line.trim().trim_start_matches(BULLET_MARKERS).trim()
}

/// Rotates through the insertable keywords so consecutive bullets get
/// different ones, skipping any keyword the bullet already mentions.
fn pick_insertable<'a>(bullet: &str, keywords: &[&'a str], offset: usize) -> Option<&'a str> {
    let bullet_lower = bullet.to_lowercase();
    (0..keywords.len())
        .map(|step| keywords[(offset + step) % keywords.len()])
        .find(|k| !bullet_lower.contains(&k.to_lowercase()))
}

/// Splices `keyword` into `bullet` using the first strategy that applies:
/// 1. "using" / "with" clause → append "and <keyword>" to the clause
/// 2. "developed" / "created" / "built" → "<keyword>-based" right after the verb
/// 3. otherwise → trailing ", leveraging <keyword> methodologies"
pub fn insert_keyword(bullet: &str, keyword: &str) -> String {
    if let Some(m) = USING_WITH_RE.find(bullet) {
        let end = clause_end(bullet, m.end());
        return format!("{} and {keyword}{}", &bullet[..end], &bullet[end..]);
    }

    if let Some(m) = BUILD_VERB_RE.find(bullet) {
        return format!(
            "{} {keyword}-based{}",
            &bullet[..m.end()],
            &bullet[m.end()..]
        );
    }

    match bullet.strip_suffix('.') {
        Some(base) => format!("{base}, leveraging {keyword} methodologies."),
        None => format!("{bullet}, leveraging {keyword} methodologies"),
    }
}

/// Byte offset where the clause starting at `from` ends: the next `,` or `;`,
/// a `.` followed by whitespace or end of text, or the end of the text.
/// Dots inside words ("Node.js") do not end a clause.
fn clause_end(text: &str, from: usize) -> usize {
    for (i, c) in text[from..].char_indices() {
        let at = from + i;
        match c {
            ',' | ';' => return at,
            '.' => {
                let next = text[at + c.len_utf8()..].chars().next();
                if next.map_or(true, char::is_whitespace) {
                    return at;
                }
            }
            _ => {}
        }
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modified(suggestions: &[Suggestion]) -> Vec<(&str, &str, &str)> {
        suggestions
            .iter()
            .filter_map(|s| match s {
                Suggestion::ModifiedBullet {
                    keyword,
                    original,
                    improved,
                    ..
                } => Some((keyword.as_str(), original.as_str(), improved.as_str())),
                _ => None,
            })
            .collect()
    }

    fn new_bullets(suggestions: &[Suggestion]) -> Vec<(&str, &str)> {
        suggestions
            .iter()
            .filter_map(|s| match s {
                Suggestion::NewBullet { keyword, text, .. } => {
                    Some((keyword.as_str(), text.as_str()))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_docker_spliced_into_using_clause() {
        let bullets = ["Developed backend services using Node.js"];
        let suggestions = generate_suggestions(&bullets, &["Docker"], &mut FixedChooser(0));

        let modified = modified(&suggestions);
        assert_eq!(modified.len(), 1);
        let (keyword, original, improved) = modified[0];
        assert_eq!(keyword, "Docker");
        assert_eq!(original, "Developed backend services using Node.js");
        assert_eq!(improved, "Developed backend services using Node.js and Docker");
    }

    #[test]
    fn test_using_clause_ends_at_comma_or_sentence_end() {
        assert_eq!(
            insert_keyword("Shipped APIs with Rust, cutting latency 40%", "gRPC"),
            "Shipped APIs with Rust and gRPC, cutting latency 40%"
        );
        assert_eq!(
            insert_keyword("Automated deploys using Jenkins.", "Terraform"),
            "Automated deploys using Jenkins and Terraform."
        );
    }

    #[test]
    fn test_build_verb_gets_keyword_based_prefix() {
        assert_eq!(
            insert_keyword("Built internal dashboards for the finance team", "Kafka"),
            "Built Kafka-based internal dashboards for the finance team"
        );
        assert_eq!(
            insert_keyword("Created onboarding flows for new customers", "React"),
            "Created React-based onboarding flows for new customers"
        );
    }

    #[test]
    fn test_fallback_appends_leveraging_clause() {
        assert_eq!(
            insert_keyword("Reduced cloud spend by 30% across regions.", "FinOps"),
            "Reduced cloud spend by 30% across regions, leveraging FinOps methodologies."
        );
        assert_eq!(
            insert_keyword("Reduced cloud spend by 30% across regions", "FinOps"),
            "Reduced cloud spend by 30% across regions, leveraging FinOps methodologies"
        );
    }

    #[test]
    fn test_using_clause_wins_over_build_verb() {
        // strategy order: using/with first, even when a build verb is present
        let improved = insert_keyword("Built pipelines with Airflow", "Spark");
        assert_eq!(improved, "Built pipelines with Airflow and Spark");
    }

    #[test]
    fn test_with_must_be_a_whole_word() {
        let improved = insert_keyword("Worked within tight deadlines on payments", "Go");
        assert_eq!(
            improved,
            "Worked within tight deadlines on payments, leveraging Go methodologies"
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        assert_eq!(classify_keyword("docker"), KeywordCategory::Technical);
        assert_eq!(classify_keyword("aws lambda"), KeywordCategory::Technical);
        assert_eq!(classify_keyword("agile"), KeywordCategory::Management);
        assert_eq!(classify_keyword("stakeholder management"), KeywordCategory::Management);
        assert_eq!(classify_keyword("data analysis"), KeywordCategory::Analytical);
        assert_eq!(classify_keyword("reporting"), KeywordCategory::Analytical);
        assert_eq!(classify_keyword("communication"), KeywordCategory::General);
        for _ in 0..10 {
            assert_eq!(classify_keyword("kubernetes"), KeywordCategory::Technical);
        }
    }

    #[test]
    fn test_every_category_has_four_keyword_templates() {
        for category in [
            KeywordCategory::Technical,
            KeywordCategory::Management,
            KeywordCategory::Analytical,
            KeywordCategory::General,
        ] {
            let templates = category.templates();
            assert_eq!(templates.len(), 4);
            assert!(templates.iter().all(|t| t.contains("{keyword}")));
        }
    }

    #[test]
    fn test_new_bullets_use_chosen_template() {
        let suggestions = generate_suggestions::<&str, _, _>(&[], &["python"], &mut FixedChooser(2));
        assert_eq!(
            suggestions,
            vec![Suggestion::NewBullet {
                keyword: "python".to_string(),
                text: TECHNICAL_TEMPLATES[2].replace("{keyword}", "python"),
                estimated_improvement: NEW_BULLET_IMPROVEMENT.to_string(),
            }]
        );
    }

    #[test]
    fn test_new_bullets_capped_at_eight() {
        let missing: Vec<String> = (0..12).map(|i| format!("skill{i}")).collect();
        let suggestions = generate_suggestions::<&str, _, _>(&[], missing.as_slice(), &mut FixedChooser(0));
        let new = new_bullets(&suggestions);
        assert_eq!(new.len(), MAX_NEW_BULLETS);
        assert_eq!(new[0].0, "skill0");
        assert_eq!(new[7].0, "skill7");
    }

    #[test]
    fn test_seeded_random_choice_is_reproducible() {
        let missing = ["docker", "agile", "reporting", "communication"];
        let first = generate_suggestions::<&str, _, _>(&[], &missing, &mut RandomChooser::seeded(7));
        let second = generate_suggestions::<&str, _, _>(&[], &missing, &mut RandomChooser::seeded(7));
        assert_eq!(first, second);
        for (keyword, text) in new_bullets(&first) {
            assert!(text.contains(keyword));
        }
    }

    #[test]
    fn test_random_chooser_stays_in_range() {
        let mut chooser = RandomChooser::seeded(42);
        for _ in 0..100 {
            assert!(chooser.choose(4) < 4);
        }
        assert_eq!(chooser.choose(0), 0);
        assert_eq!(FixedChooser(9).choose(4), 1);
    }

    #[test]
    fn test_modified_bullets_capped_and_short_bullets_skipped() {
        let bullets = [
            "",
            "Too short bullet",
            "• Developed billing services using Java",
            "- Managed vendor relationships for hardware",
            "* Created training material for onboarding",
            "Reduced page load time across the storefront",
            "Built a metrics pipeline for the data team",
            "Collaborated with designers on the mobile app",
        ];
        let suggestions =
            generate_suggestions(&bullets, &["docker", "scrum", "tableau"], &mut FixedChooser(0));
        let modified = modified(&suggestions);
        assert_eq!(modified.len(), MAX_MODIFIED_BULLETS);
        assert_eq!(modified[0].1, "Developed billing services using Java");
        assert!(modified.iter().all(|(_, original, _)| original.chars().count() > 20));
    }

    #[test]
    fn test_insertion_rotates_through_top_three_keywords() {
        let bullets = [
            "Reduced page load time across the storefront",
            "Reduced checkout errors for returning customers",
            "Reduced support tickets by rewriting help pages",
            "Reduced infrastructure cost for batch workloads",
        ];
        let missing = ["docker", "scrum", "tableau", "excel"];
        let suggestions = generate_suggestions(&bullets, &missing, &mut FixedChooser(0));
        let keywords: Vec<&str> = modified(&suggestions).iter().map(|m| m.0).collect();
        assert_eq!(keywords, vec!["docker", "scrum", "tableau", "docker"]);
    }

    #[test]
    fn test_keyword_already_in_bullet_is_skipped() {
        let bullets = ["Developed backend services using Docker"];
        let suggestions = generate_suggestions(&bullets, &["docker"], &mut FixedChooser(0));
        assert!(modified(&suggestions).is_empty());
        assert_eq!(new_bullets(&suggestions).len(), 1);

        let suggestions =
            generate_suggestions(&bullets, &["docker", "kubernetes"], &mut FixedChooser(0));
        assert_eq!(modified(&suggestions)[0].0, "kubernetes");
    }

    #[test]
    fn test_no_missing_keywords_yields_nothing() {
        let bullets = ["Developed backend services using Node.js"];
        let none: [&str; 0] = [];
        assert!(generate_suggestions(&bullets, &none, &mut FixedChooser(0)).is_empty());
        assert!(generate_suggestions(&bullets, &["  "], &mut FixedChooser(0)).is_empty());
    }

    #[test]
    fn test_suggestion_serializes_with_type_tag() {
        let json = serde_json::to_value(Suggestion::modified_bullet("docker", "a", "b")).unwrap();
        assert_eq!(json["type"], "modified_bullet");
        assert_eq!(json["estimated_improvement"], MODIFIED_BULLET_IMPROVEMENT);
    }
}
