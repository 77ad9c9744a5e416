//! Resume analysis: skills, level and a quality score from raw resume text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::guidance::default_user_id;
use crate::guidance::extractor::{extract, ExtractionFailure};
use crate::guidance::policy::{Capability, CapabilityKind};
use crate::guidance::prompts::{fill, RESUME_PROMPT_TEMPLATE};
use crate::models::resume::{CareerLevel, ResumeAnalysis};

/// Skills reported by the fallback.
const MAX_FALLBACK_SKILLS: usize = 8;
const MIN_FALLBACK_SCORE: u32 = 50;
const MAX_FALLBACK_SCORE: u32 = 90;
/// More matched skills than this reads as mid-level.
const MID_LEVEL_SKILL_THRESHOLD: usize = 5;
const MAX_EXPERIENCE_YEARS: u32 = 50;

/// Lowercase substring → reported skill name. Order is report order.
const SKILL_TABLE: &[(&str, &str)] = &[
    ("python", "Python"),
    ("javascript", "JavaScript"),
    ("react", "React"),
    ("node", "Node.js"),
    ("sql", "SQL"),
    ("java", "Java"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("machine learning", "Machine Learning"),
    ("data", "Data Analysis"),
    ("project management", "Project Management"),
    ("leadership", "Leadership"),
    ("git", "Git"),
    ("docker", "Docker"),
    ("aws", "AWS"),
];

const DEFAULT_SKILLS: &[&str] = &["Communication", "Problem Solving", "Teamwork"];
const IMPROVEMENT_AREAS: &[&str] = &["Portfolio development", "Industry certifications"];
const INDUSTRIES: &[&str] = &["Technology", "Software Development"];

static EXPERIENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})\s*\+?\s*(?:years?|yrs?)\b").unwrap());

static EDUCATION_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\b(ph\.?d|doctorate|doctoral|doctor)\b", "Doctorate"),
        (r"(?i)\b(master'?s?|mba|m\.?sc|m\.?tech)\b", "Master's Degree"),
        (
            r"(?i)\b(bachelor'?s?|b\.?sc|b\.?tech|b\.?e\.|bs|undergraduate)\b",
            "Bachelor's Degree",
        ),
        (r"(?i)\b(associate'?s?|diploma)\b", "Associate Degree"),
    ]
    .into_iter()
    .map(|(pattern, label)| (Regex::new(pattern).unwrap(), label))
    .collect()
});

#[derive(Debug, Clone, Deserialize)]
pub struct ResumeRequest {
    pub resume_text: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeResponse {
    pub skills: Vec<String>,
    pub analysis: ResumeAnalysis,
}

impl From<ResumeAnalysis> for ResumeResponse {
    fn from(analysis: ResumeAnalysis) -> Self {
        Self {
            skills: analysis.skills.clone(),
            analysis,
        }
    }
}

/// Fallback score: a pure function of text length (in chars) and matched skill count.
///
/// `clamp(len / 20 + 5 * matched, 50, 90)`
pub fn fallback_score(text_len: usize, matched_skills: usize) -> u32 {
    let raw = (text_len / 20).saturating_add(matched_skills.saturating_mul(5));
    (raw.min(u32::MAX as usize) as u32).clamp(MIN_FALLBACK_SCORE, MAX_FALLBACK_SCORE)
}

/// Largest "N years" / "N+ yrs" mention, capped.
fn experience_years(text: &str) -> u32 {
    EXPERIENCE_RE
        .captures_iter(text)
        .filter_map(|c| c[1].parse::<u32>().ok())
        .max()
        .unwrap_or(0)
        .min(MAX_EXPERIENCE_YEARS)
}

fn education_level(text: &str) -> &'static str {
    EDUCATION_RULES
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, label)| *label)
        .unwrap_or("Not specified")
}

/// Case-insensitive dedup preserving first occurrence.
fn dedup_skills(skills: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .collect()
}

/// Keyword-table analysis used when the model is unavailable.
pub fn analyze_with_keywords(resume_text: &str) -> ResumeAnalysis {
    let lowered = resume_text.to_lowercase();
    let matched: Vec<&str> = SKILL_TABLE
        .iter()
        .filter(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, skill)| *skill)
        .collect();

    let skills: Vec<String> = if matched.is_empty() {
        DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect()
    } else {
        matched
            .iter()
            .take(MAX_FALLBACK_SKILLS)
            .map(|s| s.to_string())
            .collect()
    };

    let career_level = if matched.len() > MID_LEVEL_SKILL_THRESHOLD {
        CareerLevel::Mid
    } else {
        CareerLevel::Entry
    };

    ResumeAnalysis {
        key_strengths: skills.iter().take(3).cloned().collect(),
        skills,
        experience_years: experience_years(resume_text),
        education_level: education_level(resume_text).to_string(),
        improvement_areas: IMPROVEMENT_AREAS.iter().map(|s| s.to_string()).collect(),
        career_level,
        industries: INDUSTRIES.iter().map(|s| s.to_string()).collect(),
        score: fallback_score(resume_text.chars().count(), matched.len()),
    }
}

pub struct ResumeCapability;

impl Capability for ResumeCapability {
    type Input = ResumeRequest;
    type Output = ResumeAnalysis;

    fn kind(&self) -> CapabilityKind {
        CapabilityKind::ResumeAnalysis
    }

    fn validate(&self, input: &ResumeRequest) -> Result<(), AppError> {
        if input.resume_text.trim().is_empty() {
            return Err(AppError::Validation(
                "resume_text cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn prompt(&self, input: &ResumeRequest) -> String {
        fill(RESUME_PROMPT_TEMPLATE, &[("resume_text", input.resume_text.trim())])
    }

    fn interpret(
        &self,
        raw: &str,
        _input: &ResumeRequest,
    ) -> Result<ResumeAnalysis, ExtractionFailure> {
        let mut analysis: ResumeAnalysis = extract(raw)?;
        if analysis.score > 100 {
            return Err(ExtractionFailure::Nonconforming(format!(
                "score {} outside 0-100",
                analysis.score
            )));
        }
        analysis.skills = dedup_skills(analysis.skills);
        if analysis.skills.is_empty() {
            return Err(ExtractionFailure::Nonconforming(
                "no skills extracted".to_string(),
            ));
        }
        Ok(analysis)
    }

    fn fallback(&self, input: &ResumeRequest) -> Result<ResumeAnalysis, AppError> {
        Ok(analyze_with_keywords(&input.resume_text))
    }
}
