use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerLevel {
    #[default]
    Entry,
    Mid,
    Senior,
}

/// Structured result of resume analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    /// Deduplicated, in order of first appearance.
    pub skills: Vec<String>,
    pub experience_years: u32,
    pub education_level: String,
    pub key_strengths: Vec<String>,
    pub improvement_areas: Vec<String>,
    pub career_level: CareerLevel,
    pub industries: Vec<String>,
    /// 0 – 100
    pub score: u32,
}
