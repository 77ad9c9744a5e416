use serde::{Deserialize, Serialize};

/// Maximum number of recommendations returned for one request.
pub const MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub title: String,
    /// Always in [0, 1] once resolved.
    pub match_confidence: f64,
    pub description: String,
    pub required_skills: Vec<String>,
    pub salary_range: String,
    pub growth_outlook: String,
    pub next_steps: Vec<String>,
}
