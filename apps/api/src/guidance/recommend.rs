//! Career recommendations for a user profile.
//!
//! Fallback: careers implied by the profile's interests (in interest order),
//! then the always-included base careers, deduplicated and cut to 5.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::guidance::default_user_id;
use crate::guidance::extractor::{extract, ExtractionFailure};
use crate::guidance::policy::{Capability, CapabilityKind};
use crate::guidance::prompts::{fill, RECOMMEND_PROMPT_TEMPLATE};
use crate::models::profile::UserProfile;
use crate::models::recommendation::{RecommendationItem, MAX_RECOMMENDATIONS};

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendRequest {
    pub user_profile: UserProfile,
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<RecommendationItem>,
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog
// ────────────────────────────────────────────────────────────────────────────

struct CatalogEntry {
    title: &'static str,
    confidence: f64,
    description: &'static str,
    required_skills: &'static [&'static str],
    salary_range: &'static str,
    growth_outlook: &'static str,
    next_steps: &'static [&'static str],
}

impl CatalogEntry {
    fn to_item(&self) -> RecommendationItem {
        RecommendationItem {
            title: self.title.to_string(),
            match_confidence: self.confidence,
            description: self.description.to_string(),
            required_skills: self.required_skills.iter().map(|s| s.to_string()).collect(),
            salary_range: self.salary_range.to_string(),
            growth_outlook: self.growth_outlook.to_string(),
            next_steps: self.next_steps.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Interest keywords → career. Single words match whole tokens, phrases match substrings.
const INTEREST_RULES: &[(&[&str], CatalogEntry)] = &[
    (
        &["ai", "ml", "machine learning", "artificial intelligence", "deep learning"],
        CatalogEntry {
            title: "Machine Learning Engineer",
            confidence: 0.92,
            description: "Design, train and deploy machine learning models that power intelligent products.",
            required_skills: &["Python", "PyTorch", "Statistics", "MLOps"],
            salary_range: "$110k-$170k",
            growth_outlook: "Very High",
            next_steps: &[
                "Complete a machine learning specialization",
                "Build and deploy an end-to-end ML project",
                "Learn model serving and monitoring",
            ],
        },
    ),
    (
        &["web", "frontend", "backend", "full stack", "fullstack"],
        CatalogEntry {
            title: "Full Stack Developer",
            confidence: 0.9,
            description: "Build complete web applications, from responsive interfaces to APIs and databases.",
            required_skills: &["JavaScript", "React", "Node.js", "SQL"],
            salary_range: "$80k-$140k",
            growth_outlook: "High",
            next_steps: &[
                "Build a full stack project with authentication",
                "Learn a backend framework in depth",
                "Deploy an app to a cloud platform",
            ],
        },
    ),
    (
        &["data science", "data scientist", "analytics", "statistics"],
        CatalogEntry {
            title: "Data Scientist",
            confidence: 0.88,
            description: "Extract insight from data with statistics, experimentation and predictive models.",
            required_skills: &["Python", "SQL", "Statistics", "Pandas"],
            salary_range: "$95k-$155k",
            growth_outlook: "Very High",
            next_steps: &[
                "Publish an exploratory analysis notebook",
                "Practice A/B test design",
                "Enter a Kaggle competition",
            ],
        },
    ),
    (
        &["design", "ux", "ui"],
        CatalogEntry {
            title: "UX Designer",
            confidence: 0.85,
            description: "Research user needs and craft intuitive, accessible product experiences.",
            required_skills: &["Figma", "User Research", "Prototyping", "Accessibility"],
            salary_range: "$70k-$125k",
            growth_outlook: "High",
            next_steps: &[
                "Create three case studies for a portfolio",
                "Run a usability test on a real product",
                "Learn a design system",
            ],
        },
    ),
    (
        &["cloud", "devops", "infrastructure"],
        CatalogEntry {
            title: "Cloud Engineer",
            confidence: 0.84,
            description: "Build and automate scalable, reliable cloud infrastructure.",
            required_skills: &["AWS", "Terraform", "Docker", "Linux"],
            salary_range: "$95k-$150k",
            growth_outlook: "Very High",
            next_steps: &[
                "Earn a cloud practitioner certification",
                "Automate a deployment pipeline",
                "Learn infrastructure as code",
            ],
        },
    ),
    (
        &["security", "cybersecurity", "infosec"],
        CatalogEntry {
            title: "Cybersecurity Analyst",
            confidence: 0.82,
            description: "Protect systems by monitoring threats, responding to incidents and hardening defenses.",
            required_skills: &["Networking", "Linux", "SIEM", "Threat Analysis"],
            salary_range: "$85k-$140k",
            growth_outlook: "Very High",
            next_steps: &[
                "Study for Security+",
                "Practice on capture-the-flag platforms",
                "Set up a home security lab",
            ],
        },
    ),
    (
        &["mobile", "android", "ios", "app development"],
        CatalogEntry {
            title: "Mobile Developer",
            confidence: 0.8,
            description: "Build native and cross-platform apps for phones and tablets.",
            required_skills: &["Kotlin", "Swift", "Flutter", "REST APIs"],
            salary_range: "$85k-$145k",
            growth_outlook: "High",
            next_steps: &[
                "Publish an app to a store",
                "Learn a cross-platform framework",
                "Study mobile UX patterns",
            ],
        },
    ),
];

/// Always included after interest matches.
const BASE_ENTRIES: &[CatalogEntry] = &[
    CatalogEntry {
        title: "Software Engineer",
        confidence: 0.72,
        description: "Design, build and maintain software systems across a wide range of industries.",
        required_skills: &["Programming", "Data Structures", "Git", "Testing"],
        salary_range: "$90k-$150k",
        growth_outlook: "High",
        next_steps: &[
            "Master one programming language",
            "Contribute to an open-source project",
            "Practice algorithm problems weekly",
        ],
    },
    CatalogEntry {
        title: "Data Analyst",
        confidence: 0.68,
        description: "Turn data into dashboards and insights that guide business decisions.",
        required_skills: &["SQL", "Excel", "Tableau", "Statistics"],
        salary_range: "$60k-$95k",
        growth_outlook: "High",
        next_steps: &[
            "Learn SQL joins and window functions",
            "Build a dashboard from public data",
            "Study descriptive statistics",
        ],
    },
    CatalogEntry {
        title: "Product Manager",
        confidence: 0.64,
        description: "Shape product strategy and coordinate teams to deliver what users need.",
        required_skills: &["Communication", "Prioritization", "Analytics", "Agile"],
        salary_range: "$95k-$160k",
        growth_outlook: "Moderate",
        next_steps: &[
            "Write a product spec for an app you use",
            "Learn basic product analytics",
            "Shadow a product team",
        ],
    },
    CatalogEntry {
        title: "QA Engineer",
        confidence: 0.6,
        description: "Safeguard software quality through test design and automation.",
        required_skills: &["Test Automation", "Selenium", "API Testing", "Attention to Detail"],
        salary_range: "$65k-$110k",
        growth_outlook: "Moderate",
        next_steps: &[
            "Automate tests for a sample web app",
            "Learn an API testing tool",
            "Study testing in CI pipelines",
        ],
    },
];

fn interest_matches(interest: &str, keyword: &str) -> bool {
    let lowered = interest.to_lowercase();
    if keyword.contains(' ') {
        return lowered.contains(keyword);
    }
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| token == keyword)
}

/// Deterministic recommendations from the interest table and base list.
pub fn recommend_from_catalog(profile: &UserProfile) -> Vec<RecommendationItem> {
    let interest_entries = profile.interests().into_iter().flat_map(|interest| {
        INTEREST_RULES
            .iter()
            .filter(move |(keywords, _)| keywords.iter().any(|kw| interest_matches(&interest, kw)))
            .map(|(_, entry)| entry)
    });

    let mut seen = HashSet::new();
    interest_entries
        .chain(BASE_ENTRIES.iter())
        .filter(|entry| seen.insert(entry.title))
        .take(MAX_RECOMMENDATIONS)
        .map(CatalogEntry::to_item)
        .collect()
}

/// Accepts confidences on a 0–1 or 0–100 scale; returns the 0–1 value.
fn normalize_confidence(value: f64) -> Option<f64> {
    if !value.is_finite() || value < 0.0 {
        None
    } else if value <= 1.0 {
        Some(value)
    } else if value <= 100.0 {
        Some(value / 100.0)
    } else {
        None
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Capability
// ────────────────────────────────────────────────────────────────────────────

pub struct RecommendCapability;

impl Capability for RecommendCapability {
    type Input = RecommendRequest;
    type Output = Vec<RecommendationItem>;

    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Recommendation
    }

    fn validate(&self, _input: &RecommendRequest) -> Result<(), AppError> {
        // `user_profile` is mandatory at the deserialization layer; any object is usable.
        Ok(())
    }

    fn prompt(&self, input: &RecommendRequest) -> String {
        let skills = input.user_profile.skills();
        let skills = if skills.is_empty() {
            "(none listed)".to_string()
        } else {
            skills.join(", ")
        };
        let profile_json =
            serde_json::to_string_pretty(&input.user_profile).unwrap_or_else(|_| "{}".to_string());
        fill(
            RECOMMEND_PROMPT_TEMPLATE,
            &[("skills", skills.as_str()), ("profile_json", profile_json.as_str())],
        )
    }

    fn interpret(
        &self,
        raw: &str,
        _input: &RecommendRequest,
    ) -> Result<Vec<RecommendationItem>, ExtractionFailure> {
        let payload: RecommendResponse = extract(raw)?;

        let mut items = payload.recommendations;
        items.truncate(MAX_RECOMMENDATIONS);
        if items.is_empty() {
            return Err(ExtractionFailure::Nonconforming(
                "no recommendations returned".to_string(),
            ));
        }

        for item in &mut items {
            if item.title.trim().is_empty() {
                return Err(ExtractionFailure::Nonconforming(
                    "recommendation without title".to_string(),
                ));
            }
            let raw_confidence = item.match_confidence;
            item.match_confidence = normalize_confidence(raw_confidence).ok_or_else(|| {
                ExtractionFailure::Nonconforming(format!(
                    "match_confidence {raw_confidence} out of range"
                ))
            })?;
        }
        Ok(items)
    }

    fn fallback(&self, input: &RecommendRequest) -> Result<Vec<RecommendationItem>, AppError> {
        let items = recommend_from_catalog(&input.user_profile);
        if items.is_empty() {
            return Err(AppError::Internal(anyhow::anyhow!(
                "recommendation catalog produced no items"
            )));
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::guidance::policy::test_support::{fallback_only, with_model, ScriptedModel};
    use crate::guidance::policy::ResolutionPath;

    fn request(value: serde_json::Value) -> RecommendRequest {
        serde_json::from_value(value).unwrap()
    }

    fn titles(items: &[RecommendationItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_prompt_lists_declared_skills() {
        let req = request(json!({"user_profile": {"skills": "Rust, SQL ,"}}));
        let prompt = RecommendCapability.prompt(&req);
        assert!(prompt.contains("DECLARED SKILLS: Rust, SQL\n"));

        let req = request(json!({"user_profile": {"interests": ["Cloud"]}}));
        assert!(RecommendCapability.prompt(&req).contains("DECLARED SKILLS: (none listed)"));
    }

    #[tokio::test]
    async fn test_web_development_gets_full_stack_plus_base() {
        let req = request(json!({"user_profile": {"interests": ["Web Development"]}, "user_id": "u1"}));
        let resolved = fallback_only().resolve(&RecommendCapability, &req).await.unwrap();
        assert_eq!(resolved.path, ResolutionPath::Fallback);
        assert_eq!(
            titles(&resolved.output),
            vec![
                "Full Stack Developer",
                "Software Engineer",
                "Data Analyst",
                "Product Manager",
                "QA Engineer"
            ]
        );
    }

    #[test]
    fn test_ai_ml_item_precedes_base_items() {
        let profile: UserProfile = serde_json::from_value(json!({"interests": ["AI/ML"]})).unwrap();
        let items = recommend_from_catalog(&profile);
        assert_eq!(items[0].title, "Machine Learning Engineer");
        assert!(items.len() <= MAX_RECOMMENDATIONS);
    }

    #[test]
    fn test_many_interests_truncate_to_five() {
        let profile: UserProfile = serde_json::from_value(json!({
            "interests": ["AI/ML", "Web Development", "Data Science", "UX Design", "Cloud", "Mobile"]
        }))
        .unwrap();
        let items = recommend_from_catalog(&profile);
        assert_eq!(items.len(), MAX_RECOMMENDATIONS);
        assert_eq!(
            titles(&items),
            vec![
                "Machine Learning Engineer",
                "Full Stack Developer",
                "Data Scientist",
                "UX Designer",
                "Cloud Engineer"
            ]
        );
    }

    #[test]
    fn test_duplicate_interests_are_deduplicated() {
        let profile: UserProfile =
            serde_json::from_value(json!({"interests": ["Frontend", "Backend"]})).unwrap();
        let items = recommend_from_catalog(&profile);
        assert_eq!(
            titles(&items).iter().filter(|t| **t == "Full Stack Developer").count(),
            1
        );
        assert_eq!(items.len(), 5);
    }

    #[test]
    fn test_empty_profile_gets_base_list() {
        let items = recommend_from_catalog(&UserProfile::default());
        assert_eq!(items.len(), BASE_ENTRIES.len());
        assert!(items
            .iter()
            .all(|i| (0.0..=1.0).contains(&i.match_confidence) && !i.required_skills.is_empty()));
    }

    #[test]
    fn test_single_word_keywords_do_not_match_inside_words() {
        // "ai" must not match "email"; "ui" must not match "build".
        assert!(!interest_matches("Email marketing", "ai"));
        assert!(!interest_matches("Building", "ui"));
        assert!(interest_matches("UI/UX", "ui"));
    }

    #[test]
    fn test_normalize_confidence() {
        assert_eq!(normalize_confidence(0.5), Some(0.5));
        assert_eq!(normalize_confidence(85.0), Some(0.85));
        assert_eq!(normalize_confidence(101.0), None);
        assert_eq!(normalize_confidence(-0.1), None);
        assert_eq!(normalize_confidence(f64::NAN), None);
    }

    #[tokio::test]
    async fn test_model_percent_confidence_is_normalized() {
        let raw = json!({"recommendations": [{
            "title": "Robotics Engineer",
            "match_confidence": 77,
            "description": "Build robots",
            "required_skills": ["C++"],
            "salary_range": "$100k",
            "growth_outlook": "High",
            "next_steps": ["Build a rover"]
        }]})
        .to_string();
        let policy = with_model(ScriptedModel::replying(&raw));
        let req = request(json!({"user_profile": {}}));
        let resolved = policy.resolve(&RecommendCapability, &req).await.unwrap();
        assert_eq!(resolved.path, ResolutionPath::Model);
        assert!((resolved.output[0].match_confidence - 0.77).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_model_list_falls_back() {
        let policy = with_model(ScriptedModel::replying("{\"recommendations\": []}"));
        let req = request(json!({"user_profile": {"interests": ["AI/ML"]}}));
        let resolved = policy.resolve(&RecommendCapability, &req).await.unwrap();
        assert_eq!(resolved.path, ResolutionPath::Fallback);
        assert_eq!(resolved.output[0].title, "Machine Learning Engineer");
    }

    #[test]
    fn test_missing_profile_fails_deserialization() {
        let result: Result<RecommendRequest, _> = serde_json::from_value(json!({"user_id": "u1"}));
        assert!(result.is_err());
    }
}
