//! Learning roadmaps for a named career.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::guidance::default_user_id;
use crate::guidance::extractor::{extract, ExtractionFailure};
use crate::guidance::policy::{Capability, CapabilityKind};
use crate::guidance::prompts::{fill, ROADMAP_PROMPT_TEMPLATE};
use crate::models::roadmap::{Roadmap, RoadmapPhase};

#[derive(Debug, Clone, Deserialize)]
pub struct RoadmapRequest {
    pub career_name: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoadmapResponse {
    pub roadmap: Roadmap,
    pub phases: Vec<RoadmapPhase>,
}

impl From<Roadmap> for RoadmapResponse {
    fn from(roadmap: Roadmap) -> Self {
        Self {
            phases: roadmap.phases.clone(),
            roadmap,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Canned plans
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanTrack {
    Software,
    Data,
    General,
}

const SOFTWARE_KEYWORDS: &[&str] = &["software", "developer", "engineer", "programmer"];
const DATA_KEYWORDS: &[&str] = &["data", "analyst", "analytics"];

/// Software keywords are checked before data keywords.
pub fn classify_career(career_name: &str) -> PlanTrack {
    let lowered = career_name.to_lowercase();
    if SOFTWARE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        PlanTrack::Software
    } else if DATA_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        PlanTrack::Data
    } else {
        PlanTrack::General
    }
}

struct PhaseTemplate {
    title: &'static str,
    duration: &'static str,
    skills: &'static [&'static str],
    projects: &'static [&'static str],
    resources: &'static [&'static str],
}

struct PlanTemplate {
    total_duration: &'static str,
    phases: &'static [PhaseTemplate],
}

const SOFTWARE_PLAN: PlanTemplate = PlanTemplate {
    total_duration: "9-12 months",
    phases: &[
        PhaseTemplate {
            title: "Programming Foundations",
            duration: "2-3 months",
            skills: &["Python or JavaScript", "Git", "Command Line"],
            projects: &["CLI utility", "Personal website"],
            resources: &["CS50", "The Odin Project"],
        },
        PhaseTemplate {
            title: "Data Structures & Algorithms",
            duration: "2 months",
            skills: &["Arrays & Hash Maps", "Trees & Graphs", "Complexity Analysis"],
            projects: &["Algorithm visualizer"],
            resources: &["NeetCode", "Grokking Algorithms"],
        },
        PhaseTemplate {
            title: "Web & Backend Development",
            duration: "3 months",
            skills: &["HTTP & REST", "Databases & SQL", "Testing"],
            projects: &["Full stack CRUD app", "REST API with auth"],
            resources: &["Full Stack Open", "MDN Web Docs"],
        },
        PhaseTemplate {
            title: "Portfolio & Job Search",
            duration: "2-3 months",
            skills: &["System Design Basics", "Interview Practice", "Open Source"],
            projects: &["Capstone project", "Open-source contribution"],
            resources: &["Tech Interview Handbook", "System Design Primer"],
        },
    ],
};

const DATA_PLAN: PlanTemplate = PlanTemplate {
    total_duration: "8-11 months",
    phases: &[
        PhaseTemplate {
            title: "Data Fundamentals",
            duration: "2 months",
            skills: &["Excel", "SQL", "Statistics"],
            projects: &["Sales data cleanup", "SQL query portfolio"],
            resources: &["Mode SQL Tutorial", "Khan Academy Statistics"],
        },
        PhaseTemplate {
            title: "Visualization & Tools",
            duration: "2-3 months",
            skills: &["Tableau or Power BI", "Python", "Pandas"],
            projects: &["Interactive dashboard", "EDA notebook"],
            resources: &["Storytelling with Data", "DataCamp Pandas"],
        },
        PhaseTemplate {
            title: "Advanced Analytics",
            duration: "2-3 months",
            skills: &["A/B Testing", "Regression", "Forecasting"],
            projects: &["Experiment analysis", "Demand forecast"],
            resources: &["Intro to Statistical Learning", "Kaggle Learn"],
        },
        PhaseTemplate {
            title: "Portfolio & Job Search",
            duration: "2-3 months",
            skills: &["Business Communication", "Case Interviews", "Domain Knowledge"],
            projects: &["End-to-end analytics case study"],
            resources: &["Ace the Data Science Interview"],
        },
    ],
};

const GENERAL_PLAN: PlanTemplate = PlanTemplate {
    total_duration: "6-9 months",
    phases: &[
        PhaseTemplate {
            title: "Explore the Field",
            duration: "1 month",
            skills: &["Industry Research", "Informational Interviews"],
            projects: &["Career research summary"],
            resources: &["LinkedIn Learning", "Industry podcasts"],
        },
        PhaseTemplate {
            title: "Core Skills",
            duration: "2-3 months",
            skills: &["Role Fundamentals", "Tools of the Trade", "Communication"],
            projects: &["Guided practice project"],
            resources: &["Coursera", "edX"],
        },
        PhaseTemplate {
            title: "Applied Practice",
            duration: "2-3 months",
            skills: &["Real-world Application", "Collaboration"],
            projects: &["Volunteer or freelance project"],
            resources: &["Professional communities", "Mentorship programs"],
        },
        PhaseTemplate {
            title: "Portfolio & Job Search",
            duration: "1-2 months",
            skills: &["Networking", "Interviewing"],
            projects: &["Portfolio of work samples"],
            resources: &["Resume workshops", "Job boards"],
        },
    ],
};

fn plan_for(track: PlanTrack) -> &'static PlanTemplate {
    match track {
        PlanTrack::Software => &SOFTWARE_PLAN,
        PlanTrack::Data => &DATA_PLAN,
        PlanTrack::General => &GENERAL_PLAN,
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Canned roadmap for `career_name`. Phases are numbered 1..=n.
pub fn roadmap_from_catalog(career_name: &str) -> Roadmap {
    let plan = plan_for(classify_career(career_name));
    Roadmap {
        career: career_name.trim().to_string(),
        total_duration: plan.total_duration.to_string(),
        phases: plan
            .phases
            .iter()
            .enumerate()
            .map(|(i, p)| RoadmapPhase {
                phase: i as u32 + 1,
                title: p.title.to_string(),
                duration: p.duration.to_string(),
                skills: to_strings(p.skills),
                projects: to_strings(p.projects),
                resources: to_strings(p.resources),
            })
            .collect(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Capability
// ────────────────────────────────────────────────────────────────────────────

pub struct RoadmapCapability;

impl Capability for RoadmapCapability {
    type Input = RoadmapRequest;
    type Output = Roadmap;

    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Roadmap
    }

    fn validate(&self, input: &RoadmapRequest) -> Result<(), AppError> {
        if input.career_name.trim().is_empty() {
            return Err(AppError::Validation(
                "career_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn prompt(&self, input: &RoadmapRequest) -> String {
        fill(ROADMAP_PROMPT_TEMPLATE, &[("career_name", input.career_name.trim())])
    }

    /// Phase numbers are positional; the model's own numbering is replaced.
    fn interpret(&self, raw: &str, input: &RoadmapRequest) -> Result<Roadmap, ExtractionFailure> {
        let mut roadmap: Roadmap = extract(raw)?;
        if roadmap.phases.is_empty() {
            return Err(ExtractionFailure::Nonconforming(
                "roadmap has no phases".to_string(),
            ));
        }
        if roadmap.career.trim().is_empty() {
            roadmap.career = input.career_name.trim().to_string();
        }
        Ok(roadmap.renumber())
    }

    fn fallback(&self, input: &RoadmapRequest) -> Result<Roadmap, AppError> {
        Ok(roadmap_from_catalog(&input.career_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guidance::policy::test_support::{fallback_only, with_model, ScriptedModel};
    use crate::guidance::policy::ResolutionPath;

    fn request(career: &str) -> RoadmapRequest {
        RoadmapRequest {
            career_name: career.to_string(),
            user_id: "u1".to_string(),
        }
    }

    fn assert_contiguous(roadmap: &Roadmap) {
        let indices: Vec<u32> = roadmap.phases.iter().map(|p| p.phase).collect();
        let expected: Vec<u32> = (1..=roadmap.phases.len() as u32).collect();
        assert_eq!(indices, expected);
    }

    #[tokio::test]
    async fn test_data_analyst_phases() {
        let resolved = fallback_only()
            .resolve(&RoadmapCapability, &request("Data Analyst"))
            .await
            .unwrap();
        assert_eq!(resolved.path, ResolutionPath::Fallback);
        let titles: Vec<&str> = resolved.output.phases.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Data Fundamentals",
                "Visualization & Tools",
                "Advanced Analytics",
                "Portfolio & Job Search"
            ]
        );
        assert_eq!(resolved.output.career, "Data Analyst");
    }

    #[test]
    fn test_every_fallback_plan_is_contiguous_from_one() {
        for career in ["Backend Developer", "Data Analyst", "Chef", ""] {
            assert_contiguous(&roadmap_from_catalog(career));
        }
    }

    #[test]
    fn test_classification_order() {
        assert_eq!(classify_career("Software Engineer"), PlanTrack::Software);
        assert_eq!(classify_career("Data Engineer"), PlanTrack::Software);
        assert_eq!(classify_career("Business Analyst"), PlanTrack::Data);
        assert_eq!(classify_career("Nurse"), PlanTrack::General);
    }

    #[tokio::test]
    async fn test_blank_career_is_rejected() {
        let err = fallback_only()
            .resolve(&RoadmapCapability, &request(" "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_model_phases_are_renumbered() {
        let raw = r#"```json
{"career": "", "total_duration": "6 months", "phases": [
  {"phase": 3, "title": "A", "duration": "1m", "skills": [], "projects": [], "resources": []},
  {"phase": 7, "title": "B", "duration": "1m", "skills": [], "projects": [], "resources": []}
]}
```"#;
        let policy = with_model(ScriptedModel::replying(raw));
        let resolved = policy
            .resolve(&RoadmapCapability, &request("Pilot"))
            .await
            .unwrap();
        assert_eq!(resolved.path, ResolutionPath::Model);
        assert_eq!(resolved.output.career, "Pilot");
        assert_contiguous(&resolved.output);
    }

    #[tokio::test]
    async fn test_model_phases_without_numbers_are_accepted() {
        let raw = r#"{"career": "Pilot", "total_duration": "1 year", "phases": [
  {"title": "Ground School", "duration": "3m", "skills": [], "projects": [], "resources": []},
  {"title": "Flight Hours", "duration": "9m", "skills": [], "projects": [], "resources": []}
]}"#;
        let policy = with_model(ScriptedModel::replying(raw));
        let resolved = policy
            .resolve(&RoadmapCapability, &request("Pilot"))
            .await
            .unwrap();
        assert_eq!(resolved.path, ResolutionPath::Model);
        assert_eq!(resolved.output.phases[1].title, "Flight Hours");
        assert_contiguous(&resolved.output);
    }

    #[tokio::test]
    async fn test_model_without_phases_falls_back() {
        let raw = r#"{"career": "Pilot", "total_duration": "6 months", "phases": []}"#;
        let policy = with_model(ScriptedModel::replying(raw));
        let resolved = policy
            .resolve(&RoadmapCapability, &request("Pilot"))
            .await
            .unwrap();
        assert_eq!(resolved.path, ResolutionPath::Fallback);
        assert_eq!(resolved.output.phases[0].title, "Explore the Field");
    }

    #[test]
    fn test_response_duplicates_phases() {
        let response = RoadmapResponse::from(roadmap_from_catalog("Developer"));
        assert_eq!(response.phases, response.roadmap.phases);
    }
}
