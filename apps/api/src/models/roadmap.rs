use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    /// 1-based position of the phase in its roadmap. Optional on input; it is
    /// reassigned from position anyway.
    #[serde(default)]
    pub phase: u32,
    pub title: String,
    pub duration: String,
    pub skills: Vec<String>,
    pub projects: Vec<String>,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    pub career: String,
    pub total_duration: String,
    pub phases: Vec<RoadmapPhase>,
}

impl Roadmap {
    /// Rewrites phase indices to 1..=n in their current order.
    pub fn renumber(mut self) -> Self {
        for (i, phase) in self.phases.iter_mut().enumerate() {
            phase.phase = i as u32 + 1;
        }
        self
    }
}
