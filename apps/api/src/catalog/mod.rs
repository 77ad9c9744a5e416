//! Static career dataset and the similarity index built over it.

pub mod careers;
pub mod embedding;

use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::info;

use crate::catalog::careers::CAREERS;
use crate::catalog::embedding::{cosine, HashingEmbedder};

/// Tags reported per match.
const MAX_TAGS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerMatch {
    pub career: String,
    /// Cosine similarity clamped to [0, 1], rounded to 4 decimals.
    pub confidence: f64,
    pub tags: Vec<String>,
}

/// Embeddings of every dataset career, computed on first use and then shared.
///
/// Initialisation runs at most once even under concurrent first access.
pub struct CareerIndex {
    embedder: HashingEmbedder,
    vectors: OnceCell<Vec<Vec<f32>>>,
}

impl Default for CareerIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl CareerIndex {
    pub fn new() -> Self {
        Self {
            embedder: HashingEmbedder::default(),
            vectors: OnceCell::new(),
        }
    }

    pub fn embedder(&self) -> &HashingEmbedder {
        &self.embedder
    }

    async fn vectors(&self) -> &[Vec<f32>] {
        self.vectors
            .get_or_init(|| async {
                let vectors: Vec<Vec<f32>> = CAREERS
                    .iter()
                    .map(|c| self.embedder.embed(&c.matching_text()))
                    .collect();
                info!("Career index built ({} careers)", vectors.len());
                vectors
            })
            .await
    }

    /// Top `k` dataset careers by similarity to `text`, best first.
    pub async fn top_matches(&self, text: &str, k: usize) -> Vec<CareerMatch> {
        let query = self.embedder.embed(text);
        let vectors = self.vectors().await;

        let mut scored: Vec<(usize, f32)> = vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine(&query, v)))
            .collect();
        // Stable sort keeps dataset order among equal scores.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        scored
            .into_iter()
            .take(k)
            .map(|(i, sim)| {
                let career = &CAREERS[i];
                let confidence = (f64::from(sim).clamp(0.0, 1.0) * 10_000.0).round() / 10_000.0;
                CareerMatch {
                    career: career.title.to_string(),
                    confidence,
                    tags: career
                        .skills
                        .iter()
                        .take(MAX_TAGS)
                        .map(|s| s.to_string())
                        .collect(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_top_matches_ranks_relevant_career_first() {
        let index = CareerIndex::new();
        let matches = index
            .top_matches("javascript react node html css web apps", 3)
            .await;
        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].career, "Full Stack Developer");
        assert!(matches.windows(2).all(|w| w[0].confidence >= w[1].confidence));
        assert!(matches
            .iter()
            .all(|m| (0.0..=1.0).contains(&m.confidence) && m.tags.len() <= MAX_TAGS));
    }

    #[tokio::test]
    async fn test_empty_query_scores_zero() {
        let index = CareerIndex::new();
        let matches = index.top_matches("", 3).await;
        assert!(matches.iter().all(|m| m.confidence == 0.0));
    }

    #[tokio::test]
    async fn test_concurrent_first_access_builds_once() {
        let index = Arc::new(CareerIndex::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let index = Arc::clone(&index);
                tokio::spawn(async move { index.vectors().await.as_ptr() as usize })
            })
            .collect();

        let mut ptrs = Vec::new();
        for h in handles {
            ptrs.push(h.await.unwrap());
        }
        assert!(ptrs.windows(2).all(|w| w[0] == w[1]));
    }
}
