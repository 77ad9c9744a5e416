//! Axum route handlers for the guidance API.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        Multipart, Query, State,
    },
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::CareerMatch;
use crate::errors::AppError;
use crate::guidance::chat::{ChatCapability, ChatReply, ChatRequest};
use crate::guidance::default_user_id;
use crate::guidance::recommend::{RecommendCapability, RecommendRequest, RecommendResponse};
use crate::guidance::resume::{ResumeCapability, ResumeRequest, ResumeResponse};
use crate::guidance::roadmap::{RoadmapCapability, RoadmapRequest, RoadmapResponse};
use crate::models::profile::UserProfile;
use crate::models::resume::ResumeAnalysis;
use crate::state::AppState;

/// Characters of extracted upload text echoed back to the caller.
const SNIPPET_CHARS: usize = 200;

/// Careers returned by `/api/match`.
const MATCH_LIMIT: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResumeResponse {
    pub skills: Vec<String>,
    #[serde(rename = "parsedTextSnippet")]
    pub parsed_text_snippet: String,
    pub analysis: ResumeAnalysis,
}

#[derive(Debug, Deserialize)]
pub struct EmbedRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct EmbedResponse {
    pub embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub user_profile: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub matches: Vec<CareerMatch>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(req) = body?;
    info!(user_id = %req.user_id, "Chat request");
    let resolved = state.policy.resolve(&ChatCapability, &req).await?;
    Ok(Json(resolved.output))
}

/// POST /api/recommend
pub async fn handle_recommend(
    State(state): State<AppState>,
    body: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, AppError> {
    let Json(req) = body?;
    info!(user_id = %req.user_id, "Recommendation request");
    let resolved = state.policy.resolve(&RecommendCapability, &req).await?;
    Ok(Json(RecommendResponse {
        recommendations: resolved.output,
    }))
}

/// POST /api/roadmap
pub async fn handle_roadmap(
    State(state): State<AppState>,
    body: Result<Json<RoadmapRequest>, JsonRejection>,
) -> Result<Json<RoadmapResponse>, AppError> {
    let Json(req) = body?;
    roadmap_for(&state, req).await
}

/// GET /api/roadmap?career_name=…&user_id=…
pub async fn handle_roadmap_query(
    State(state): State<AppState>,
    params: Result<Query<RoadmapRequest>, QueryRejection>,
) -> Result<Json<RoadmapResponse>, AppError> {
    let Query(req) = params?;
    roadmap_for(&state, req).await
}

async fn roadmap_for(state: &AppState, req: RoadmapRequest) -> Result<Json<RoadmapResponse>, AppError> {
    info!(user_id = %req.user_id, career = %req.career_name, "Roadmap request");
    let resolved = state.policy.resolve(&RoadmapCapability, &req).await?;
    Ok(Json(RoadmapResponse::from(resolved.output)))
}

/// POST /api/process_resume
pub async fn handle_process_resume(
    State(state): State<AppState>,
    body: Result<Json<ResumeRequest>, JsonRejection>,
) -> Result<Json<ResumeResponse>, AppError> {
    let Json(req) = body?;
    info!(user_id = %req.user_id, chars = req.resume_text.chars().count(), "Resume analysis request");
    let resolved = state.policy.resolve(&ResumeCapability, &req).await?;
    Ok(Json(ResumeResponse::from(resolved.output)))
}

/// POST /api/upload-resume
///
/// Multipart form with a `file` part (PDF or plain text) and an optional
/// `userId` / `user_id` part.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResumeResponse>, AppError> {
    let mut multipart = multipart?;
    let mut upload: Option<UploadedFile> = None;
    let mut user_id: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_owned);
                let content_type = field.content_type().map(str::to_owned);
                let data = field.bytes().await?;
                upload = Some(UploadedFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            "userId" | "user_id" => {
                let value = field.text().await?;
                if !value.trim().is_empty() {
                    user_id = Some(value.trim().to_string());
                }
            }
            _ => {}
        }
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation("file is required".to_string()))?;
    let resume_text = upload.extract_text().await?;
    let req = ResumeRequest {
        resume_text,
        user_id: user_id.unwrap_or_else(default_user_id),
    };
    info!(
        user_id = %req.user_id,
        file = upload.file_name.as_deref().unwrap_or("<unnamed>"),
        bytes = upload.data.len(),
        "Resume upload"
    );

    let resolved = state.policy.resolve(&ResumeCapability, &req).await?;
    Ok(Json(UploadResumeResponse {
        skills: resolved.output.skills.clone(),
        parsed_text_snippet: snippet(&req.resume_text),
        analysis: resolved.output,
    }))
}

/// POST /api/embed
pub async fn handle_embed(
    State(state): State<AppState>,
    body: Result<Json<EmbedRequest>, JsonRejection>,
) -> Result<Json<EmbedResponse>, AppError> {
    let Json(req) = body?;
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }
    let embedding = state.policy.careers().embedder().embed(&req.text);
    Ok(Json(EmbedResponse { embedding }))
}

/// POST /api/match
pub async fn handle_match(
    State(state): State<AppState>,
    body: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResponse>, AppError> {
    let Json(req) = body?;
    let text = req.user_profile.text_for_matching();
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "user_profile has no matchable attributes".to_string(),
        ));
    }
    let matches = state.policy.careers().top_matches(&text, MATCH_LIMIT).await;
    Ok(Json(MatchResponse { matches }))
}

// ────────────────────────────────────────────────────────────────────────────
// Upload helpers
// ────────────────────────────────────────────────────────────────────────────

struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl UploadedFile {
    fn is_pdf(&self) -> bool {
        self.content_type.as_deref() == Some("application/pdf")
            || self
                .file_name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().ends_with(".pdf"))
            || self.data.starts_with(b"%PDF")
    }

    async fn extract_text(&self) -> Result<String, AppError> {
        if self.data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        if self.is_pdf() {
            // CPU-bound parse: spawn_blocking keeps it off the async executor.
            let data = self.data.clone();
            let extracted = tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_from_mem(&data).map_err(|e| format!("{e:?}"))
            })
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF extraction: {e}"))
            })?;
            return extracted.map_err(|e| {
                warn!(error = %e, "PDF text extraction failed");
                AppError::Validation("Could not extract text from PDF".to_string())
            });
        }
        String::from_utf8(self.data.to_vec())
            .map_err(|_| AppError::Validation("Uploaded file is not UTF-8 text".to_string()))
    }
}

fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(file_name: Option<&str>, content_type: Option<&str>, data: &'static [u8]) -> UploadedFile {
        UploadedFile {
            file_name: file_name.map(str::to_owned),
            content_type: content_type.map(str::to_owned),
            data: Bytes::from_static(data),
        }
    }

    #[test]
    fn test_pdf_detected_by_type_name_or_magic() {
        assert!(upload(None, Some("application/pdf"), b"x").is_pdf());
        assert!(upload(Some("CV.PDF"), None, b"x").is_pdf());
        assert!(upload(None, None, b"%PDF-1.7").is_pdf());
        assert!(!upload(Some("cv.txt"), Some("text/plain"), b"hello").is_pdf());
    }

    #[tokio::test]
    async fn test_plain_text_upload_is_decoded() {
        let text = upload(Some("cv.txt"), Some("text/plain"), b"Python and SQL")
            .extract_text()
            .await
            .unwrap();
        assert_eq!(text, "Python and SQL");
    }

    #[tokio::test]
    async fn test_empty_or_binary_upload_is_rejected() {
        let empty = upload(Some("cv.txt"), None, b"")
            .extract_text()
            .await
            .unwrap_err();
        assert!(matches!(empty, AppError::Validation(_)));
        let binary = upload(Some("cv.bin"), None, &[0xff, 0xfe, 0x00])
            .extract_text()
            .await
            .unwrap_err();
        assert!(matches!(binary, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_an_error_not_a_crash() {
        // A parser panic surfaces as a JoinError and becomes Internal.
        let err = upload(Some("cv.pdf"), Some("application/pdf"), b"%PDF-1.4 truncated")
            .extract_text()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_) | AppError::Internal(_)));
    }

    #[test]
    fn test_snippet_counts_characters_not_bytes() {
        let text = "é".repeat(300);
        assert_eq!(snippet(&text).chars().count(), SNIPPET_CHARS);
        assert_eq!(snippet("short"), "short");
    }
}
