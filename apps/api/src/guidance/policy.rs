//! Adapter policy. Decides, per request, between the model-backed adapter and
//! the deterministic fallback for a capability.
//!
//! Flow: validate → (model configured? → prompt → model call under timeout →
//!       extract + conform) → on any adapter failure, fallback catalog.
//!
//! Only `AppError::Validation` (before adapter selection) and
//! `AppError::Internal` (a broken fallback) ever leave `resolve`.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::CareerIndex;
use crate::config::Config;
use crate::errors::AppError;
use crate::guidance::extractor::ExtractionFailure;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{GeminiClient, LlmError, TextModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    Chat,
    ResumeAnalysis,
    Recommendation,
    Roadmap,
}

impl CapabilityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CapabilityKind::Chat => "chat",
            CapabilityKind::ResumeAnalysis => "resume-analysis",
            CapabilityKind::Recommendation => "recommendation",
            CapabilityKind::Roadmap => "roadmap",
        }
    }
}

/// Which adapter produced a resolved result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    Model,
    Fallback,
}

impl ResolutionPath {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolutionPath::Model => "model",
            ResolutionPath::Fallback => "fallback",
        }
    }
}

#[derive(Debug)]
pub struct Resolved<T> {
    pub output: T,
    pub path: ResolutionPath,
}

/// Why the model-backed adapter could not produce a result. Never leaves the policy.
#[derive(Debug, Error)]
pub enum AdapterFailure {
    #[error("model unavailable: {0}")]
    Unavailable(#[from] LlmError),

    #[error("model call timed out after {0:?}")]
    TimedOut(Duration),

    #[error(transparent)]
    Extraction(#[from] ExtractionFailure),
}

/// One guidance feature, expressed as the pieces the policy needs.
///
/// Implementations are stateless: everything request-specific lives in `Input`.
pub trait Capability: Send + Sync {
    type Input: Send + Sync;
    type Output: Send;

    fn kind(&self) -> CapabilityKind;

    /// Rejects malformed or missing mandatory input before any adapter runs.
    fn validate(&self, input: &Self::Input) -> Result<(), AppError>;

    fn system_prompt(&self) -> &'static str {
        JSON_ONLY_SYSTEM
    }

    fn prompt(&self, input: &Self::Input) -> String;

    /// Turns raw model text into a schema-conformant output.
    fn interpret(&self, raw: &str, input: &Self::Input) -> Result<Self::Output, ExtractionFailure>;

    /// Deterministic answer from the fallback catalog.
    fn fallback(&self, input: &Self::Input) -> Result<Self::Output, AppError>;
}

/// Shared, read-only policy. Held in `AppState` behind an `Arc`.
pub struct AdapterPolicy {
    model: Option<Arc<dyn TextModel>>,
    timeout: Duration,
    careers: CareerIndex,
}

impl AdapterPolicy {
    pub fn new(model: Option<Arc<dyn TextModel>>, timeout: Duration) -> Self {
        Self {
            model,
            timeout,
            careers: CareerIndex::new(),
        }
    }

    /// Builds the policy from configuration. No credential means fallback-only.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let model: Option<Arc<dyn TextModel>> = match &config.gemini_api_key {
            Some(key) => Some(Arc::new(GeminiClient::new(
                key.clone(),
                config.gemini_model.clone(),
                config.gemini_base_url.clone(),
            )?)),
            None => None,
        };
        Ok(Self::new(model, config.model_timeout))
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().map(|m| m.model_name())
    }

    pub fn careers(&self) -> &CareerIndex {
        &self.careers
    }

    /// Resolves `input` for `capability`. Never returns an adapter failure.
    pub async fn resolve<C: Capability>(
        &self,
        capability: &C,
        input: &C::Input,
    ) -> Result<Resolved<C::Output>, AppError> {
        let kind = capability.kind().as_str();
        capability.validate(input)?;

        if let Some(model) = self.model.as_deref() {
            match self.try_model(model, capability, input).await {
                Ok(output) => {
                    info!(
                        capability = kind,
                        path = ResolutionPath::Model.as_str(),
                        "Resolved via model"
                    );
                    return Ok(Resolved {
                        output,
                        path: ResolutionPath::Model,
                    });
                }
                Err(e) => {
                    warn!(capability = kind, error = %e, "Model adapter failed, falling back");
                }
            }
        }

        let output = capability.fallback(input)?;
        info!(
            capability = kind,
            path = ResolutionPath::Fallback.as_str(),
            "Resolved via fallback catalog"
        );
        Ok(Resolved {
            output,
            path: ResolutionPath::Fallback,
        })
    }

    async fn try_model<C: Capability>(
        &self,
        model: &dyn TextModel,
        capability: &C,
        input: &C::Input,
    ) -> Result<C::Output, AdapterFailure> {
        let prompt = capability.prompt(input);
        let raw = tokio::time::timeout(
            self.timeout,
            model.complete(&prompt, capability.system_prompt()),
        )
        .await
        .map_err(|_| AdapterFailure::TimedOut(self.timeout))??;

        Ok(capability.interpret(&raw, input)?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;

    use super::*;

    /// Returns a fixed reply, or a fixed API error.
    pub struct ScriptedModel {
        reply: Result<String, u16>,
    }

    impl ScriptedModel {
        pub fn replying(text: &str) -> Arc<dyn TextModel> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
            })
        }

        pub fn failing(status: u16) -> Arc<dyn TextModel> {
            Arc::new(Self { reply: Err(status) })
        }
    }

    #[async_trait]
    impl TextModel for ScriptedModel {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "scripted failure".to_string(),
                }),
            }
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    /// Never answers within any sane timeout.
    pub struct StalledModel;

    #[async_trait]
    impl TextModel for StalledModel {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("{}".to_string())
        }

        fn model_name(&self) -> &str {
            "stalled"
        }
    }

    pub fn fallback_only() -> AdapterPolicy {
        AdapterPolicy::new(None, Duration::from_secs(5))
    }

    pub fn with_model(model: Arc<dyn TextModel>) -> AdapterPolicy {
        AdapterPolicy::new(Some(model), Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::test_support::*;
    use super::*;
    use crate::guidance::extractor::extract;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Answer {
        value: u32,
    }

    /// Minimal capability: model answers `{"value": n}`, fallback answers 0.
    struct NumberCapability {
        broken_fallback: bool,
    }

    impl Capability for NumberCapability {
        type Input = String;
        type Output = Answer;

        fn kind(&self) -> CapabilityKind {
            CapabilityKind::Chat
        }

        fn validate(&self, input: &String) -> Result<(), AppError> {
            if input.is_empty() {
                return Err(AppError::Validation("input cannot be empty".to_string()));
            }
            Ok(())
        }

        fn prompt(&self, input: &String) -> String {
            format!("give me a number for {input}")
        }

        fn interpret(&self, raw: &str, _input: &String) -> Result<Answer, ExtractionFailure> {
            let answer: Answer = extract(raw)?;
            if answer.value > 100 {
                return Err(ExtractionFailure::Nonconforming("value above 100".to_string()));
            }
            Ok(answer)
        }

        fn fallback(&self, _input: &String) -> Result<Answer, AppError> {
            if self.broken_fallback {
                return Err(AppError::Internal(anyhow::anyhow!("fallback table empty")));
            }
            Ok(Answer { value: 0 })
        }
    }

    const CAP: NumberCapability = NumberCapability {
        broken_fallback: false,
    };

    #[tokio::test]
    async fn test_no_model_uses_fallback() {
        let resolved = fallback_only().resolve(&CAP, &"x".to_string()).await.unwrap();
        assert_eq!(resolved.path, ResolutionPath::Fallback);
        assert_eq!(resolved.output, Answer { value: 0 });
    }

    #[tokio::test]
    async fn test_model_success_is_used() {
        let policy = with_model(ScriptedModel::replying("Here you go: {\"value\": 42}"));
        let resolved = policy.resolve(&CAP, &"x".to_string()).await.unwrap();
        assert_eq!(resolved.path, ResolutionPath::Model);
        assert_eq!(resolved.output, Answer { value: 42 });
    }

    #[tokio::test]
    async fn test_model_error_falls_back() {
        let policy = with_model(ScriptedModel::failing(500));
        let resolved = policy.resolve(&CAP, &"x".to_string()).await.unwrap();
        assert_eq!(resolved.path, ResolutionPath::Fallback);
    }

    #[tokio::test]
    async fn test_unparseable_output_falls_back() {
        let policy = with_model(ScriptedModel::replying("no json here"));
        let resolved = policy.resolve(&CAP, &"x".to_string()).await.unwrap();
        assert_eq!(resolved.path, ResolutionPath::Fallback);
    }

    #[tokio::test]
    async fn test_nonconforming_output_falls_back() {
        let policy = with_model(ScriptedModel::replying("{\"value\": 1000}"));
        let resolved = policy.resolve(&CAP, &"x".to_string()).await.unwrap();
        assert_eq!(resolved.path, ResolutionPath::Fallback);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let policy = AdapterPolicy::new(Some(Arc::new(StalledModel)), Duration::from_secs(2));
        let resolved = policy.resolve(&CAP, &"x".to_string()).await.unwrap();
        assert_eq!(resolved.path, ResolutionPath::Fallback);
    }

    #[tokio::test]
    async fn test_validation_runs_before_model() {
        let policy = with_model(ScriptedModel::replying("{\"value\": 1}"));
        let err = policy.resolve(&CAP, &String::new()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_broken_fallback_is_internal() {
        let cap = NumberCapability {
            broken_fallback: true,
        };
        let err = fallback_only().resolve(&cap, &"x".to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_from_config_without_key_has_no_model() {
        let policy = AdapterPolicy::from_config(&Config::for_tests()).unwrap();
        assert!(policy.model_name().is_none());
    }

    #[test]
    fn test_from_config_with_key_builds_gemini() {
        let mut config = Config::for_tests();
        config.gemini_api_key = Some("key".to_string());
        let policy = AdapterPolicy::from_config(&config).unwrap();
        assert_eq!(policy.model_name(), Some("gemini-1.5-flash"));
    }
}
