//! Criteria Generation — orchestrates one request/response cycle.
//!
//! Flow: build_criteria_prompt → model.complete → extract_json_array →
//!       validate_criteria → CriteriaSet.
//!
//! Any stage failure aborts the call and is returned unchanged. Nothing is
//! retried and nothing is remembered between calls.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::criteria::extractor::extract_json_array;
use crate::criteria::models::CriteriaSet;
use crate::criteria::prompts::build_criteria_prompt;
use crate::criteria::validation::validate_criteria;
use crate::errors::CriteriaError;
use crate::llm_client::{GeminiClient, ModelClient};

/// How far the weight total may drift from 100% before it is worth a warning.
const WEIGHT_TOTAL_TOLERANCE: f64 = 10.0;

/// Turns a job description into a validated `CriteriaSet` via the model.
#[derive(Clone)]
pub struct CriteriaGenerator {
    model: Arc<dyn ModelClient>,
}

impl std::fmt::Debug for CriteriaGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CriteriaGenerator").finish_non_exhaustive()
    }
}

impl CriteriaGenerator {
    /// Builds a generator backed by Gemini. Fails fast with
    /// `CriteriaError::Configuration` when no credential is configured.
    pub fn new(config: &Config) -> Result<Self, CriteriaError> {
        let client = GeminiClient::new(config.gemini_api_key.clone())?;
        Ok(Self::with_model(Arc::new(client)))
    }

    /// Builds a generator around any model client.
    pub fn with_model(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    /// Runs prompt → model → extraction → validation for one job description.
    ///
    /// Every call invokes the model again; identical inputs may yield different sets.
    pub async fn generate(
        &self,
        job_role: &str,
        jd_text: &str,
        user_guidance: &str,
    ) -> Result<CriteriaSet, CriteriaError> {
        // Step 1: Prompt (rejects empty role / description before any remote call)
        let prompt = build_criteria_prompt(job_role, jd_text, user_guidance)?;
        info!("Generating selection criteria for role '{}'", job_role.trim());

        // Step 2: Model call
        let raw = self.model.complete(&prompt).await?;
        debug!(response_len = raw.len(), "Model responded");

        // Step 3: Extract the JSON array from the answer
        let values = extract_json_array(&raw)?;

        // Step 4: Schema validation
        let criteria = validate_criteria(values)?;

        let total_weight = criteria.total_weight();
        if (total_weight - 100.0).abs() > WEIGHT_TOTAL_TOLERANCE {
            warn!(
                "Criteria weights total {:.1}% for role '{}', expected about 100%",
                total_weight,
                job_role.trim()
            );
        }
        info!(
            "Generated {} criteria (total weight {:.1}%)",
            criteria.len(),
            total_weight
        );

        Ok(criteria)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{ScriptedModel, BACKEND_ANSWER};
    use super::*;
    use crate::criteria::formatter::to_json_export;
    use crate::errors::{ParseError, ValidationError};
    use crate::llm_client::LlmError;

    const ROLE: &str = "Senior Backend Engineer";
    const JD: &str = "5+ years Go, distributed systems, on-call rotation";

    fn generator(model: &Arc<ScriptedModel>) -> CriteriaGenerator {
        CriteriaGenerator::with_model(model.clone())
    }

    #[tokio::test]
    async fn test_end_to_end_backend_engineer() {
        let model = Arc::new(ScriptedModel::answering(BACKEND_ANSWER));
        let criteria = generator(&model).generate(ROLE, JD, "").await.unwrap();

        assert_eq!(criteria.len(), 4);
        for c in &criteria {
            assert!(!c.name.trim().is_empty());
            assert!(!c.description.trim().is_empty());
            assert!((0.0..=100.0).contains(&c.weight.percent()));
        }

        let exported = to_json_export(&criteria).unwrap();
        let reparsed = validate_criteria(serde_json::from_str(&exported).unwrap()).unwrap();
        assert_eq!(reparsed, criteria);
    }

    #[tokio::test]
    async fn test_prompt_sent_to_model_embeds_inputs() {
        let model = Arc::new(ScriptedModel::answering(BACKEND_ANSWER));
        generator(&model)
            .generate(ROLE, JD, "Prefer fintech exposure")
            .await
            .unwrap();

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(JD));
        assert!(prompts[0].contains("Prefer fintech exposure"));
    }

    #[tokio::test]
    async fn test_empty_input_never_reaches_model() {
        let model = Arc::new(ScriptedModel::answering(BACKEND_ANSWER));
        let err = generator(&model).generate(ROLE, "   ", "").await.unwrap_err();

        assert!(matches!(
            err,
            CriteriaError::Validation(ValidationError::EmptyInput { .. })
        ));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_model_failure_propagates_as_generation_error() {
        let model = Arc::new(ScriptedModel::new(vec![Err(LlmError::Api {
            status: 429,
            message: "Quota exceeded".to_string(),
        })]));
        let err = generator(&model).generate(ROLE, JD, "").await.unwrap_err();

        assert!(matches!(
            err,
            CriteriaError::Generation(LlmError::Api { status: 429, .. })
        ));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_prose_only_answer_is_parse_error() {
        let model = Arc::new(ScriptedModel::answering("Sorry, I cannot help with that."));
        let err = generator(&model).generate(ROLE, JD, "").await.unwrap_err();
        assert!(matches!(
            err,
            CriteriaError::Parse(ParseError::MissingOpenBracket)
        ));
    }

    #[tokio::test]
    async fn test_schema_violation_aborts_without_partial_result() {
        let answer = r#"[
            {"name": "Go", "must_have": "Yes", "weight": "50%", "description": "Go services"},
            {"name": "SQL", "must_have": "Often", "weight": "50%", "description": "Postgres"}
        ]"#;
        let model = Arc::new(ScriptedModel::answering(answer));
        let err = generator(&model).generate(ROLE, JD, "").await.unwrap_err();

        match err {
            CriteriaError::Validation(e) => {
                assert_eq!(e.index(), Some(2));
                assert_eq!(e.field(), Some("must_have"));
                assert!(e.to_string().contains("Often"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_array_answer_rejected() {
        let model = Arc::new(ScriptedModel::answering("[]"));
        let err = generator(&model).generate(ROLE, JD, "").await.unwrap_err();
        assert!(matches!(
            err,
            CriteriaError::Validation(ValidationError::NoCriteria)
        ));
    }

    #[tokio::test]
    async fn test_repeated_calls_invoke_model_each_time() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(BACKEND_ANSWER.to_string()),
            Ok(r#"[{"name": "Go", "must_have": "Yes", "weight": "100%", "description": "Go"}]"#
                .to_string()),
        ]));
        let generator = generator(&model);

        let first = generator.generate(ROLE, JD, "").await.unwrap();
        let second = generator.generate(ROLE, JD, "").await.unwrap();

        assert_eq!(model.calls(), 2);
        assert_eq!(first.len(), 4);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_missing_credential_fails_at_construction() {
        let err = CriteriaGenerator::new(&Config::with_api_key(None)).unwrap_err();
        assert!(matches!(err, CriteriaError::Configuration(_)));

        let err = CriteriaGenerator::new(&Config::with_api_key(Some("  ".to_string())))
            .unwrap_err();
        assert!(matches!(err, CriteriaError::Configuration(_)));
    }

    #[test]
    fn test_debug_output_hides_model_internals() {
        let generator =
            CriteriaGenerator::new(&Config::with_api_key(Some("secret-key".to_string()))).unwrap();
        let rendered = format!("{generator:?}");
        assert!(rendered.starts_with("CriteriaGenerator"));
        assert!(!rendered.contains("secret-key"));
    }

    #[test]
    fn test_explicit_credential_constructs() {
        assert!(CriteriaGenerator::new(&Config::with_api_key(Some("k".to_string()))).is_ok());
    }
}
