//! Axum route handlers for the Criteria API.

use std::time::Duration;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::criteria::formatter::{format_for_display, summarize, to_json_export, CriteriaSummary};
use crate::criteria::models::CriteriaSet;
use crate::criteria::validation::validate_criteria;
use crate::errors::AppError;
use crate::state::AppState;

pub const JSON_EXPORT_FILENAME: &str = "selection_criteria.json";
pub const TEXT_EXPORT_FILENAME: &str = "selection_criteria.txt";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateCriteriaRequest {
    pub job_role: String,
    pub jd_text: String,
    #[serde(default)]
    pub user_guidance: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateCriteriaResponse {
    pub generation_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub criteria: CriteriaSet,
    pub summary: CriteriaSummary,
    pub formatted: String,
}

/// Body for the endpoints that render a set the caller already holds.
/// The criteria are re-validated, so a hand-edited set is held to the same schema.
#[derive(Debug, Deserialize)]
pub struct CriteriaPayload {
    pub criteria: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct FormatCriteriaResponse {
    pub formatted: String,
    pub summary: CriteriaSummary,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/criteria/generate
///
/// Full pipeline: prompt → Gemini → JSON extraction → schema validation.
/// Bounded by `GENERATION_TIMEOUT_SECS`; the core itself sets no timeout.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateCriteriaRequest>,
) -> Result<Json<GenerateCriteriaResponse>, AppError> {
    let generation_id = Uuid::new_v4();
    let timeout_secs = state.config.generation_timeout_secs;

    let generation = state
        .generator
        .generate(&request.job_role, &request.jd_text, &request.user_guidance)
        .instrument(tracing::info_span!("generate_criteria", %generation_id));

    let criteria = tokio::time::timeout(Duration::from_secs(timeout_secs), generation)
        .await
        .map_err(|_| AppError::Timeout(timeout_secs))??;

    Ok(Json(GenerateCriteriaResponse {
        generation_id,
        generated_at: Utc::now(),
        summary: summarize(&criteria),
        formatted: format_for_display(&criteria),
        criteria,
    }))
}

/// POST /api/v1/criteria/format
///
/// Renders a previously generated set as display text plus summary counts.
pub async fn handle_format(
    Json(payload): Json<CriteriaPayload>,
) -> Result<Json<FormatCriteriaResponse>, AppError> {
    let criteria = revalidate(payload)?;

    Ok(Json(FormatCriteriaResponse {
        formatted: format_for_display(&criteria),
        summary: summarize(&criteria),
    }))
}

/// POST /api/v1/criteria/export/json
///
/// Downloadable JSON file: pretty-printed array in canonical field order.
pub async fn handle_export_json(
    Json(payload): Json<CriteriaPayload>,
) -> Result<Response, AppError> {
    let criteria = revalidate(payload)?;
    let body = to_json_export(&criteria)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize criteria: {e}")))?;

    Ok(attachment("application/json", JSON_EXPORT_FILENAME, body))
}

/// POST /api/v1/criteria/export/text
///
/// Downloadable text file with the human-readable rendering.
pub async fn handle_export_text(
    Json(payload): Json<CriteriaPayload>,
) -> Result<Response, AppError> {
    let criteria = revalidate(payload)?;

    Ok(attachment(
        "text/plain; charset=utf-8",
        TEXT_EXPORT_FILENAME,
        format_for_display(&criteria),
    ))
}

fn revalidate(payload: CriteriaPayload) -> Result<CriteriaSet, AppError> {
    validate_criteria(payload.criteria).map_err(|error| AppError::InvalidCriteria {
        status: StatusCode::BAD_REQUEST,
        error,
    })
}

fn attachment(content_type: &'static str, filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}
