use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Failure of one criteria generation call, tagged by pipeline stage.
#[derive(Debug, Error)]
pub enum CriteriaError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Generation error: {0}")]
    Generation(#[from] LlmError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// The model response did not contain a usable JSON array.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("No JSON array found in response: missing '['")]
    MissingOpenBracket,

    #[error("No JSON array found in response: missing ']'")]
    MissingCloseBracket,

    #[error("Invalid JSON format: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Unreachable through `extract_json_array`, whose span always opens with `[`;
    /// kept so every documented failure of the extractor has a name.
    #[error("Response is not a JSON array")]
    NotAnArray,
}

/// Input or output rejected by a schema check. `index` is always 1-based.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    EmptyInput { field: &'static str },

    #[error("No criteria generated")]
    NoCriteria,

    #[error("Criterion {index} is not an object")]
    NotAnObject { index: usize },

    #[error("Missing '{field}' in criterion {index}")]
    MissingField { index: usize, field: &'static str },

    #[error("Invalid '{field}' in criterion {index}: {reason}")]
    InvalidField {
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("Invalid {field} value in criterion {index}: {value}")]
    InvalidValue {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("Weight must end with '%' in criterion {index}: {value}")]
    WeightMissingPercent { index: usize, value: String },

    #[error("Invalid weight format in criterion {index}: {value}")]
    WeightNotNumeric { index: usize, value: String },

    #[error("Weight must be between 0-100% in criterion {index}: {value}")]
    WeightOutOfRange { index: usize, value: String },
}

impl ValidationError {
    /// 1-based position of the offending criterion, if the error is about one.
    pub fn index(&self) -> Option<usize> {
        match self {
            ValidationError::EmptyInput { .. } | ValidationError::NoCriteria => None,
            ValidationError::NotAnObject { index }
            | ValidationError::MissingField { index, .. }
            | ValidationError::InvalidField { index, .. }
            | ValidationError::InvalidValue { index, .. }
            | ValidationError::WeightMissingPercent { index, .. }
            | ValidationError::WeightNotNumeric { index, .. }
            | ValidationError::WeightOutOfRange { index, .. } => Some(*index),
        }
    }

    /// Name of the offending field, if the error is about one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::EmptyInput { field }
            | ValidationError::MissingField { field, .. }
            | ValidationError::InvalidField { field, .. }
            | ValidationError::InvalidValue { field, .. } => Some(*field),
            ValidationError::WeightMissingPercent { .. }
            | ValidationError::WeightNotNumeric { .. }
            | ValidationError::WeightOutOfRange { .. } => Some("weight"),
            ValidationError::NoCriteria | ValidationError::NotAnObject { .. } => None,
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    /// A criteria set that failed the schema checks. `status` tells a bad
    /// caller-supplied set (400) apart from a bad model answer (422).
    #[error("Invalid criteria: {error}")]
    InvalidCriteria {
        status: StatusCode,
        error: ValidationError,
    },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Generation timed out after {0}s")]
    Timeout(u64),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<CriteriaError> for AppError {
    fn from(err: CriteriaError) -> Self {
        match err {
            CriteriaError::Configuration(msg) => AppError::Configuration(msg),
            // Bad input is the caller's fault; a bad model answer is not.
            CriteriaError::Validation(e @ ValidationError::EmptyInput { .. }) => {
                AppError::Validation(e.to_string())
            }
            CriteriaError::Validation(error) => AppError::InvalidCriteria {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error,
            },
            CriteriaError::Parse(e) => AppError::UnprocessableEntity(e.to_string()),
            CriteriaError::Generation(e) => AppError::Llm(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::InvalidCriteria { status, error } => {
                let code = if *status == StatusCode::BAD_REQUEST {
                    "VALIDATION_ERROR"
                } else {
                    "UNPROCESSABLE_ENTITY"
                };
                (*status, code, error.to_string())
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    format!("Error generating criteria: {msg}"),
                )
            }
            AppError::Timeout(secs) => {
                tracing::error!("Generation timed out after {secs}s");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "TIMEOUT",
                    format!("Generation did not finish within {secs}s"),
                )
            }
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        // Point the caller at the offending criterion and field.
        if let AppError::InvalidCriteria { error: cause, .. } = &self {
            error["index"] = json!(cause.index());
            error["field"] = json!(cause.field());
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_names_index_and_field() {
        let err = ValidationError::MissingField {
            index: 1,
            field: "description",
        };
        assert_eq!(err.to_string(), "Missing 'description' in criterion 1");
        assert_eq!(err.index(), Some(1));
        assert_eq!(err.field(), Some("description"));
    }

    #[test]
    fn test_weight_errors_report_weight_field() {
        let err = ValidationError::WeightOutOfRange {
            index: 3,
            value: "140%".to_string(),
        };
        assert_eq!(err.field(), Some("weight"));
        assert_eq!(err.index(), Some(3));
    }

    #[test]
    fn test_stage_prefix_in_criteria_error() {
        let err = CriteriaError::from(ParseError::NotAnArray);
        assert_eq!(err.to_string(), "Parse error: Response is not a JSON array");
    }

    #[test]
    fn test_input_validation_maps_to_bad_request() {
        let err = AppError::from(CriteriaError::from(ValidationError::EmptyInput {
            field: "Job role",
        }));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_output_validation_maps_to_unprocessable() {
        let err = AppError::from(CriteriaError::from(ValidationError::NoCriteria));
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn test_invalid_criteria_body_names_index_and_field() {
        let response = AppError::from(CriteriaError::from(ValidationError::InvalidValue {
            index: 2,
            field: "must_have",
            value: "yes".to_string(),
        }))
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
        assert_eq!(body["error"]["index"], 2);
        assert_eq!(body["error"]["field"], "must_have");
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        assert_eq!(
            AppError::Timeout(5).into_response().status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn test_generation_failure_maps_to_bad_gateway() {
        let err = AppError::from(CriteriaError::from(LlmError::EmptyContent));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
