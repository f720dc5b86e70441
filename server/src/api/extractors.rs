//! Path and validation extractors for API routes
//!
//! Path segments arrive as raw strings and are validated here, so malformed
//! identifiers produce the structured error body instead of axum's plain-text
//! rejection.

use std::ops::Deref;

use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{FromRequestParts, Path, Query};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Maximum length for unit identifiers
pub const MAX_ID_LENGTH: usize = 256;

/// Parse a positive integer identifier (`survey_id`, `level_id`)
pub fn parse_numeric_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

/// Validate unit identifier length
pub fn is_valid_unit_id(id: &str) -> bool {
    !id.trim().is_empty() && id.len() <= MAX_ID_LENGTH
}

/// Raw path extractor for survey-scoped routes (internal use)
#[derive(Debug, Deserialize)]
struct SurveyPathRaw {
    survey_id: String,
}

/// Validated survey path extractor.
///
/// Returns a 400 Bad Request if `survey_id` is not a positive integer.
#[derive(Debug)]
pub struct SurveyPath {
    pub survey_id: i64,
}

impl<S> FromRequestParts<S> for SurveyPath
where
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<SurveyPathRaw>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Path)?;

        let survey_id =
            parse_numeric_id(&raw.survey_id).ok_or(ValidationRejection::InvalidSurveyId)?;

        Ok(Self { survey_id })
    }
}

// ============================================================================
// Compound Path Extractors
// ============================================================================

/// Raw path extractor for level routes (internal use)
#[derive(Debug, Deserialize)]
struct LevelPathRaw {
    survey_id: String,
    level_id: String,
}

/// Validated survey level path extractor.
#[derive(Debug)]
pub struct LevelPath {
    pub survey_id: i64,
    pub level_id: i64,
}

impl<S> FromRequestParts<S> for LevelPath
where
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<LevelPathRaw>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Path)?;

        let survey_id =
            parse_numeric_id(&raw.survey_id).ok_or(ValidationRejection::InvalidSurveyId)?;
        let level_id =
            parse_numeric_id(&raw.level_id).ok_or(ValidationRejection::InvalidLevelId)?;

        Ok(Self {
            survey_id,
            level_id,
        })
    }
}

/// Raw path extractor for single-record routes (internal use)
#[derive(Debug, Deserialize)]
struct UnitPathRaw {
    survey_id: String,
    level_id: String,
    unit_identifier: String,
}

/// Validated single-record path extractor.
#[derive(Debug)]
pub struct UnitPath {
    pub survey_id: i64,
    pub level_id: i64,
    pub unit_identifier: String,
}

impl<S> FromRequestParts<S> for UnitPath
where
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<UnitPathRaw>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Path)?;

        let survey_id =
            parse_numeric_id(&raw.survey_id).ok_or(ValidationRejection::InvalidSurveyId)?;
        let level_id =
            parse_numeric_id(&raw.level_id).ok_or(ValidationRejection::InvalidLevelId)?;
        if !is_valid_unit_id(&raw.unit_identifier) {
            return Err(ValidationRejection::InvalidUnitId);
        }

        Ok(Self {
            survey_id,
            level_id,
            unit_identifier: raw.unit_identifier,
        })
    }
}

/// Validation rejection with structured error response
#[derive(Debug)]
pub enum ValidationRejection {
    /// Failed to parse path parameters
    Path(PathRejection),
    /// survey_id is not a positive integer
    InvalidSurveyId,
    /// level_id is not a positive integer
    InvalidLevelId,
    /// unit_identifier empty or too long
    InvalidUnitId,
    /// Failed to parse query string
    Query(QueryRejection),
    /// Validation constraints not satisfied
    Validation(validator::ValidationErrors),
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Path(rejection) => (
                StatusCode::BAD_REQUEST,
                "PATH_PARSE_ERROR",
                rejection.body_text(),
            ),
            Self::InvalidSurveyId => (
                StatusCode::BAD_REQUEST,
                "INVALID_SURVEY_ID",
                "Invalid survey_id: must be a positive integer".to_string(),
            ),
            Self::InvalidLevelId => (
                StatusCode::BAD_REQUEST,
                "INVALID_LEVEL_ID",
                "Invalid level_id: must be a positive integer".to_string(),
            ),
            Self::InvalidUnitId => (
                StatusCode::BAD_REQUEST,
                "INVALID_UNIT_IDENTIFIER",
                format!(
                    "Invalid unit_identifier: must be 1-{} characters",
                    MAX_ID_LENGTH
                ),
            ),
            Self::Query(rejection) => (
                StatusCode::BAD_REQUEST,
                "QUERY_PARSE_ERROR",
                rejection.body_text(),
            ),
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format_validation_errors(&errors),
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": "bad_request",
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: validation failed", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Query extractor with automatic validation.
///
/// Deserializes query parameters and validates them using the `validator` crate.
/// Returns a `ValidationRejection` on parse or validation failure.
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<T> Deref for ValidatedQuery<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Query)?;
        value.validate().map_err(ValidationRejection::Validation)?;
        Ok(Self(value))
    }
}
