//! Health check endpoint

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::SurveyRepository;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    /// Required tables not present in the database
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_tables: Vec<String>,
}

/// Health check endpoint
///
/// `ok` when the database answers and every table exists, `degraded` when
/// tables are missing, 503 when the database is unreachable.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health(State(repository): State<Arc<dyn SurveyRepository>>) -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");

    if let Err(e) = repository.ping().await {
        tracing::warn!(error = %e, "Health check: database unreachable");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unavailable",
                version,
                database: "unreachable",
                missing_tables: Vec::new(),
            }),
        );
    }

    let missing_tables = repository.missing_tables().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Health check: table lookup failed");
        Vec::new()
    });
    let status = if missing_tables.is_empty() {
        "ok"
    } else {
        "degraded"
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status,
            version,
            database: "connected",
            missing_tables,
        }),
    )
}
