//! Microdata endpoints

pub mod types;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::extractors::{LevelPath, UnitPath, ValidatedQuery};
use crate::api::types::ApiError;
use crate::data::filters::Pagination;
use crate::domain::MicrodataService;

use types::{MicrodataQuery, MicrodataResponse, RecordDto};

/// Shared state for Microdata API endpoints
#[derive(Clone)]
pub struct MicrodataApiState {
    pub service: MicrodataService,
}

/// Build Microdata API routes
pub fn routes(service: MicrodataService) -> Router<()> {
    let state = MicrodataApiState { service };

    Router::new()
        .route("/{survey_id}/{level_id}", get(list_microdata))
        .route("/{survey_id}/{level_id}/{unit_identifier}", get(get_record))
        .with_state(state)
}

/// List microdata records of a survey level with pagination and filtering
#[utoipa::path(
    get,
    path = "/api/v1/data/{survey_id}/{level_id}",
    tag = "data",
    params(
        ("survey_id" = i64, Path, description = "Survey ID"),
        ("level_id" = i64, Path, description = "Level ID"),
        MicrodataQuery
    ),
    responses(
        (status = 200, description = "Page of matching records", body = MicrodataResponse),
        (status = 400, description = "Invalid identifier, pagination or filter"),
        (status = 404, description = "Level not found or no matching records"),
        (status = 500, description = "Store unavailable")
    )
)]
pub async fn list_microdata(
    State(state): State<MicrodataApiState>,
    path: LevelPath,
    ValidatedQuery(query): ValidatedQuery<MicrodataQuery>,
) -> Result<Json<MicrodataResponse>, ApiError> {
    let pagination = Pagination {
        page: query.page,
        limit: query.limit,
    };

    let page = state
        .service
        .query(
            path.survey_id,
            path.level_id,
            query.filter.as_deref(),
            pagination,
        )
        .await?;

    if page.records.is_empty() {
        return Err(ApiError::not_found(
            "NO_DATA_FOUND",
            "No data found for the specified survey and level with current filters",
        ));
    }

    Ok(Json(MicrodataResponse::new(query.page, query.limit, page)))
}

/// Get a single microdata record by unit identifier
#[utoipa::path(
    get,
    path = "/api/v1/data/{survey_id}/{level_id}/{unit_identifier}",
    tag = "data",
    params(
        ("survey_id" = i64, Path, description = "Survey ID"),
        ("level_id" = i64, Path, description = "Level ID"),
        ("unit_identifier" = String, Path, description = "Unit identifier")
    ),
    responses(
        (status = 200, description = "Record", body = RecordDto),
        (status = 400, description = "Invalid identifier"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn get_record(
    State(state): State<MicrodataApiState>,
    path: UnitPath,
) -> Result<Json<RecordDto>, ApiError> {
    let record = state
        .service
        .get_record(path.survey_id, path.level_id, &path.unit_identifier)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(
                "RECORD_NOT_FOUND",
                "Record not found for the specified unit identifier",
            )
        })?;

    Ok(Json(RecordDto::from(record)))
}
