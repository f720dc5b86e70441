//! Survey metadata endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::extractors::SurveyPath;
use crate::api::types::ApiError;
use crate::data::SurveyRepository;

use types::{LevelDto, SurveyDto};

/// Shared state for Surveys API endpoints
#[derive(Clone)]
pub struct SurveysApiState {
    pub repository: Arc<dyn SurveyRepository>,
}

/// Build Surveys API routes
pub fn routes(repository: Arc<dyn SurveyRepository>) -> Router<()> {
    let state = SurveysApiState { repository };

    Router::new()
        .route("/", get(list_surveys))
        .route("/{survey_id}/levels", get(list_levels))
        .with_state(state)
}

/// List all surveys, newest year first
#[utoipa::path(
    get,
    path = "/api/v1/surveys",
    tag = "surveys",
    responses(
        (status = 200, description = "All surveys", body = Vec<SurveyDto>)
    )
)]
pub async fn list_surveys(
    State(state): State<SurveysApiState>,
) -> Result<Json<Vec<SurveyDto>>, ApiError> {
    let surveys = state
        .repository
        .list_surveys()
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(surveys.into_iter().map(SurveyDto::from).collect()))
}

/// List the levels of a survey
#[utoipa::path(
    get,
    path = "/api/v1/surveys/{survey_id}/levels",
    tag = "surveys",
    params(
        ("survey_id" = i64, Path, description = "Survey ID")
    ),
    responses(
        (status = 200, description = "Levels ordered by name", body = Vec<LevelDto>),
        (status = 400, description = "Invalid survey ID"),
        (status = 404, description = "Survey not found or has no levels")
    )
)]
pub async fn list_levels(
    State(state): State<SurveysApiState>,
    path: SurveyPath,
) -> Result<Json<Vec<LevelDto>>, ApiError> {
    let levels = state
        .repository
        .list_levels(path.survey_id)
        .await
        .map_err(ApiError::from_data)?;

    if levels.is_empty() {
        return Err(ApiError::not_found(
            "SURVEY_NOT_FOUND",
            "Survey not found or no levels available",
        ));
    }

    Ok(Json(levels.into_iter().map(LevelDto::from).collect()))
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::data::testing::MockRepository;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_list_surveys() {
        let repo = MockRepository::new()
            .with_survey(2, "PLFS", 2023)
            .with_survey(1, "ASI", 2022);
        let (status, body) = get_json(routes(Arc::new(repo)), "/").await;

        assert_eq!(status, StatusCode::OK);
        let surveys = body.as_array().unwrap();
        assert_eq!(surveys.len(), 2);
        assert_eq!(surveys[0]["surveyId"], 2);
        assert_eq!(surveys[0]["surveyName"], "PLFS");
        assert_eq!(surveys[0]["surveyYear"], 2023);
    }

    #[tokio::test]
    async fn test_list_surveys_empty() {
        let (status, body) = get_json(routes(Arc::new(MockRepository::new())), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Array(vec![]));
    }

    #[tokio::test]
    async fn test_list_levels() {
        let repo = MockRepository::new()
            .with_level(1, 2, &["Age", "Gender"])
            .with_level(3, 4, &["Other"]);
        let (status, body) = get_json(routes(Arc::new(repo)), "/1/levels").await;

        assert_eq!(status, StatusCode::OK);
        let levels = body.as_array().unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0]["levelId"], 2);
        assert_eq!(levels[0]["variableCount"], 2);
        assert_eq!(levels[0]["variableSchema"][0]["name"], "Age");
    }

    #[tokio::test]
    async fn test_list_levels_unknown_survey() {
        let (status, body) = get_json(routes(Arc::new(MockRepository::new())), "/7/levels").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "SURVEY_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_list_levels_invalid_id() {
        let (status, body) = get_json(routes(Arc::new(MockRepository::new())), "/abc/levels").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_SURVEY_ID");
    }

    #[tokio::test]
    async fn test_list_surveys_store_failure() {
        let repo = MockRepository {
            fail_metadata: true,
            ..MockRepository::new()
        };
        let (status, body) = get_json(routes(Arc::new(repo)), "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "INTERNAL");
    }
}
