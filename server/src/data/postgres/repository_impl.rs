//! SurveyRepository trait implementation for PostgreSQL

use async_trait::async_trait;
use serde_json::Value;

use crate::data::error::DataError;
use crate::data::filters::BoundQuery;
use crate::data::traits::SurveyRepository;
use crate::data::types::{LevelRow, MicrodataRow, SurveyRow};

use super::PostgresService;
use super::repositories::{level, microdata, survey};

#[async_trait]
impl SurveyRepository for PostgresService {
    // ==================== Metadata ====================

    async fn list_surveys(&self) -> Result<Vec<SurveyRow>, DataError> {
        survey::list_surveys(self.pool()).await.map_err(Into::into)
    }

    async fn list_levels(&self, survey_id: i64) -> Result<Vec<LevelRow>, DataError> {
        level::list_levels(self.pool(), survey_id)
            .await
            .map_err(Into::into)
    }

    async fn get_level_schema(
        &self,
        survey_id: i64,
        level_id: i64,
    ) -> Result<Option<Value>, DataError> {
        level::get_variable_schema(self.pool(), survey_id, level_id)
            .await
            .map_err(Into::into)
    }

    // ==================== Microdata ====================

    async fn fetch_records(&self, query: &BoundQuery) -> Result<Vec<MicrodataRow>, DataError> {
        microdata::fetch_records(self.pool(), query)
            .await
            .map_err(Into::into)
    }

    async fn fetch_count(&self, query: &BoundQuery) -> Result<u64, DataError> {
        microdata::fetch_count(self.pool(), query)
            .await
            .map_err(Into::into)
    }

    async fn get_record(
        &self,
        survey_id: i64,
        level_id: i64,
        unit_identifier: &str,
    ) -> Result<Option<MicrodataRow>, DataError> {
        microdata::get_record(self.pool(), survey_id, level_id, unit_identifier)
            .await
            .map_err(Into::into)
    }

    // ==================== Health ====================

    async fn ping(&self) -> Result<(), DataError> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .map(|_| ())
            .map_err(DataError::from_postgres)
    }

    async fn missing_tables(&self) -> Result<Vec<String>, DataError> {
        self.find_missing_tables().await.map_err(Into::into)
    }
}
