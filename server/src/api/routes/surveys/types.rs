//! Survey API types

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::data::types::{LevelRow, SurveyRow};

/// Survey DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDto {
    pub survey_id: i64,
    pub survey_name: String,
    pub survey_year: Option<i32>,
    pub description: Option<String>,
}

impl From<SurveyRow> for SurveyDto {
    fn from(row: SurveyRow) -> Self {
        Self {
            survey_id: row.survey_id,
            survey_name: row.survey_name,
            survey_year: row.survey_year,
            description: row.description,
        }
    }
}

/// Survey level DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LevelDto {
    pub level_id: i64,
    pub level_name: String,
    /// Declared variables as stored (`[{"name", "type", "description"}, ...]`)
    #[schema(value_type = Object)]
    pub variable_schema: Value,
    #[schema(value_type = Object)]
    pub common_identifiers: Value,
    /// Number of named variables usable in filters
    pub variable_count: usize,
}

impl From<LevelRow> for LevelDto {
    fn from(row: LevelRow) -> Self {
        let variable_count = row.variables().len();
        Self {
            level_id: row.level_id,
            level_name: row.level_name,
            variable_schema: row.variable_schema,
            common_identifiers: row.common_identifiers,
            variable_count,
        }
    }
}
