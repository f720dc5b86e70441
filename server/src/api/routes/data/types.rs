//! Microdata API types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::types::{default_limit, default_page, total_pages, validate_limit, validate_page};
use crate::data::types::{MicrodataPage, MicrodataRow};

/// Query params for listing microdata
#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct MicrodataQuery {
    #[serde(default = "default_page")]
    #[validate(custom(function = "validate_page"))]
    pub page: u32,

    #[serde(default = "default_limit")]
    #[validate(custom(function = "validate_limit"))]
    pub limit: u32,

    /// JSON object keyed by field, e.g. `{"Age": {">": 25}, "Gender": "Male"}`
    pub filter: Option<String>,
}

/// Microdata record DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordDto {
    pub data_id: i64,
    pub unit_identifier: Option<String>,
    #[schema(value_type = Object)]
    pub payload: Value,
}

impl From<MicrodataRow> for RecordDto {
    fn from(row: MicrodataRow) -> Self {
        Self {
            data_id: row.data_id,
            unit_identifier: row.unit_identifier,
            payload: row.data_payload,
        }
    }
}

/// Paginated microdata envelope
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MicrodataResponse {
    pub page: u32,
    pub limit: u32,
    pub total_count: u64,
    pub total_pages: u64,
    pub data: Vec<RecordDto>,
}

impl MicrodataResponse {
    pub fn new(page: u32, limit: u32, result: MicrodataPage) -> Self {
        Self {
            page,
            limit,
            total_count: result.total_count,
            total_pages: total_pages(result.total_count, limit),
            data: result.records.into_iter().map(RecordDto::from).collect(),
        }
    }
}
