//! Repository traits for the store
//!
//! The HTTP layer and the microdata service depend on [`SurveyRepository`]
//! rather than on a concrete pool, so handlers can be exercised against an
//! in-memory store.

use async_trait::async_trait;
use serde_json::Value;

use crate::data::error::DataError;
use crate::data::filters::BoundQuery;
use crate::data::types::{LevelRow, MicrodataRow, SurveyRow};

/// Read-only access to survey metadata and microdata records
#[async_trait]
pub trait SurveyRepository: Send + Sync {
    // ==================== Metadata ====================

    /// List all surveys, newest year first then by name
    async fn list_surveys(&self) -> Result<Vec<SurveyRow>, DataError>;

    /// List the levels of a survey ordered by name
    async fn list_levels(&self, survey_id: i64) -> Result<Vec<LevelRow>, DataError>;

    /// Declared `variable_schema` of a level, `None` when the level does not exist
    async fn get_level_schema(
        &self,
        survey_id: i64,
        level_id: i64,
    ) -> Result<Option<Value>, DataError>;

    // ==================== Microdata ====================

    /// Run a bounded data query built by the query builder
    async fn fetch_records(&self, query: &BoundQuery) -> Result<Vec<MicrodataRow>, DataError>;

    /// Run a count query built by the query builder
    async fn fetch_count(&self, query: &BoundQuery) -> Result<u64, DataError>;

    /// Get a single record by its unit identifier
    async fn get_record(
        &self,
        survey_id: i64,
        level_id: i64,
        unit_identifier: &str,
    ) -> Result<Option<MicrodataRow>, DataError>;

    // ==================== Health ====================

    /// Round-trip a trivial statement
    async fn ping(&self) -> Result<(), DataError>;

    /// Required tables absent from the connected database
    async fn missing_tables(&self) -> Result<Vec<String>, DataError>;
}
