//! In-memory repository for unit tests

use std::sync::Mutex;
use std::time::Duration;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Barrier;

use crate::data::error::DataError;
use crate::data::filters::BoundQuery;
use crate::data::traits::SurveyRepository;
use crate::data::types::{LevelRow, MicrodataRow, SurveyRow};

#[derive(Default)]
pub struct MockRepository {
    pub surveys: Vec<SurveyRow>,
    /// (survey_id, level)
    pub levels: Vec<(i64, LevelRow)>,
    pub records: Vec<MicrodataRow>,
    pub total_count: u64,
    pub missing: Vec<String>,
    pub fail_records: bool,
    pub fail_count: bool,
    pub fail_metadata: bool,
    /// When set, data and count queries both wait here before returning
    pub barrier: Option<Barrier>,
    /// Artificial latency of `get_level_schema`
    pub schema_delay: Option<Duration>,
    pub calls: AtomicUsize,
    pub schema_loads: AtomicUsize,
    pub executed: Mutex<Vec<BoundQuery>>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_survey(mut self, survey_id: i64, name: &str, year: i32) -> Self {
        self.surveys.push(SurveyRow {
            survey_id,
            survey_name: name.to_string(),
            survey_year: Some(year),
            description: None,
        });
        self
    }

    pub fn with_level(mut self, survey_id: i64, level_id: i64, variables: &[&str]) -> Self {
        let schema: Vec<Value> = variables
            .iter()
            .map(|name| json!({"name": name, "type": "text"}))
            .collect();
        self.levels.push((
            survey_id,
            LevelRow {
                level_id,
                level_name: format!("Level {}", level_id),
                variable_schema: Value::Array(schema),
                common_identifiers: json!([]),
            },
        ));
        self
    }

    pub fn with_records(mut self, count: usize, total_count: u64) -> Self {
        self.records = (1..=count as i64)
            .map(|i| MicrodataRow {
                data_id: i,
                unit_identifier: Some(format!("U{}", i)),
                data_payload: json!({"AGE": 20 + i, "GENDER": "Male"}),
            })
            .collect();
        self.total_count = total_count;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn executed(&self) -> Vec<BoundQuery> {
        self.executed.lock().unwrap().clone()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn store_error() -> DataError {
        DataError::from_postgres(sqlx::Error::PoolClosed)
    }
}

#[async_trait]
impl SurveyRepository for MockRepository {
    async fn list_surveys(&self) -> Result<Vec<SurveyRow>, DataError> {
        self.record_call();
        if self.fail_metadata {
            return Err(Self::store_error());
        }
        Ok(self.surveys.clone())
    }

    async fn list_levels(&self, survey_id: i64) -> Result<Vec<LevelRow>, DataError> {
        self.record_call();
        if self.fail_metadata {
            return Err(Self::store_error());
        }
        Ok(self
            .levels
            .iter()
            .filter(|(s, _)| *s == survey_id)
            .map(|(_, level)| level.clone())
            .collect())
    }

    async fn get_level_schema(
        &self,
        survey_id: i64,
        level_id: i64,
    ) -> Result<Option<Value>, DataError> {
        self.record_call();
        self.schema_loads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.schema_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_metadata {
            return Err(Self::store_error());
        }
        Ok(self
            .levels
            .iter()
            .find(|(s, level)| *s == survey_id && level.level_id == level_id)
            .map(|(_, level)| level.variable_schema.clone()))
    }

    async fn fetch_records(&self, query: &BoundQuery) -> Result<Vec<MicrodataRow>, DataError> {
        self.record_call();
        self.executed.lock().unwrap().push(query.clone());
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if self.fail_records {
            return Err(Self::store_error());
        }
        Ok(self.records.clone())
    }

    async fn fetch_count(&self, query: &BoundQuery) -> Result<u64, DataError> {
        self.record_call();
        self.executed.lock().unwrap().push(query.clone());
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if self.fail_count {
            return Err(Self::store_error());
        }
        Ok(self.total_count)
    }

    async fn get_record(
        &self,
        _survey_id: i64,
        _level_id: i64,
        unit_identifier: &str,
    ) -> Result<Option<MicrodataRow>, DataError> {
        self.record_call();
        if self.fail_records {
            return Err(Self::store_error());
        }
        Ok(self
            .records
            .iter()
            .find(|r| r.unit_identifier.as_deref() == Some(unit_identifier))
            .cloned())
    }

    async fn ping(&self) -> Result<(), DataError> {
        self.record_call();
        if self.fail_metadata {
            return Err(Self::store_error());
        }
        Ok(())
    }

    async fn missing_tables(&self) -> Result<Vec<String>, DataError> {
        self.record_call();
        Ok(self.missing.clone())
    }
}
