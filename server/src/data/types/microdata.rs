//! Microdata record rows

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record row from `survey_data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicrodataRow {
    pub data_id: i64,
    pub unit_identifier: Option<String>,
    pub data_payload: Value,
}

/// One page of records with the total number of matches
#[derive(Debug, Clone, PartialEq)]
pub struct MicrodataPage {
    pub records: Vec<MicrodataRow>,
    pub total_count: u64,
}
