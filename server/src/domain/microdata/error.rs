use thiserror::Error;

use crate::data::DataError;
use crate::data::filters::FilterError;

#[derive(Error, Debug)]
pub enum MicrodataError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("Level {level_id} not found in survey {survey_id}")]
    LevelNotFound { survey_id: i64, level_id: i64 },

    #[error("Store unavailable during {operation}: {source}")]
    StoreUnavailable {
        operation: &'static str,
        #[source]
        source: DataError,
    },
}

impl MicrodataError {
    pub fn store(operation: &'static str, source: DataError) -> Self {
        Self::StoreUnavailable { operation, source }
    }
}
