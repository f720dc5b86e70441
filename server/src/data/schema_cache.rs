//! Level field-schema cache
//!
//! Keeps the resolved [`PayloadFields`] allow-list per `(survey_id, level_id)`
//! so filtered requests do not reload `variable_schema` every time. Missing
//! levels are not cached, so a level ingested later becomes visible at once.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::core::config::CacheConfig;
use crate::data::error::DataError;
use crate::data::filters::PayloadFields;
use crate::data::traits::SurveyRepository;

type LevelKey = (i64, i64);

#[derive(Debug, Clone)]
pub struct LevelSchemaCache {
    /// `None` when caching is disabled (TTL 0)
    cache: Option<Cache<LevelKey, Arc<PayloadFields>>>,
}

impl LevelSchemaCache {
    pub fn new(config: &CacheConfig) -> Self {
        if config.schema_ttl_secs == 0 {
            tracing::debug!("Level schema cache disabled");
            return Self::disabled();
        }
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(Duration::from_secs(config.schema_ttl_secs))
            .build();
        Self { cache: Some(cache) }
    }

    pub fn disabled() -> Self {
        Self { cache: None }
    }

    /// Resolve the allow-list of a level, loading it from the store on a miss.
    ///
    /// Concurrent misses on one level share a single load. Returns `None`
    /// when the level does not exist in the survey.
    pub async fn get_or_load(
        &self,
        repo: &dyn SurveyRepository,
        survey_id: i64,
        level_id: i64,
    ) -> Result<Option<Arc<PayloadFields>>, DataError> {
        let Some(cache) = &self.cache else {
            return load_fields(repo, survey_id, level_id).await;
        };

        let loaded = cache
            .try_get_with((survey_id, level_id), async {
                load_fields(repo, survey_id, level_id)
                    .await
                    .map_err(LoadError::Store)?
                    .ok_or(LoadError::Missing)
            })
            .await;

        match loaded {
            Ok(fields) => Ok(Some(fields)),
            Err(err) => match Arc::try_unwrap(err) {
                Ok(LoadError::Missing) => Ok(None),
                Ok(LoadError::Store(e)) => Err(e),
                // Another waiter still holds the failed load
                Err(shared) => match shared.as_ref() {
                    LoadError::Missing => Ok(None),
                    LoadError::Store(e) => Err(DataError::Coalesced(e.to_string())),
                },
            },
        }
    }
}

/// Failure of a cache fill. `Missing` keeps absent levels out of the cache.
#[derive(Debug)]
enum LoadError {
    Missing,
    Store(DataError),
}

async fn load_fields(
    repo: &dyn SurveyRepository,
    survey_id: i64,
    level_id: i64,
) -> Result<Option<Arc<PayloadFields>>, DataError> {
    let Some(schema) = repo.get_level_schema(survey_id, level_id).await? else {
        return Ok(None);
    };
    let fields = PayloadFields::from_variable_schema(&schema);
    if fields.is_empty() {
        tracing::warn!(
            survey_id,
            level_id,
            "Level declares no variables; every filter field will be rejected"
        );
    }
    Ok(Some(Arc::new(fields)))
}
