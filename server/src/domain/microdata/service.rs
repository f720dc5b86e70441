use std::sync::Arc;

use crate::data::filters::{
    CompiledFilter, FIRST_FILTER_PARAM, Pagination, build_query_pair, compile, parse_filter,
};
use crate::data::types::{MicrodataPage, MicrodataRow};
use crate::data::{LevelSchemaCache, SurveyRepository};

use super::error::MicrodataError;
use super::executor::fetch_page;

/// Filtered, paginated access to a survey level's records
#[derive(Clone)]
pub struct MicrodataService {
    repo: Arc<dyn SurveyRepository>,
    schemas: LevelSchemaCache,
}

impl MicrodataService {
    pub fn new(repo: Arc<dyn SurveyRepository>, schemas: LevelSchemaCache) -> Self {
        Self { repo, schemas }
    }

    /// Fetch one page of records matching `filter`.
    ///
    /// Filter errors are raised before the store is queried for records. The
    /// level schema is only consulted when the filter has predicates.
    pub async fn query(
        &self,
        survey_id: i64,
        level_id: i64,
        filter: Option<&str>,
        pagination: Pagination,
    ) -> Result<MicrodataPage, MicrodataError> {
        let predicates = parse_filter(filter)?;

        let compiled = if predicates.is_empty() {
            CompiledFilter::empty(FIRST_FILTER_PARAM)
        } else {
            let fields = self
                .schemas
                .get_or_load(self.repo.as_ref(), survey_id, level_id)
                .await
                .map_err(|e| MicrodataError::store("level schema lookup", e))?
                .ok_or(MicrodataError::LevelNotFound {
                    survey_id,
                    level_id,
                })?;
            compile(&predicates, &fields, FIRST_FILTER_PARAM)?
        };

        tracing::debug!(
            survey_id,
            level_id,
            predicates = compiled.fragments.len(),
            page = pagination.page,
            limit = pagination.limit,
            "Querying microdata"
        );

        let pair = build_query_pair(survey_id, level_id, &compiled, pagination);
        fetch_page(self.repo.as_ref(), &pair).await
    }

    /// Fetch a single record by unit identifier
    pub async fn get_record(
        &self,
        survey_id: i64,
        level_id: i64,
        unit_identifier: &str,
    ) -> Result<Option<MicrodataRow>, MicrodataError> {
        self.repo
            .get_record(survey_id, level_id, unit_identifier)
            .await
            .map_err(|e| MicrodataError::store("record lookup", e))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::data::filters::{FilterError, QueryParam};
    use crate::data::testing::MockRepository;

    fn service(repo: MockRepository) -> (MicrodataService, Arc<MockRepository>) {
        let repo = Arc::new(repo);
        let service = MicrodataService::new(repo.clone(), LevelSchemaCache::disabled());
        (service, repo)
    }

    const PAGE_ONE: Pagination = Pagination { page: 1, limit: 10 };

    #[tokio::test]
    async fn test_query_age_filter() {
        let (service, repo) = service(
            MockRepository::new()
                .with_level(1, 2, &["Age", "Gender"])
                .with_records(2, 2),
        );

        let page = service
            .query(1, 2, Some(r#"{"Age": {">": 25}}"#), PAGE_ONE)
            .await
            .unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.total_count, 2);

        let executed = repo.executed();
        let data = executed
            .iter()
            .find(|q| q.sql.contains("LIMIT"))
            .unwrap();
        assert!(data.sql.contains("(data_payload->>'AGE')::numeric > $3::numeric"));
        assert_eq!(
            data.params,
            vec![
                QueryParam::Int(1),
                QueryParam::Int(2),
                QueryParam::Numeric("25".to_string()),
                QueryParam::Int(10),
                QueryParam::Int(0),
            ]
        );
    }

    #[tokio::test]
    async fn test_query_empty_filter_skips_schema_lookup() {
        let (service, repo) = service(MockRepository::new().with_records(1, 1));
        service.query(1, 2, None, PAGE_ONE).await.unwrap();
        service.query(1, 2, Some("{}"), PAGE_ONE).await.unwrap();
        assert_eq!(repo.schema_loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_query_invalid_json_never_touches_store() {
        let (service, repo) = service(MockRepository::new().with_level(1, 2, &["Age"]));
        let err = service
            .query(1, 2, Some("{\"Age\": "), PAGE_ONE)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MicrodataError::Filter(FilterError::InvalidJson(_))
        ));
        assert_eq!(repo.call_count(), 0);
    }

    #[tokio::test]
    async fn test_query_unknown_field_before_data_queries() {
        let (service, repo) = service(MockRepository::new().with_level(1, 2, &["Age"]));
        let err = service
            .query(1, 2, Some(r#"{"Salary": 1}"#), PAGE_ONE)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MicrodataError::Filter(FilterError::UnknownField(_))
        ));
        assert!(repo.executed().is_empty());
    }

    #[tokio::test]
    async fn test_query_unknown_level() {
        let (service, repo) = service(MockRepository::new().with_level(1, 2, &["Age"]));
        let err = service
            .query(1, 9, Some(r#"{"Age": 1}"#), PAGE_ONE)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MicrodataError::LevelNotFound {
                survey_id: 1,
                level_id: 9
            }
        ));
        assert!(repo.executed().is_empty());
    }

    #[tokio::test]
    async fn test_query_schema_store_failure() {
        let (service, _repo) = service(MockRepository {
            fail_metadata: true,
            ..MockRepository::new()
        });
        let err = service
            .query(1, 2, Some(r#"{"Age": 1}"#), PAGE_ONE)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MicrodataError::StoreUnavailable {
                operation: "level schema lookup",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_get_record() {
        let (service, _repo) = service(MockRepository::new().with_records(3, 3));
        let record = service.get_record(1, 2, "U2").await.unwrap().unwrap();
        assert_eq!(record.data_id, 2);
        assert!(service.get_record(1, 2, "nope").await.unwrap().is_none());
    }
}
