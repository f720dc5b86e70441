//! Data access executor
//!
//! Runs the data and count queries of a [`QueryPair`] concurrently and joins
//! them fail-fast. Either failure discards the other result.

use crate::data::filters::QueryPair;
use crate::data::traits::SurveyRepository;
use crate::data::types::MicrodataPage;

use super::error::MicrodataError;

pub async fn fetch_page(
    repo: &dyn SurveyRepository,
    pair: &QueryPair,
) -> Result<MicrodataPage, MicrodataError> {
    let (records, total_count) = tokio::try_join!(
        repo.fetch_records(&pair.data),
        repo.fetch_count(&pair.count)
    )
    .map_err(|e| MicrodataError::store("microdata query", e))?;

    Ok(MicrodataPage {
        records,
        total_count,
    })
}
