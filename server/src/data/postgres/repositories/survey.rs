//! Survey repository for PostgreSQL operations

use sqlx::PgPool;

use crate::data::postgres::PostgresError;
use crate::data::types::SurveyRow;

/// List all surveys ordered by year (newest first), then name
pub async fn list_surveys(pool: &PgPool) -> Result<Vec<SurveyRow>, PostgresError> {
    let rows = sqlx::query_as::<_, (i64, String, Option<i32>, Option<String>)>(
        r#"
        SELECT survey_id::bigint, survey_name, survey_year::integer, description
        FROM surveys
        ORDER BY survey_year DESC, survey_name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(
            |(survey_id, survey_name, survey_year, description)| SurveyRow {
                survey_id,
                survey_name,
                survey_year,
                description,
            },
        )
        .collect())
}
