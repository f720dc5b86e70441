//! Survey level repository for PostgreSQL operations

use serde_json::Value;
use sqlx::PgPool;

use crate::data::postgres::PostgresError;
use crate::data::types::LevelRow;

/// List the levels of a survey ordered by name
pub async fn list_levels(pool: &PgPool, survey_id: i64) -> Result<Vec<LevelRow>, PostgresError> {
    let rows = sqlx::query_as::<_, (i64, String, Option<Value>, Option<Value>)>(
        r#"
        SELECT level_id::bigint, level_name, variable_schema::jsonb, common_identifiers::jsonb
        FROM survey_levels
        WHERE survey_id = $1
        ORDER BY level_name ASC
        "#,
    )
    .bind(survey_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(
            |(level_id, level_name, variable_schema, common_identifiers)| LevelRow {
                level_id,
                level_name,
                variable_schema: variable_schema.unwrap_or(Value::Null),
                common_identifiers: common_identifiers.unwrap_or(Value::Null),
            },
        )
        .collect())
}

/// Get a level's declared `variable_schema`.
///
/// Returns `None` when the level does not belong to the survey. A level
/// with a NULL schema yields `Some(Value::Null)`.
pub async fn get_variable_schema(
    pool: &PgPool,
    survey_id: i64,
    level_id: i64,
) -> Result<Option<Value>, PostgresError> {
    let row = sqlx::query_as::<_, (Option<Value>,)>(
        "SELECT variable_schema::jsonb FROM survey_levels WHERE survey_id = $1 AND level_id = $2",
    )
    .bind(survey_id)
    .bind(level_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(schema,)| schema.unwrap_or(Value::Null)))
}
