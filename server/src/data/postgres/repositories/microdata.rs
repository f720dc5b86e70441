//! Microdata repository for PostgreSQL operations
//!
//! Filtered queries arrive fully built (SQL text plus positional parameters)
//! from the query builder; this module only binds and executes them.

use serde_json::Value;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::data::filters::{BoundQuery, QueryParam};
use crate::data::postgres::PostgresError;
use crate::data::types::MicrodataRow;

type RecordTuple = (i64, Option<String>, Value);

/// Bind positional parameters in order
fn bind_params<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &'q [QueryParam],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for param in params {
        query = match param {
            QueryParam::Int(v) => query.bind(*v),
            QueryParam::Numeric(v) | QueryParam::Text(v) => query.bind(v.as_str()),
        };
    }
    query
}

fn to_row((data_id, unit_identifier, data_payload): RecordTuple) -> MicrodataRow {
    MicrodataRow {
        data_id,
        unit_identifier,
        data_payload,
    }
}

/// Execute a data query
pub async fn fetch_records(
    pool: &PgPool,
    query: &BoundQuery,
) -> Result<Vec<MicrodataRow>, PostgresError> {
    let rows = bind_params(sqlx::query_as::<_, RecordTuple>(&query.sql), &query.params)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(to_row).collect())
}

/// Execute a count query
pub async fn fetch_count(pool: &PgPool, query: &BoundQuery) -> Result<u64, PostgresError> {
    let (count,) = bind_params(sqlx::query_as::<_, (i64,)>(&query.sql), &query.params)
        .fetch_one(pool)
        .await?;
    u64::try_from(count)
        .map_err(|_| PostgresError::InvalidData(format!("negative row count: {}", count)))
}

/// Get a single record by unit identifier
pub async fn get_record(
    pool: &PgPool,
    survey_id: i64,
    level_id: i64,
    unit_identifier: &str,
) -> Result<Option<MicrodataRow>, PostgresError> {
    let row = sqlx::query_as::<_, RecordTuple>(
        r#"
        SELECT data_id::bigint, unit_identifier, data_payload
        FROM survey_data
        WHERE survey_id = $1 AND level_id = $2 AND unit_identifier = $3
        ORDER BY data_id
        LIMIT 1
        "#,
    )
    .bind(survey_id)
    .bind(level_id)
    .bind(unit_identifier)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(to_row))
}
