//! Query pair construction
//!
//! Builds the bounded data query and the unbounded count query for one
//! request. Both share the same WHERE clause; the count parameters are the
//! data parameters without the trailing `LIMIT` and `OFFSET` values.

use super::compiler::{CompiledFilter, PAYLOAD_COLUMN};
use super::types::QueryParam;

/// Table holding microdata records
pub const DATA_TABLE: &str = "survey_data";

/// First placeholder available to filter predicates (`$1` survey, `$2` level)
pub const FIRST_FILTER_PARAM: usize = 3;

/// Page selection, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        (i64::from(self.page.max(1)) - 1).saturating_mul(i64::from(self.limit))
    }
}

/// SQL text with its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct BoundQuery {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryPair {
    pub data: BoundQuery,
    pub count: BoundQuery,
}

/// Assemble the data and count queries for a survey level.
pub fn build_query_pair(
    survey_id: i64,
    level_id: i64,
    filter: &CompiledFilter,
    pagination: Pagination,
) -> QueryPair {
    let mut where_clause = String::from("survey_id = $1 AND level_id = $2");
    for fragment in &filter.fragments {
        where_clause.push_str(" AND ");
        where_clause.push_str(&fragment.sql);
    }

    let mut params = Vec::with_capacity(filter.params.len() + 4);
    params.push(QueryParam::Int(survey_id));
    params.push(QueryParam::Int(level_id));
    params.extend(filter.params.iter().cloned());

    let count = BoundQuery {
        sql: format!(
            "SELECT COUNT(*) AS total_count FROM {} WHERE {}",
            DATA_TABLE, where_clause
        ),
        params: params.clone(),
    };

    let limit_index = FIRST_FILTER_PARAM + filter.params.len();
    params.push(QueryParam::Int(i64::from(pagination.limit)));
    params.push(QueryParam::Int(pagination.offset()));

    let data = BoundQuery {
        sql: format!(
            "SELECT data_id::bigint AS data_id, unit_identifier, {} FROM {} WHERE {} ORDER BY data_id LIMIT ${} OFFSET ${}",
            PAYLOAD_COLUMN,
            DATA_TABLE,
            where_clause,
            limit_index,
            limit_index + 1
        ),
        params,
    };

    QueryPair { data, count }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filters::{PayloadFields, compile, parse_filter};

    fn compiled(json: &str) -> CompiledFilter {
        let fields = PayloadFields::new(["Age", "Gender", "Region"]);
        compile(&parse_filter(Some(json)).unwrap(), &fields, FIRST_FILTER_PARAM).unwrap()
    }

    #[test]
    fn build_age_filter_scenario() {
        let pair = build_query_pair(
            1,
            2,
            &compiled(r#"{"Age": {">": 25}}"#),
            Pagination { page: 1, limit: 10 },
        );

        assert_eq!(
            pair.data.sql,
            "SELECT data_id::bigint AS data_id, unit_identifier, data_payload FROM survey_data \
             WHERE survey_id = $1 AND level_id = $2 AND (data_payload->>'AGE')::numeric > $3::numeric \
             ORDER BY data_id LIMIT $4 OFFSET $5"
        );
        assert_eq!(
            pair.data.params,
            vec![
                QueryParam::Int(1),
                QueryParam::Int(2),
                QueryParam::Numeric("25".to_string()),
                QueryParam::Int(10),
                QueryParam::Int(0),
            ]
        );
        assert_eq!(
            pair.count.sql,
            "SELECT COUNT(*) AS total_count FROM survey_data \
             WHERE survey_id = $1 AND level_id = $2 AND (data_payload->>'AGE')::numeric > $3::numeric"
        );
        assert_eq!(
            pair.count.params,
            vec![
                QueryParam::Int(1),
                QueryParam::Int(2),
                QueryParam::Numeric("25".to_string())
            ]
        );
    }

    #[test]
    fn build_empty_filter_has_identity_where() {
        let pair = build_query_pair(
            7,
            9,
            &CompiledFilter::empty(FIRST_FILTER_PARAM),
            Pagination { page: 3, limit: 50 },
        );
        assert!(pair.count.sql.ends_with("WHERE survey_id = $1 AND level_id = $2"));
        assert!(pair.data.sql.contains("WHERE survey_id = $1 AND level_id = $2 ORDER BY"));
        assert!(pair.data.sql.ends_with("LIMIT $3 OFFSET $4"));
        assert_eq!(
            pair.data.params,
            vec![
                QueryParam::Int(7),
                QueryParam::Int(9),
                QueryParam::Int(50),
                QueryParam::Int(100),
            ]
        );
    }

    #[test]
    fn build_count_params_are_prefix_of_data_params() {
        let filter = compiled(r#"{"Age": {"<=": 40}, "Gender": "Male", "Region": {"!=": "X"}}"#);
        let pair = build_query_pair(1, 2, &filter, Pagination { page: 2, limit: 25 });

        assert_eq!(pair.data.params.len(), 2 + 3 + 2);
        assert_eq!(pair.count.params.len(), 2 + 3);
        assert_eq!(
            &pair.data.params[..pair.count.params.len()],
            pair.count.params.as_slice()
        );
        assert!(pair.data.sql.ends_with("LIMIT $6 OFFSET $7"));
        assert_eq!(pair.data.params[6], QueryParam::Int(25));
    }

    #[test]
    fn build_shares_where_clause() {
        let filter = compiled(r#"{"Gender": "Female", "Age": 30}"#);
        let pair = build_query_pair(4, 5, &filter, Pagination { page: 1, limit: 100 });
        let where_of = |sql: &str| {
            let start = sql.find("WHERE").unwrap();
            let end = sql.find(" ORDER BY").unwrap_or(sql.len());
            sql[start..end].to_string()
        };
        assert_eq!(where_of(&pair.data.sql), where_of(&pair.count.sql));
    }

    #[test]
    fn pagination_offset() {
        assert_eq!(Pagination { page: 1, limit: 10 }.offset(), 0);
        assert_eq!(Pagination { page: 4, limit: 10 }.offset(), 30);
        assert_eq!(Pagination { page: 0, limit: 10 }.offset(), 0);
        assert_eq!(
            Pagination {
                page: u32::MAX,
                limit: u32::MAX
            }
            .offset(),
            i64::MAX
        );
    }
}
