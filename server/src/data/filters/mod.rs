//! Filter-to-SQL translation
//!
//! ```
//! use microdata_server::data::filters::{
//!     FIRST_FILTER_PARAM, Pagination, PayloadFields, build_query_pair, compile, parse_filter,
//! };
//!
//! let predicates = parse_filter(Some(r#"{"Age": {">": 25}}"#)).unwrap();
//! let fields = PayloadFields::new(["Age"]);
//! let compiled = compile(&predicates, &fields, FIRST_FILTER_PARAM).unwrap();
//! let pair = build_query_pair(1, 2, &compiled, Pagination { page: 1, limit: 10 });
//! assert!(pair.data.sql.contains("(data_payload->>'AGE')::numeric > $3::numeric"));
//! ```

mod builder;
mod compiler;
mod error;
mod fields;
mod parser;
mod types;

pub use builder::{BoundQuery, FIRST_FILTER_PARAM, Pagination, QueryPair, build_query_pair};
pub use compiler::{CompiledFilter, CompiledFragment, compile};
pub use error::FilterError;
pub use fields::PayloadFields;
pub use parser::parse_filter;
pub use types::{FilterValue, Operator, Predicate, QueryParam, ValueKind};
