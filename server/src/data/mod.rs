//! Data storage layer
//!
//! - `filters` - Filter parsing and filter-to-SQL translation
//! - `postgres` - PostgreSQL service and repositories
//! - `schema_cache` - Per-level field allow-list cache
//! - `types` - Row types
//! - `traits` - Repository trait implemented by the store
//! - `error` - Unified error type

pub mod error;
pub mod filters;
pub mod postgres;
pub mod schema_cache;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use error::DataError;
pub use postgres::PostgresService;
pub use schema_cache::LevelSchemaCache;
pub use traits::SurveyRepository;
