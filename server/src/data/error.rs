//! Unified error type for data layer

use thiserror::Error;

/// Error type for store operations
#[derive(Error, Debug)]
pub enum DataError {
    /// PostgreSQL database error
    #[error("PostgreSQL error: {0}")]
    Postgres(sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection pool exhausted
    #[error("Connection pool exhausted on {backend}")]
    PoolExhausted { backend: &'static str },

    /// Stored row could not be interpreted
    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    /// Failure of a load shared with other callers
    #[error("{0}")]
    Coalesced(String),
}

impl DataError {
    /// Create a PostgreSQL error with preserved context
    pub fn from_postgres(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut => Self::PoolExhausted {
                backend: "postgres",
            },
            e => Self::Postgres(e),
        }
    }

    /// Check if this is a connection-related error that might be transient
    pub fn is_transient(&self) -> bool {
        match self {
            Self::PoolExhausted { .. } => true,
            Self::Postgres(e) => matches!(e, sqlx::Error::PoolClosed | sqlx::Error::Io(_)),
            Self::Config(_) | Self::InvalidData(_) | Self::Coalesced(_) => false,
        }
    }
}

/// Convert from the backend-specific PostgresError type
impl From<crate::data::postgres::PostgresError> for DataError {
    fn from(e: crate::data::postgres::PostgresError) -> Self {
        match e {
            crate::data::postgres::PostgresError::Database(e) => Self::from_postgres(e),
            crate::data::postgres::PostgresError::Config(msg) => Self::Config(msg),
            crate::data::postgres::PostgresError::InvalidData(msg) => Self::InvalidData(msg),
        }
    }
}
