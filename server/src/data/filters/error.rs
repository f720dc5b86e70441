//! Filter error types

use thiserror::Error;

/// Rejection of a client-supplied filter expression.
///
/// Every variant is a client error and is raised before any data or count
/// query is issued.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid JSON format for filter parameter: {0}")]
    InvalidJson(String),

    #[error("Malformed filter: {0}")]
    Malformed(String),

    #[error("Unsupported operator '{operator}' for field '{field}'. Supported: >, <, >=, <=, !=, =")]
    UnsupportedOperator { field: String, operator: String },

    #[error("Cannot filter by field: {0}")]
    UnknownField(String),

    #[error("Filter JSON exceeds maximum size of {max} bytes")]
    TooLarge { max: usize },

    #[error("Maximum {max} filter fields allowed")]
    TooMany { max: usize },
}

impl FilterError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidJson(_) => "INVALID_FILTER_JSON",
            Self::Malformed(_) => "MALFORMED_FILTER",
            Self::UnsupportedOperator { .. } => "UNSUPPORTED_FILTER_OPERATOR",
            Self::UnknownField(_) => "INVALID_FILTER_FIELD",
            Self::TooLarge { .. } => "FILTER_JSON_TOO_LARGE",
            Self::TooMany { .. } => "TOO_MANY_FILTERS",
        }
    }
}
