//! SQL utility functions

/// Quote a string as a PostgreSQL string literal.
///
/// Single quotes are doubled. Only use this for values that have already
/// been checked against a whitelist (e.g. payload keys declared by a level
/// schema); user-controlled values must always be bound as parameters.
///
/// # Example
///
/// ```
/// use microdata_server::utils::sql::quote_literal;
///
/// assert_eq!(quote_literal("AGE"), "'AGE'");
/// assert_eq!(quote_literal("O'NEIL"), "'O''NEIL'");
/// ```
pub fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_literal_plain() {
        assert_eq!(quote_literal("GENDER"), "'GENDER'");
    }

    #[test]
    fn test_quote_literal_single_quote() {
        assert_eq!(quote_literal("a'b"), "'a''b'");
    }

    #[test]
    fn test_quote_literal_injection_attempt() {
        assert_eq!(
            quote_literal("x') OR 1=1 --"),
            "'x'') OR 1=1 --'"
        );
    }

    #[test]
    fn test_quote_literal_empty() {
        assert_eq!(quote_literal(""), "''");
    }
}
