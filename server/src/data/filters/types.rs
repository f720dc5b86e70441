//! Filter type definitions
//!
//! Predicate descriptors produced by the parser and the positional
//! parameter values consumed by the compiler and query builder.

/// Comparison operator of a single predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
    Neq,
}

impl Operator {
    /// Parse an operator key as it appears in a filter object (`{">": 25}`)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "=" => Some(Self::Eq),
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            ">=" => Some(Self::Gte),
            "<=" => Some(Self::Lte),
            "!=" => Some(Self::Neq),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Neq => "!=",
        }
    }
}

/// Cast applied to the extracted payload field before comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Numeric,
    Text,
}

impl ValueKind {
    pub fn sql_type(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
        }
    }

    /// Cast suffix for the bound value. Numeric text is bound as `text`
    /// and converted server-side so the comparison stays in `numeric`.
    pub fn param_cast(&self) -> &'static str {
        match self {
            Self::Numeric => "::numeric",
            Self::Text => "",
        }
    }
}

/// Right-hand side of a predicate.
/// Numbers keep their JSON text so large identifiers survive unrounded.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Number(String),
    Text(String),
}

impl FilterValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Number(_) => ValueKind::Numeric,
            Self::Text(_) => ValueKind::Text,
        }
    }

    pub fn to_param(&self) -> QueryParam {
        match self {
            Self::Number(n) => QueryParam::Numeric(n.clone()),
            Self::Text(s) => QueryParam::Text(s.clone()),
        }
    }
}

/// A single field comparison derived from one filter entry
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub operator: Operator,
    pub value: FilterValue,
}

impl Predicate {
    pub fn value_kind(&self) -> ValueKind {
        self.value.kind()
    }
}

/// Positional query parameter.
/// Every user-controllable value reaches the store through this enum.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    Int(i64),
    /// Decimal text, cast to `numeric` at its placeholder
    Numeric(String),
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_keys_round_trip_to_sql() {
        for key in ["=", ">", "<", ">=", "<=", "!="] {
            let op = Operator::from_key(key).unwrap();
            assert_eq!(op.as_sql(), key);
        }
    }

    #[test]
    fn operator_unknown_keys() {
        assert_eq!(Operator::from_key("<>"), None);
        assert_eq!(Operator::from_key("like"), None);
        assert_eq!(Operator::from_key(""), None);
        assert_eq!(Operator::from_key(" >"), None);
    }

    #[test]
    fn value_kind_follows_value() {
        assert_eq!(FilterValue::Number("25".into()).kind(), ValueKind::Numeric);
        assert_eq!(FilterValue::Text("25".into()).kind(), ValueKind::Text);
        assert_eq!(ValueKind::Numeric.sql_type(), "numeric");
        assert_eq!(ValueKind::Text.sql_type(), "text");
        assert_eq!(ValueKind::Numeric.param_cast(), "::numeric");
        assert_eq!(ValueKind::Text.param_cast(), "");
    }

    #[test]
    fn filter_value_to_param() {
        assert_eq!(
            FilterValue::Number("1.5".into()).to_param(),
            QueryParam::Numeric("1.5".into())
        );
        assert_eq!(
            FilterValue::Text("Male".into()).to_param(),
            QueryParam::Text("Male".into())
        );
    }
}
