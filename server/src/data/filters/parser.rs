//! Filter parsing
//!
//! Parses the `filter` query parameter (a JSON object keyed by payload field)
//! into ordered predicate descriptors.
//!
//! ```text
//! {"Age": {">": 25}, "Gender": "Male"}
//! ```
//!
//! A scalar value means equality. An object value must hold exactly one
//! supported operator key; unknown operator keys are rejected.

use serde_json::Value;

use super::error::FilterError;
use super::types::{FilterValue, Operator, Predicate};

/// Maximum size of filter JSON in bytes (64KB)
const MAX_FILTER_JSON_SIZE: usize = 64 * 1024;

/// Maximum number of filtered fields
const MAX_FILTERS: usize = 50;

/// Parse a raw filter expression into predicates, preserving key order.
///
/// `None` or a blank string is the empty filter.
pub fn parse_filter(raw: Option<&str>) -> Result<Vec<Predicate>, FilterError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Vec::new());
    };

    if raw.len() > MAX_FILTER_JSON_SIZE {
        return Err(FilterError::TooLarge {
            max: MAX_FILTER_JSON_SIZE,
        });
    }

    let value: Value =
        serde_json::from_str(raw).map_err(|e| FilterError::InvalidJson(e.to_string()))?;

    let Value::Object(entries) = value else {
        return Err(FilterError::Malformed(
            "filter must be a JSON object keyed by field name".to_string(),
        ));
    };

    if entries.len() > MAX_FILTERS {
        return Err(FilterError::TooMany { max: MAX_FILTERS });
    }

    entries
        .into_iter()
        .map(|(field, value)| parse_entry(field, value))
        .collect()
}

fn parse_entry(field: String, value: Value) -> Result<Predicate, FilterError> {
    if field.trim().is_empty() {
        return Err(FilterError::Malformed(
            "field name must not be empty".to_string(),
        ));
    }

    match value {
        Value::Object(ops) => {
            let mut ops = ops.into_iter();
            let (key, operand) = match (ops.next(), ops.next()) {
                (Some(entry), None) => entry,
                (None, _) => {
                    return Err(FilterError::Malformed(format!(
                        "operator object for '{}' is empty",
                        field
                    )));
                }
                (Some(_), Some(_)) => {
                    return Err(FilterError::Malformed(format!(
                        "field '{}' must have exactly one operator",
                        field
                    )));
                }
            };

            let Some(operator) = Operator::from_key(&key) else {
                return Err(FilterError::UnsupportedOperator {
                    field,
                    operator: key,
                });
            };
            let value = parse_scalar(&field, operand)?;
            Ok(Predicate {
                field,
                operator,
                value,
            })
        }
        scalar => {
            let value = parse_scalar(&field, scalar)?;
            Ok(Predicate {
                field,
                operator: Operator::Eq,
                value,
            })
        }
    }
}

fn parse_scalar(field: &str, value: Value) -> Result<FilterValue, FilterError> {
    match value {
        Value::Number(n) if n.as_f64().is_some_and(f64::is_finite) => {
            Ok(FilterValue::Number(n.to_string()))
        }
        Value::Number(_) => Err(FilterError::Malformed(format!(
            "value for '{}' is not a finite number",
            field
        ))),
        Value::String(s) => Ok(FilterValue::Text(s)),
        // `->>` renders JSON booleans as 'true' / 'false'
        Value::Bool(b) => Ok(FilterValue::Text(b.to_string())),
        Value::Null => Err(FilterError::Malformed(format!(
            "value for '{}' must not be null",
            field
        ))),
        Value::Array(_) | Value::Object(_) => Err(FilterError::Malformed(format!(
            "value for '{}' must be a string or number",
            field
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filters::ValueKind;

    #[test]
    fn parse_filter_none_and_blank() {
        assert!(parse_filter(None).unwrap().is_empty());
        assert!(parse_filter(Some("")).unwrap().is_empty());
        assert!(parse_filter(Some("   ")).unwrap().is_empty());
    }

    #[test]
    fn parse_filter_empty_object() {
        assert!(parse_filter(Some("{}")).unwrap().is_empty());
    }

    #[test]
    fn parse_filter_operator_object() {
        let predicates = parse_filter(Some(r#"{"Age": {">": 25}}"#)).unwrap();
        assert_eq!(
            predicates,
            vec![Predicate {
                field: "Age".to_string(),
                operator: Operator::Gt,
                value: FilterValue::Number("25".to_string()),
            }]
        );
    }

    #[test]
    fn parse_filter_scalar_is_equality() {
        let predicates = parse_filter(Some(r#"{"Gender": "Male"}"#)).unwrap();
        assert_eq!(predicates.len(), 1);
        assert_eq!(predicates[0].operator, Operator::Eq);
        assert_eq!(predicates[0].value, FilterValue::Text("Male".to_string()));
        assert_eq!(predicates[0].value_kind(), ValueKind::Text);
    }

    #[test]
    fn parse_filter_preserves_key_order() {
        let json = r#"{"Zeta": 1, "Alpha": {"<=": 2}, "Mid": {"!=": "x"}}"#;
        let fields: Vec<String> = parse_filter(Some(json))
            .unwrap()
            .into_iter()
            .map(|p| p.field)
            .collect();
        assert_eq!(fields, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn parse_filter_all_operators() {
        let json = r#"{"a": {">": 1}, "b": {"<": 1}, "c": {">=": 1}, "d": {"<=": 1}, "e": {"!=": 1}, "f": {"=": 1}}"#;
        let ops: Vec<Operator> = parse_filter(Some(json))
            .unwrap()
            .into_iter()
            .map(|p| p.operator)
            .collect();
        assert_eq!(
            ops,
            vec![
                Operator::Gt,
                Operator::Lt,
                Operator::Gte,
                Operator::Lte,
                Operator::Neq,
                Operator::Eq
            ]
        );
    }

    #[test]
    fn parse_filter_number_vs_string_kind() {
        let numeric = parse_filter(Some(r#"{"Age": 25}"#)).unwrap();
        let text = parse_filter(Some(r#"{"Age": "25"}"#)).unwrap();
        assert_eq!(numeric[0].value_kind(), ValueKind::Numeric);
        assert_eq!(text[0].value_kind(), ValueKind::Text);
    }

    #[test]
    fn parse_filter_bool_becomes_text() {
        let predicates = parse_filter(Some(r#"{"Urban": true}"#)).unwrap();
        assert_eq!(predicates[0].value, FilterValue::Text("true".to_string()));
    }

    #[test]
    fn parse_filter_invalid_json() {
        let err = parse_filter(Some("{not json")).unwrap_err();
        assert!(matches!(err, FilterError::InvalidJson(_)));
    }

    #[test]
    fn parse_filter_not_an_object() {
        for json in ["[1, 2]", "42", r#""Age""#, "null"] {
            let err = parse_filter(Some(json)).unwrap_err();
            assert!(matches!(err, FilterError::Malformed(_)), "{}", json);
        }
    }

    #[test]
    fn parse_filter_unsupported_operator_rejected() {
        let err = parse_filter(Some(r#"{"Age": {"~": 25}}"#)).unwrap_err();
        assert_eq!(
            err,
            FilterError::UnsupportedOperator {
                field: "Age".to_string(),
                operator: "~".to_string(),
            }
        );
    }

    #[test]
    fn parse_filter_multiple_operators_rejected() {
        let err = parse_filter(Some(r#"{"Age": {">": 25, "<": 60}}"#)).unwrap_err();
        assert!(matches!(err, FilterError::Malformed(_)));
    }

    #[test]
    fn parse_filter_empty_operator_object_rejected() {
        let err = parse_filter(Some(r#"{"Age": {}}"#)).unwrap_err();
        assert!(matches!(err, FilterError::Malformed(_)));
    }

    #[test]
    fn parse_filter_non_scalar_values_rejected() {
        for json in [
            r#"{"Age": null}"#,
            r#"{"Age": [1, 2]}"#,
            r#"{"Age": {">": {"x": 1}}}"#,
            r#"{"Age": {">": null}}"#,
        ] {
            let err = parse_filter(Some(json)).unwrap_err();
            assert!(matches!(err, FilterError::Malformed(_)), "{}", json);
        }
    }

    #[test]
    fn parse_filter_empty_field_name_rejected() {
        let err = parse_filter(Some(r#"{" ": 1}"#)).unwrap_err();
        assert!(matches!(err, FilterError::Malformed(_)));
    }

    #[test]
    fn parse_filter_too_large() {
        let big = format!(r#"{{"A": "{}"}}"#, "x".repeat(MAX_FILTER_JSON_SIZE));
        let err = parse_filter(Some(&big)).unwrap_err();
        assert_eq!(
            err,
            FilterError::TooLarge {
                max: MAX_FILTER_JSON_SIZE
            }
        );
    }

    #[test]
    fn parse_filter_too_many_fields() {
        let entries: Vec<String> = (0..=MAX_FILTERS).map(|i| format!(r#""F{}": 1"#, i)).collect();
        let json = format!("{{{}}}", entries.join(", "));
        let err = parse_filter(Some(&json)).unwrap_err();
        assert_eq!(err, FilterError::TooMany { max: MAX_FILTERS });
    }

    #[test]
    fn parse_filter_max_fields_accepted() {
        let entries: Vec<String> = (0..MAX_FILTERS).map(|i| format!(r#""F{}": 1"#, i)).collect();
        let json = format!("{{{}}}", entries.join(", "));
        let predicates = parse_filter(Some(&json)).unwrap();
        assert_eq!(predicates.len(), MAX_FILTERS);
        assert_eq!(predicates[MAX_FILTERS - 1].field, format!("F{}", MAX_FILTERS - 1));
    }

    #[test]
    fn parse_filter_large_integer_kept_exact() {
        let predicates = parse_filter(Some(r#"{"HHID": {">": 9007199254740993}}"#)).unwrap();
        assert_eq!(
            predicates[0].value,
            FilterValue::Number("9007199254740993".to_string())
        );

        let decimal = parse_filter(Some(r#"{"Income": 1250.75}"#)).unwrap();
        assert_eq!(decimal[0].value, FilterValue::Number("1250.75".to_string()));
    }
}
