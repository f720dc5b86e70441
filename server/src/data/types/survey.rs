//! Survey and level metadata rows

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Survey row from database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyRow {
    pub survey_id: i64,
    pub survey_name: String,
    pub survey_year: Option<i32>,
    pub description: Option<String>,
}

/// Survey level row from database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelRow {
    pub level_id: i64,
    pub level_name: String,
    /// Declared payload fields, stored as JSONB
    pub variable_schema: Value,
    pub common_identifiers: Value,
}

impl LevelRow {
    /// Declared variables, skipping entries that do not describe a named field
    pub fn variables(&self) -> Vec<VariableDef> {
        self.variable_schema
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One entry of a level's `variable_schema`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDef {
    pub name: String,
    #[serde(rename = "type", default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_level_variables() {
        let level = LevelRow {
            level_id: 2,
            level_name: "Block A".to_string(),
            variable_schema: json!([
                {"name": "Age", "type": "numeric", "description": "Age in years"},
                {"name": "Gender"},
                {"type": "text"},
                "loose"
            ]),
            common_identifiers: json!(["FSU"]),
        };
        let vars = level.variables();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].data_type.as_deref(), Some("numeric"));
        assert_eq!(vars[1].name, "Gender");
        assert_eq!(vars[1].description, None);
    }

    #[test]
    fn test_level_variables_not_an_array() {
        let level = LevelRow {
            level_id: 1,
            level_name: "x".to_string(),
            variable_schema: Value::Null,
            common_identifiers: Value::Null,
        };
        assert!(level.variables().is_empty());
    }
}
