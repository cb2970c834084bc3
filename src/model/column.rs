//! Column schema - how each field is rendered, sorted and activated

use serde::{Deserialize, Serialize};

/// Semantic type of a column, drives formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Currency,
    Percentage,
    Date,
}

impl From<String> for ColumnType {
    /// Unknown type names fall back to plain text
    fn from(name: String) -> Self {
        match name.to_lowercase().as_str() {
            "number" => ColumnType::Number,
            "currency" => ColumnType::Currency,
            "percentage" => ColumnType::Percentage,
            "date" => ColumnType::Date,
            _ => ColumnType::Text,
        }
    }
}

/// Column descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Field name this column reads from each row
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default, rename = "type")]
    pub column_type: ColumnType,
    /// Activating this column's cell fires a drill-down event
    #[serde(default, alias = "drillDown")]
    pub drillable: bool,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: false,
            filterable: false,
            column_type: ColumnType::Text,
            drillable: false,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn drillable(mut self) -> Self {
        self.drillable = true;
        self
    }

    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_defaults() {
        let column: Column = serde_json::from_str(r#"{"key": "name", "label": "Name"}"#).unwrap();

        assert_eq!(column.column_type, ColumnType::Text);
        assert!(!column.sortable);
        assert!(!column.drillable);
    }

    #[test]
    fn test_unknown_type_falls_back_to_text() {
        let column: Column =
            serde_json::from_str(r#"{"key": "x", "label": "X", "type": "sparkline"}"#).unwrap();

        assert_eq!(column.column_type, ColumnType::Text);
    }

    #[test]
    fn test_drill_down_alias() {
        let column: Column = serde_yaml::from_str(
            "key: name\nlabel: Period\nsortable: true\ndrillDown: true\ntype: currency\n",
        )
        .unwrap();

        assert!(column.drillable);
        assert!(column.sortable);
        assert_eq!(column.column_type, ColumnType::Currency);
    }
}
