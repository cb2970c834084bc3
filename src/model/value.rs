//! Cell values - the tagged union stored in every row field

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::cmp::Ordering;

/// A single field value.
///
/// Data files use plain JSON/YAML scalars (`null`, numbers, strings, booleans)
/// or an explicit tag such as `{ currency: 1250.5 }` or `{ date: 2024-06-01 }`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Currency(f64),
    Percentage(f64),
    Date(NaiveDate),
    Null,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric payload for the numeric tags
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) | CellValue::Currency(n) | CellValue::Percentage(n) => Some(*n),
            _ => None,
        }
    }

    /// Unformatted string representation, used by search and as the
    /// fallback for comparisons between mismatched tags.
    ///
    /// Returns `None` for `Null`.
    pub fn raw_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) | CellValue::Currency(n) | CellValue::Percentage(n) => {
                Some(n.to_string())
            }
            CellValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            CellValue::Null => None,
        }
    }

    /// Comparison class of a value: numeric tags share one class
    pub fn kind_rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Number(_) | CellValue::Currency(_) | CellValue::Percentage(_) => 1,
            CellValue::Date(_) => 2,
            CellValue::Text(_) => 3,
        }
    }

    /// Natural ordering between two values.
    ///
    /// Numeric tags compare numerically with each other, dates chronologically,
    /// text lexicographically. Values of different classes order by class:
    /// Null < numeric < Date < Text. This keeps it a total order; a sort over
    /// a column with mixed classes uses `text_cmp` for every pair instead.
    pub fn natural_cmp(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => self.kind_rank().cmp(&other.kind_rank()),
            },
        }
    }

    /// Ordering by raw text, Null first
    pub fn text_cmp(&self, other: &CellValue) -> Ordering {
        self.raw_text().cmp(&other.raw_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

/// Explicitly tagged form, e.g. `{ "percentage": 0.15 }`
#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum TaggedCell {
    Text(String),
    Number(f64),
    Currency(f64),
    Percentage(f64),
    Date(NaiveDate),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Tagged(TaggedCell),
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = match RawCell::deserialize(deserializer)? {
            RawCell::Null => CellValue::Null,
            RawCell::Bool(b) => CellValue::Text(b.to_string()),
            RawCell::Number(n) => CellValue::Number(n),
            RawCell::Text(s) => CellValue::Text(s),
            RawCell::Tagged(TaggedCell::Text(s)) => CellValue::Text(s),
            RawCell::Tagged(TaggedCell::Number(n)) => CellValue::Number(n),
            RawCell::Tagged(TaggedCell::Currency(n)) => CellValue::Currency(n),
            RawCell::Tagged(TaggedCell::Percentage(n)) => CellValue::Percentage(n),
            RawCell::Tagged(TaggedCell::Date(d)) => CellValue::Date(d),
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_deserialize_plain_scalars() {
        let json = r#"{"a": null, "b": 45, "c": "MegaMart", "d": true, "e": 0.15}"#;
        let fields: BTreeMap<String, CellValue> = serde_json::from_str(json).unwrap();

        assert_eq!(fields["a"], CellValue::Null);
        assert_eq!(fields["b"], CellValue::Number(45.0));
        assert_eq!(fields["c"], CellValue::text("MegaMart"));
        assert_eq!(fields["d"], CellValue::text("true"));
        assert_eq!(fields["e"], CellValue::Number(0.15));
    }

    #[test]
    fn test_deserialize_tagged_values() {
        let yaml = r#"
revenue: { currency: 12500000 }
growth: { percentage: 0.15 }
start: { date: 2024-06-01 }
"#;
        let fields: BTreeMap<String, CellValue> = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(fields["revenue"], CellValue::Currency(12_500_000.0));
        assert_eq!(fields["growth"], CellValue::Percentage(0.15));
        assert_eq!(
            fields["start"],
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        );
    }

    #[test]
    fn test_natural_cmp_by_tag() {
        assert_eq!(
            CellValue::Number(2.0).natural_cmp(&CellValue::Number(10.0)),
            Ordering::Less
        );
        assert_eq!(
            CellValue::Currency(5.0).natural_cmp(&CellValue::Number(5.0)),
            Ordering::Equal
        );
        assert_eq!(
            CellValue::text("apple").natural_cmp(&CellValue::text("banana")),
            Ordering::Less
        );
        let early = CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let late = CellValue::Date(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(early.natural_cmp(&late), Ordering::Less);
    }

    #[test]
    fn test_null_sorts_first() {
        assert_eq!(
            CellValue::Null.natural_cmp(&CellValue::Number(-1e9)),
            Ordering::Less
        );
        assert_eq!(
            CellValue::text("").natural_cmp(&CellValue::Null),
            Ordering::Greater
        );
        assert_eq!(CellValue::Null.natural_cmp(&CellValue::Null), Ordering::Equal);
    }

    #[test]
    fn test_mismatched_tags_order_by_class() {
        assert_eq!(
            CellValue::text("10").natural_cmp(&CellValue::Number(9.0)),
            Ordering::Greater
        );
        let date = CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(CellValue::Currency(1e12).natural_cmp(&date), Ordering::Less);
        assert_eq!(date.natural_cmp(&CellValue::text("")), Ordering::Less);
    }

    #[test]
    fn test_text_cmp() {
        // "10" < "9" as strings
        assert_eq!(
            CellValue::text("10").text_cmp(&CellValue::Number(9.0)),
            Ordering::Less
        );
        assert_eq!(
            CellValue::text("$12.5M").text_cmp(&CellValue::Number(1.0)),
            "$12.5M".cmp("1")
        );
        assert_eq!(CellValue::Null.text_cmp(&CellValue::text("")), Ordering::Less);
    }

    #[test]
    fn test_raw_text() {
        assert_eq!(CellValue::Number(4500000.0).raw_text().as_deref(), Some("4500000"));
        assert_eq!(CellValue::Number(2.3).raw_text().as_deref(), Some("2.3"));
        assert_eq!(CellValue::Null.raw_text(), None);
    }
}
