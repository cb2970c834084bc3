//! Row tree model - typed recursive records

use super::value::CellValue;
use crate::error::TableError;
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A record with optional ordered children.
///
/// `id` only needs to be unique among its siblings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Row {
    #[serde(deserialize_with = "id_from_scalar")]
    pub id: String,
    #[serde(default)]
    pub children: Vec<Row>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, CellValue>,
}

impl Row {
    /// Create a row without children
    pub fn leaf<K, V>(id: impl Into<String>, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<CellValue>,
    {
        Self {
            id: id.into(),
            children: Vec::new(),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn with_children(mut self, children: Vec<Row>) -> Self {
        self.children = children;
        self
    }

    /// Value of a field; missing fields read as `Null`
    pub fn get(&self, key: &str) -> &CellValue {
        static NULL: CellValue = CellValue::Null;
        self.fields.get(key).unwrap_or(&NULL)
    }

    /// A row without children is a leaf and never shows an expand affordance
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Accept numeric ids (`id: 1`) as well as strings
fn id_from_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Integer(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
    })
}

/// Position of a row in the forest: index at each level from the top.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RowPath(pub Vec<usize>);

impl RowPath {
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }

    /// Depth of the row (0 for top-level rows)
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }
}

impl fmt::Display for RowPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "rows[{}]", parts.join("]/children["))
    }
}

/// Validated forest of top-level rows.
///
/// Construction rejects empty or duplicate sibling ids. Children are owned
/// values, so a cyclic tree cannot be built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowForest {
    rows: Vec<Row>,
}

impl RowForest {
    pub fn new(rows: Vec<Row>) -> Result<Self, TableError> {
        validate_siblings(&rows)?;
        Ok(Self { rows })
    }

    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// Top-level rows in author order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve a path to its row
    pub fn get(&self, path: &RowPath) -> Option<&Row> {
        let (first, rest) = path.0.split_first()?;
        let mut row = self.rows.get(*first)?;
        for index in rest {
            row = row.children.get(*index)?;
        }
        Some(row)
    }
}

fn validate_siblings(rows: &[Row]) -> Result<(), TableError> {
    // (siblings, path of their parent)
    let mut pending: Vec<(&[Row], Option<RowPath>)> = vec![(rows, None)];

    while let Some((siblings, parent)) = pending.pop() {
        let mut seen: HashSet<&str> = HashSet::with_capacity(siblings.len());

        for (index, row) in siblings.iter().enumerate() {
            let path = match &parent {
                Some(p) => p.child(index),
                None => RowPath::root(index),
            };

            if row.id.trim().is_empty() {
                return Err(TableError::MissingId {
                    path: path.to_string(),
                });
            }

            if !seen.insert(row.id.as_str()) {
                return Err(TableError::DuplicateId {
                    id: row.id.clone(),
                    parent: parent
                        .as_ref()
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "the top level".to_string()),
                });
            }

            if row.has_children() {
                pending.push((&row.children, Some(path)));
            }
        }
    }

    Ok(())
}
