//! Dataset loading - JSON/YAML documents into validated tables

use crate::error::TableError;
use crate::model::column::Column;
use crate::model::row::{Row, RowForest};
use crate::model::table::{DrillTable, TableOptions};
use crate::model::ui::View;
use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Dataset document as written on disk
#[derive(Debug, Deserialize)]
struct DatasetFile {
    title: String,
    #[serde(default)]
    description: Option<String>,
    columns: Vec<Column>,
    #[serde(default)]
    rows: Vec<Row>,
    #[serde(default = "default_true")]
    expandable: bool,
    #[serde(default, alias = "showActions")]
    show_actions: bool,
    #[serde(default)]
    actions: Option<Vec<String>>,
}

fn default_true() -> bool {
    true
}

/// Document syntax, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    Yaml,
}

impl DatasetFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "json" => Some(DatasetFormat::Json),
            "yaml" | "yml" => Some(DatasetFormat::Yaml),
            _ => None,
        }
    }
}

/// Where a dataset came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    BuiltIn,
    File(PathBuf),
}

impl DatasetSource {
    pub fn label(&self) -> String {
        match self {
            DatasetSource::BuiltIn => "built-in".to_string(),
            DatasetSource::File(path) => path.display().to_string(),
        }
    }
}

/// A titled, validated table ready for display
#[derive(Debug, Clone)]
pub struct Dataset {
    pub title: String,
    pub description: Option<String>,
    pub table: DrillTable,
    pub source: DatasetSource,
}

/// Parse and validate a dataset document
pub fn parse_dataset(
    contents: &str,
    format: DatasetFormat,
    source: DatasetSource,
) -> Result<Dataset, TableError> {
    let file: DatasetFile = match format {
        DatasetFormat::Json => serde_json::from_str(contents)?,
        DatasetFormat::Yaml => serde_yaml::from_str(contents)?,
    };

    let forest = RowForest::new(file.rows)?;
    let mut options = TableOptions {
        expandable: file.expandable,
        show_actions: file.show_actions,
        ..TableOptions::default()
    };
    if let Some(actions) = file.actions {
        options.actions = actions;
    }
    let table = DrillTable::new(file.columns, forest, options)?;

    Ok(Dataset {
        title: file.title,
        description: file.description,
        table,
        source,
    })
}

/// Embedded dataset document for a view
pub fn builtin_source(view: View) -> &'static str {
    match view {
        View::Customers => include_str!("../../data/customers.yaml"),
        View::Products => include_str!("../../data/products.yaml"),
        View::Promotions => include_str!("../../data/promotions.yaml"),
        View::Budgets => include_str!("../../data/budgets.yaml"),
        View::Analytics => include_str!("../../data/analytics.yaml"),
    }
}

pub fn load_builtin(view: View) -> Result<Dataset, TableError> {
    parse_dataset(
        builtin_source(view),
        DatasetFormat::Yaml,
        DatasetSource::BuiltIn,
    )
}

/// Look for `<stem>.json`, `<stem>.yaml` or `<stem>.yml` in `dir`
pub fn find_dataset_file(dir: &Path, stem: &str) -> Option<PathBuf> {
    ["json", "yaml", "yml"]
        .iter()
        .map(|ext| dir.join(format!("{}.{}", stem, ext)))
        .find(|path| path.is_file())
}

/// Load the dataset for `view` from `data_dir`, or the built-in one when the
/// directory has no file for it
pub fn load_dataset(view: View, data_dir: Option<&Path>) -> anyhow::Result<Dataset> {
    let Some(path) = data_dir.and_then(|dir| find_dataset_file(dir, view.file_stem())) else {
        let dataset = load_builtin(view)?;
        info!(
            "loaded built-in {} dataset ({} rows)",
            view.name(),
            dataset.table.forest().len()
        );
        return Ok(dataset);
    };

    let format = DatasetFormat::from_path(&path)
        .ok_or_else(|| anyhow::anyhow!("Unsupported dataset file: {}", path.display()))?;
    let contents = fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;

    match parse_dataset(&contents, format, DatasetSource::File(path.clone())) {
        Ok(dataset) => {
            info!(
                "loaded {} dataset from {} ({} rows)",
                view.name(),
                path.display(),
                dataset.table.forest().len()
            );
            Ok(dataset)
        }
        Err(e) => {
            warn!("rejected dataset {}: {}", path.display(), e);
            Err(anyhow::anyhow!("{}: {}", path.display(), e))
        }
    }
}
