//! CSV export of the filtered and sorted table

use crate::model::format::{format_value, FormatLocale};
use crate::model::table::DrillTable;
use chrono::Local;
use log::{info, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write every row passing the current search, in the current sort order,
/// each followed by its complete subtree. Returns the number of records.
///
/// Columns: `depth`, `id`, then one per table column with formatted values.
pub fn write_csv<W: Write>(
    table: &mut DrillTable,
    locale: &FormatLocale,
    writer: W,
) -> anyhow::Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["depth".to_string(), "id".to_string()];
    header.extend(table.columns().iter().map(|c| c.label.clone()));
    csv_writer.write_record(&header)?;

    let lines = table.all_rows_expanded();
    let mut written = 0;
    for line in &lines {
        let Some(row) = table.row(line) else {
            continue;
        };

        let mut record = vec![line.depth.to_string(), row.id.clone()];
        record.extend(
            table
                .columns()
                .iter()
                .map(|c| format_value(row.get(&c.key), c.column_type, locale)),
        );
        csv_writer.write_record(&record)?;
        written += 1;
    }

    csv_writer.flush()?;
    Ok(written)
}

/// Export to `<dir>/<stem>-<timestamp>.csv`, creating `dir` if needed
pub fn export_to_dir(
    table: &mut DrillTable,
    locale: &FormatLocale,
    dir: &Path,
    stem: &str,
) -> anyhow::Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let file_name = format!("{}-{}.csv", stem, Local::now().format("%Y%m%d-%H%M%S"));
    let path = dir.join(file_name);

    let result = fs::File::create(&path)
        .map_err(anyhow::Error::from)
        .and_then(|file| write_csv(table, locale, file));

    match result {
        Ok(count) => {
            info!("exported {} rows to {}", count, path.display());
            Ok(path)
        }
        Err(e) => {
            warn!("export to {} failed: {}", path.display(), e);
            Err(e)
        }
    }
}
