use std::collections::BTreeSet;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::io::sigsci_client::RequestRecord;
use crate::prelude::*;

/// Sorted union of every key seen across `records`.
pub fn header_of(records: &[RequestRecord]) -> Vec<&str> {
    records
        .iter()
        .flat_map(|record| record.keys().map(String::as_str))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Dumps `records` to `path`, replacing whatever was there.
///
/// Keys a record doesn't have become empty cells. No records means an empty file.
pub fn write_records(path: &Path, records: &[RequestRecord]) -> AppResult<usize> {
    let to_error = |source: csv::Error| Error::OutputFile {
        path: path.display().to_string(),
        source,
    };

    // from_path truncates.
    let mut writer = csv::Writer::from_path(path).map_err(to_error)?;

    let header = header_of(records);

    if !header.is_empty() {
        writer.write_record(&header).map_err(to_error)?;
    }

    for record in records {
        let row = header
            .iter()
            .map(|key| record.get(*key).map(render_cell).unwrap_or_default());

        writer.write_record(row).map_err(to_error)?;
    }

    writer.flush().map_err(|e| to_error(e.into()))?;

    debug!(
        rows = records.len(),
        columns = header.len(),
        "Wrote {}",
        path.display()
    );

    Ok(records.len())
}

/// Reads one column back out of a CSV file, in row order.
///
/// A missing column reads as no cells at all.
pub fn read_column(path: &Path, column: &str) -> AppResult<Vec<String>> {
    let to_error = |source: csv::Error| Error::ReadBack {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(to_error)?;

    let Some(index) = reader
        .headers()
        .map_err(to_error)?
        .iter()
        .position(|name| name == column)
    else {
        return Ok(vec![]);
    };

    reader
        .records()
        .map(|row| -> AppResult<String> {
            let row = row.map_err(to_error)?;

            Ok(row.get(index).unwrap_or_default().to_owned())
        })
        .collect()
}

// private

/// Strings go in as they are, nested structures as compact JSON.
fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
