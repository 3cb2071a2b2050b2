use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::calculation::literal;
use crate::io::csv_dump;
use crate::prelude::*;

pub const SUMMATION_COLUMN: &str = "summation";

/// Pulls every `summation.attrs.bot_j` out of a dumped feed, in row order.
///
/// Rows that don't have one, or whose summation cell can't be parsed, are skipped.
pub fn bot_j_values_from_csv(path: &Path) -> AppResult<Vec<String>> {
    let cells = csv_dump::read_column(path, SUMMATION_COLUMN)?;

    Ok(bot_j_values(&cells))
}

pub fn bot_j_values(summation_cells: &[String]) -> Vec<String> {
    summation_cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| !cell.is_empty())
        .filter_map(|(index, cell)| match literal::parse(cell) {
            Ok(summation) => bot_j(&summation).map(str::to_owned),
            Err(e) => {
                // Row 1 is the header.
                debug!(row = index + 2, "Skipping unparsable summation: {e}");
                None
            }
        })
        .collect()
}

// private

fn bot_j(summation: &Value) -> Option<&str> {
    summation
        .get("attrs")?
        .get("bot_j")?
        .as_str()
        .filter(|value| !value.is_empty())
}
