use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::error::{FileKind, ImportError, Result};
use crate::models::HistoryId;
use crate::readers::csv_rows::{open_csv, parse_rows, require_columns};
use crate::utils::constants::HISTORY_CATALOG_COLUMN;

/// Load the set of history ids known to the observation catalog from a
/// CSV export with a `history_id` column. Other columns are ignored.
pub fn read_history_catalog(path: &Path) -> Result<HashSet<HistoryId>> {
    let mut reader = open_csv(path, FileKind::HistoryCatalog)?;
    require_columns(reader.headers()?, &[HISTORY_CATALOG_COLUMN])?;

    let ids = parse_rows(&mut reader, |fields, line| {
        let raw = fields
            .get(HISTORY_CATALOG_COLUMN)
            .map(String::as_str)
            .unwrap_or_default();
        raw.parse::<HistoryId>()
            .map_err(|e| ImportError::malformed(line, HISTORY_CATALOG_COLUMN, raw, e.to_string()))
    })?;

    let catalog: HashSet<HistoryId> = ids.into_iter().collect();
    info!("Loaded {} history ids from {}", catalog.len(), path.display());
    Ok(catalog)
}
