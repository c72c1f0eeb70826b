use std::path::Path;
use tracing::{error, info};

use crate::error::{FileKind, Result};
use crate::models::history::station_info_headers;
use crate::models::HistoryRecord;
use crate::readers::csv_rows::{open_csv, parse_rows, require_columns};

/// Reads composite station info files into history records. The header
/// row must carry every expected column.
#[derive(Debug, Clone, Copy, Default)]
pub struct StationInfoReader;

impl StationInfoReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_history_records(&self, path: &Path) -> Result<Vec<HistoryRecord>> {
        info!("Reading station info file: {}", path.display());

        let mut reader = open_csv(path, FileKind::StationInfo).inspect_err(|e| {
            error!("Cannot open station info file {}: {}", path.display(), e);
        })?;

        require_columns(reader.headers()?, &station_info_headers())?;

        let records = parse_rows(&mut reader, HistoryRecord::from_fields).inspect_err(|e| {
            error!("Error reading station info file {}: {}", path.display(), e);
        })?;

        info!(
            "Read {} history records from {}",
            records.len(),
            path.display()
        );
        Ok(records)
    }
}
