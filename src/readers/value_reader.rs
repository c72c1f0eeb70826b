use std::path::Path;
use tracing::{debug, warn};

use crate::error::{FileKind, ImportError, Result};
use crate::models::ValueRecord;
use crate::readers::csv_rows::{open_csv, parse_rows, require_columns};

/// Reads monthly value files (`obs_time,datum`), preserving file order.
#[derive(Debug, Default)]
pub struct ValueFileReader;

impl ValueFileReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_values(&self, path: &Path) -> Result<Vec<ValueRecord>> {
        let mut reader = open_csv(path, FileKind::MonthlyValues).inspect_err(|e| {
            if matches!(e, ImportError::FileNotFound { .. }) {
                warn!("Value file not found: {}", path.display());
            }
        })?;
        require_columns(reader.headers()?, &["obs_time", "datum"])?;

        let values = parse_rows(&mut reader, ValueRecord::from_fields)?;
        debug!("Read {} value rows from {}", values.len(), path.display());
        Ok(values)
    }
}
