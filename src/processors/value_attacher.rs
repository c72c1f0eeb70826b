use tracing::{debug, error};

use crate::error::{ImportError, Result};
use crate::models::{ClimateVariable, ClimatologicalValue, ClimatologyPeriod, HistoryId, RowId};
use crate::processors::registry::resolve_variable;
use crate::readers::ValueFileReader;
use crate::store::ClimoStore;
use crate::utils::constants::MONTHS_PER_YEAR;
use crate::utils::PathResolver;

/// Contributing years for the `index`-th value row; 0 when out of range or absent.
pub fn contributing_years(monthly_years: &[Option<i32>], index: usize) -> i32 {
    monthly_years.get(index).copied().flatten().unwrap_or(0)
}

/// Reads a station's monthly value file and stores one value row per line.
pub struct ValueAttacher<'a> {
    paths: &'a PathResolver,
    reader: ValueFileReader,
    strict_month_count: bool,
}

impl<'a> ValueAttacher<'a> {
    pub fn new(paths: &'a PathResolver) -> Self {
        Self {
            paths,
            reader: ValueFileReader::new(),
            strict_month_count: true,
        }
    }

    pub fn with_strict_month_count(mut self, strict: bool) -> Self {
        self.strict_month_count = strict;
        self
    }

    /// Rows are taken in file order and paired with `monthly_years` by
    /// position; no date-based reordering is done. Returns rows stored.
    pub fn attach_values(
        &self,
        store: &mut dyn ClimoStore,
        variable: ClimateVariable,
        period: ClimatologyPeriod,
        station_id: RowId,
        history_id: HistoryId,
        monthly_years: &[Option<i32>],
    ) -> Result<usize> {
        let variable_row = resolve_variable(store, variable)?;

        let path = self.paths.value_file_path(variable, period, history_id);
        let records = self.reader.read_values(&path).inspect_err(|e| {
            error!(
                "Failed to read value file for history {} ({}, {}): {}",
                history_id, variable, period, e
            );
        })?;

        if self.strict_month_count && records.len() != MONTHS_PER_YEAR {
            return Err(ImportError::DataIntegrityMismatch {
                station_id,
                expected: MONTHS_PER_YEAR,
                found: records.len(),
                detail: format!("monthly value rows in {}", path.display()),
            });
        }

        let values: Vec<ClimatologicalValue> = records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| ClimatologicalValue {
                climo_station_id: station_id,
                climo_variable_id: variable_row.id,
                value_time: record.obs_time,
                value: record.datum,
                num_contributing_years: contributing_years(monthly_years, idx),
            })
            .collect();
        let expected = values.len();

        let before = store.count_values(station_id)?;
        store.insert_values(values)?;
        let stored = store.count_values(station_id)? - before;

        if stored != expected {
            return Err(ImportError::DataIntegrityMismatch {
                station_id,
                expected,
                found: stored,
                detail: format!("stored value rows for {}", path.display()),
            });
        }

        debug!(
            "Attached {} {} values to station {} (history {}, {})",
            stored, variable, station_id, history_id, period
        );
        Ok(stored)
    }
}
