use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ImportError, Result};
use crate::models::{
    ClimatologicalValue, HistoryId, NewStation, PeriodRow, RowId, StationHistoryLink, StationRow,
    ValueRow, VariableDefinition, VariableRow,
};
use crate::store::tables::{next_id, ClimoTables};
use crate::store::ClimoStore;

/// In-memory transactional store, optionally backed by a JSON snapshot.
///
/// Writes land in a working copy that queries also read from. `commit`
/// publishes the working copy (and writes the snapshot file atomically when
/// one is configured); `rollback` restores the last committed state.
#[derive(Debug, Default)]
pub struct MemoryStore {
    working: ClimoTables,
    committed: ClimoTables,
    snapshot_path: Option<PathBuf>,
    history_catalog: Option<HashSet<HistoryId>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a file-backed store. A missing file starts an empty store that
    /// is created on the first commit.
    pub fn open(path: &Path) -> Result<Self> {
        let tables = if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let mut tables: ClimoTables = serde_json::from_reader(reader)?;
            tables.reindex();
            info!(
                "Opened store {} ({} stations, {} values)",
                path.display(),
                tables.stations.len(),
                tables.values.len()
            );
            tables
        } else {
            info!("Creating new store at {}", path.display());
            ClimoTables::default()
        };

        Ok(Self {
            working: tables.clone(),
            committed: tables,
            snapshot_path: Some(path.to_path_buf()),
            history_catalog: None,
        })
    }

    /// Require every linked history id to be present in `catalog`.
    pub fn with_history_catalog(mut self, catalog: HashSet<HistoryId>) -> Self {
        self.history_catalog = Some(catalog);
        self
    }

    /// Committed state.
    pub fn committed(&self) -> &ClimoTables {
        &self.committed
    }

    /// Working state, including rows staged since the last commit.
    pub fn tables(&self) -> &ClimoTables {
        &self.working
    }

    pub fn has_uncommitted_changes(&self) -> bool {
        self.working != self.committed
    }

    fn write_snapshot(&self, path: &Path) -> Result<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, &self.working)?;
            writer.flush()?;
        }
        tmp.persist(path).map_err(|e| ImportError::Io(e.error))?;
        Ok(())
    }

    fn require_station(&self, station_id: RowId) -> Result<&StationRow> {
        self.working
            .station(station_id)
            .ok_or_else(|| ImportError::ReferenceNotFound {
                table: "climo_station",
                key: station_id.to_string(),
            })
    }

    fn require_history(&self, history_id: HistoryId) -> Result<()> {
        match &self.history_catalog {
            Some(catalog) if !catalog.contains(&history_id) => Err(ImportError::ReferenceNotFound {
                table: "history",
                key: history_id.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl ClimoStore for MemoryStore {
    fn insert_period(&mut self, start: NaiveDate, end: NaiveDate) -> Result<RowId> {
        if self.find_period(start, end)?.is_some() {
            return Err(ImportError::DuplicateReference {
                table: "climo_period",
                key: format!("{}..{}", start, end),
            });
        }
        let id = next_id(self.working.periods.len());
        self.working.periods.push(PeriodRow {
            id,
            start_date: start,
            end_date: end,
        });
        Ok(id)
    }

    fn find_period(&self, start: NaiveDate, end: NaiveDate) -> Result<Option<PeriodRow>> {
        Ok(self
            .working
            .periods
            .iter()
            .find(|p| p.start_date == start && p.end_date == end)
            .cloned())
    }

    fn get_period(&self, id: RowId) -> Result<Option<PeriodRow>> {
        Ok(self.working.period(id).cloned())
    }

    fn insert_variable(&mut self, definition: &VariableDefinition) -> Result<RowId> {
        if self.find_variable(definition.net_var_name)?.is_some() {
            return Err(ImportError::DuplicateReference {
                table: "climo_variable",
                key: definition.net_var_name.to_string(),
            });
        }
        let id = next_id(self.working.variables.len());
        self.working
            .variables
            .push(VariableRow::from_definition(id, definition));
        Ok(id)
    }

    fn find_variable(&self, net_var_name: &str) -> Result<Option<VariableRow>> {
        Ok(self
            .working
            .variables
            .iter()
            .find(|v| v.net_var_name == net_var_name)
            .cloned())
    }

    fn insert_station(&mut self, station: NewStation) -> Result<RowId> {
        if self.working.period(station.climo_period_id).is_none() {
            return Err(ImportError::ReferenceNotFound {
                table: "climo_period",
                key: station.climo_period_id.to_string(),
            });
        }
        let id = next_id(self.working.stations.len());
        self.working.stations.push(StationRow {
            id,
            station_type: station.station_type,
            basin_id: station.basin_id,
            comments: station.comments,
            climo_period_id: station.climo_period_id,
        });
        Ok(id)
    }

    fn insert_history_link(&mut self, link: StationHistoryLink) -> Result<()> {
        self.require_station(link.climo_station_id)?;
        self.require_history(link.history_id)?;
        self.working.station_histories.push(link);
        Ok(())
    }

    fn insert_values(&mut self, values: Vec<ClimatologicalValue>) -> Result<usize> {
        // Check every row before writing any, so a bad batch leaves no trace.
        for value in &values {
            self.require_station(value.climo_station_id)?;
            if self.working.variable(value.climo_variable_id).is_none() {
                return Err(ImportError::ReferenceNotFound {
                    table: "climo_variable",
                    key: value.climo_variable_id.to_string(),
                });
            }
        }

        let count = values.len();
        for value in values {
            let id = next_id(self.working.values.len());
            self.working.record_values(value.climo_station_id, 1);
            self.working.values.push(ValueRow { id, value });
        }
        Ok(count)
    }

    fn count_values(&self, station_id: RowId) -> Result<usize> {
        Ok(self.working.value_count(station_id))
    }

    fn commit(&mut self) -> Result<()> {
        if let Some(path) = &self.snapshot_path {
            self.write_snapshot(path)?;
            debug!("Wrote store snapshot {}", path.display());
        }
        self.committed = self.working.clone();
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        if self.has_uncommitted_changes() {
            warn!(
                "Rolling back {} staged stations and {} staged values",
                self.working.stations.len() - self.committed.stations.len(),
                self.working.values.len() - self.committed.values.len()
            );
        }
        self.working = self.committed.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClimatologyPeriod, HistoryRole, StationType, VARIABLE_DEFINITIONS};
    use tempfile::TempDir;

    fn seeded() -> (MemoryStore, RowId, RowId) {
        let mut store = MemoryStore::new();
        let p = ClimatologyPeriod::P1971To2000;
        let period_id = store.insert_period(p.start_date(), p.end_date()).unwrap();
        let variable_id = store.insert_variable(&VARIABLE_DEFINITIONS[0]).unwrap();
        (store, period_id, variable_id)
    }

    fn station(period_id: RowId) -> NewStation {
        NewStation {
            station_type: StationType::LongRecord,
            basin_id: None,
            comments: String::new(),
            climo_period_id: period_id,
        }
    }

    #[test]
    fn test_generated_ids_are_visible_before_commit() {
        let (mut store, period_id, _) = seeded();
        let station_id = store.insert_station(station(period_id)).unwrap();

        assert_eq!(station_id, 1);
        assert_eq!(store.get_period(period_id).unwrap().unwrap().id, period_id);
        assert!(store.committed().stations.is_empty());
        assert!(store.has_uncommitted_changes());
    }

    #[test]
    fn test_duplicate_natural_keys() {
        let (mut store, _, _) = seeded();
        let p = ClimatologyPeriod::P1971To2000;

        assert!(matches!(
            store.insert_period(p.start_date(), p.end_date()),
            Err(ImportError::DuplicateReference { table: "climo_period", .. })
        ));
        assert!(matches!(
            store.insert_variable(&VARIABLE_DEFINITIONS[0]),
            Err(ImportError::DuplicateReference { table: "climo_variable", .. })
        ));
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let (mut store, period_id, variable_id) = seeded();

        assert!(matches!(
            store.insert_station(station(period_id + 10)),
            Err(ImportError::ReferenceNotFound { table: "climo_period", .. })
        ));
        assert!(store
            .insert_history_link(StationHistoryLink {
                climo_station_id: 99,
                history_id: 1,
                role: HistoryRole::Base,
            })
            .is_err());

        let station_id = store.insert_station(station(period_id)).unwrap();
        let bad_batch = vec![
            ClimatologicalValue {
                climo_station_id: station_id,
                climo_variable_id: variable_id,
                value_time: "1971-01-15".into(),
                value: 1.0,
                num_contributing_years: 30,
            },
            ClimatologicalValue {
                climo_station_id: station_id,
                climo_variable_id: variable_id + 5,
                value_time: "1971-02-15".into(),
                value: 2.0,
                num_contributing_years: 30,
            },
        ];
        assert!(store.insert_values(bad_batch).is_err());
        assert_eq!(store.count_values(station_id).unwrap(), 0);
    }

    #[test]
    fn test_history_catalog() {
        let (store, period_id, _) = seeded();
        let mut store = store.with_history_catalog(HashSet::from([100, 101]));
        let station_id = store.insert_station(station(period_id)).unwrap();

        let link = |history_id| StationHistoryLink {
            climo_station_id: station_id,
            history_id,
            role: HistoryRole::Joint,
        };
        assert!(store.insert_history_link(link(101)).is_ok());
        assert!(matches!(
            store.insert_history_link(link(555)),
            Err(ImportError::ReferenceNotFound { table: "history", .. })
        ));
    }

    #[test]
    fn test_rollback_restores_committed_state() {
        let (mut store, period_id, _) = seeded();
        store.commit().unwrap();

        store.insert_station(station(period_id)).unwrap();
        store.rollback().unwrap();

        assert!(store.tables().stations.is_empty());
        assert_eq!(store.tables().periods.len(), 1);
        assert!(!store.has_uncommitted_changes());
    }

    #[test]
    fn test_snapshot_round_trip() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("store").join("climo.json");

        let mut store = MemoryStore::open(&path)?;
        let p = ClimatologyPeriod::P1991To2020;
        let period_id = store.insert_period(p.start_date(), p.end_date())?;
        let variable_id = store.insert_variable(&VARIABLE_DEFINITIONS[2])?;
        let station_id = store.insert_station(station(period_id))?;
        store.insert_values(vec![ClimatologicalValue {
            climo_station_id: station_id,
            climo_variable_id: variable_id,
            value_time: "1991-01-15".into(),
            value: -4.5,
            num_contributing_years: 28,
        }])?;
        assert!(!path.exists());
        store.commit()?;
        assert!(path.exists());

        let reopened = MemoryStore::open(&path)?;
        assert_eq!(reopened.committed(), store.committed());
        assert_eq!(reopened.count_values(station_id)?, 1);
        assert_eq!(reopened.committed().periods[0].period(), Some(p));
        Ok(())
    }
}
