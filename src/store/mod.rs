//! Record store used by the import pipeline.
//!
//! The pipeline only talks to [`ClimoStore`]. Inserts hand back the
//! generated id straight away so dependent rows can refer to it, but nothing
//! is durable until [`ClimoStore::commit`]. [`ClimoStore::rollback`] drops
//! everything staged since the last commit.

pub mod memory;
pub mod tables;

pub use memory::MemoryStore;
pub use tables::ClimoTables;

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{
    ClimatologicalValue, NewStation, PeriodRow, RowId, StationHistoryLink, VariableDefinition,
    VariableRow,
};

pub trait ClimoStore {
    /// Fails with `DuplicateReference` if the date range already exists.
    fn insert_period(&mut self, start: NaiveDate, end: NaiveDate) -> Result<RowId>;

    fn find_period(&self, start: NaiveDate, end: NaiveDate) -> Result<Option<PeriodRow>>;

    fn get_period(&self, id: RowId) -> Result<Option<PeriodRow>>;

    /// Fails with `DuplicateReference` if the net variable name already exists.
    fn insert_variable(&mut self, definition: &VariableDefinition) -> Result<RowId>;

    fn find_variable(&self, net_var_name: &str) -> Result<Option<VariableRow>>;

    fn insert_station(&mut self, station: NewStation) -> Result<RowId>;

    fn insert_history_link(&mut self, link: StationHistoryLink) -> Result<()>;

    /// Bulk insert; returns the number of rows written.
    fn insert_values(&mut self, values: Vec<ClimatologicalValue>) -> Result<usize>;

    fn count_values(&self, station_id: RowId) -> Result<usize>;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;
}
