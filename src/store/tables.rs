use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{
    HistoryRole, PeriodRow, RowId, StationHistoryLink, StationRow, StationType, ValueRow,
    VariableRow,
};

/// The five climatology tables. Row ids are dense and start at 1, so a
/// row with id `n` lives at index `n - 1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClimoTables {
    pub periods: Vec<PeriodRow>,
    pub variables: Vec<VariableRow>,
    pub stations: Vec<StationRow>,
    pub station_histories: Vec<StationHistoryLink>,
    pub values: Vec<ValueRow>,

    #[serde(skip)]
    value_counts: HashMap<RowId, usize>,
}

/// Row counts for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub periods: usize,
    pub variables: usize,
    pub stations: usize,
    pub composite_stations: usize,
    pub long_record_stations: usize,
    pub base_links: usize,
    pub joint_links: usize,
    pub values: usize,
    pub stations_per_period: Vec<(String, usize)>,
}

pub(crate) fn next_id(len: usize) -> RowId {
    len as RowId + 1
}

fn by_id<T>(rows: &[T], id: RowId, id_of: impl Fn(&T) -> RowId) -> Option<&T> {
    if id < 1 {
        return None;
    }
    rows.get((id - 1) as usize).filter(|row| id_of(row) == id)
}

impl ClimoTables {
    pub fn period(&self, id: RowId) -> Option<&PeriodRow> {
        by_id(&self.periods, id, |p| p.id)
    }

    pub fn variable(&self, id: RowId) -> Option<&VariableRow> {
        by_id(&self.variables, id, |v| v.id)
    }

    pub fn station(&self, id: RowId) -> Option<&StationRow> {
        by_id(&self.stations, id, |s| s.id)
    }

    pub fn links_for(&self, station_id: RowId) -> impl Iterator<Item = &StationHistoryLink> {
        self.station_histories
            .iter()
            .filter(move |l| l.climo_station_id == station_id)
    }

    pub fn values_for(&self, station_id: RowId) -> impl Iterator<Item = &ValueRow> {
        self.values
            .iter()
            .filter(move |v| v.value.climo_station_id == station_id)
    }

    pub fn value_count(&self, station_id: RowId) -> usize {
        self.value_counts.get(&station_id).copied().unwrap_or(0)
    }

    pub(crate) fn record_values(&mut self, station_id: RowId, count: usize) {
        *self.value_counts.entry(station_id).or_default() += count;
    }

    /// Rebuild the derived value counts after deserializing.
    pub(crate) fn reindex(&mut self) {
        self.value_counts.clear();
        for row in &self.values {
            *self.value_counts.entry(row.value.climo_station_id).or_default() += 1;
        }
    }

    pub fn summary(&self) -> TableSummary {
        let stations_per_period = self
            .periods
            .iter()
            .map(|p| {
                let label = p
                    .period()
                    .map(|cp| cp.to_string())
                    .unwrap_or_else(|| format!("{}..{}", p.start_date, p.end_date));
                let count = self
                    .stations
                    .iter()
                    .filter(|s| s.climo_period_id == p.id)
                    .count();
                (label, count)
            })
            .collect();

        TableSummary {
            periods: self.periods.len(),
            variables: self.variables.len(),
            stations: self.stations.len(),
            composite_stations: self
                .stations
                .iter()
                .filter(|s| s.station_type == StationType::Composite)
                .count(),
            long_record_stations: self
                .stations
                .iter()
                .filter(|s| s.station_type == StationType::LongRecord)
                .count(),
            base_links: self
                .station_histories
                .iter()
                .filter(|l| l.role == HistoryRole::Base)
                .count(),
            joint_links: self
                .station_histories
                .iter()
                .filter(|l| l.role == HistoryRole::Joint)
                .count(),
            values: self.values.len(),
            stations_per_period,
        }
    }
}

impl TableSummary {
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Climatology Store ===\n");
        out.push_str(&format!("Periods: {}\n", self.periods));
        out.push_str(&format!("Variables: {}\n", self.variables));
        out.push_str(&format!(
            "Stations: {} ({} composite, {} long-record)\n",
            self.stations, self.composite_stations, self.long_record_stations
        ));
        for (label, count) in &self.stations_per_period {
            out.push_str(&format!("  {}: {}\n", label, count));
        }
        out.push_str(&format!(
            "History links: {} base, {} joint\n",
            self.base_links, self.joint_links
        ));
        out.push_str(&format!("Values: {}\n", self.values));
        out
    }
}
