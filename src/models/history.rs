use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{ImportError, Result};
use crate::models::{ClimatologyPeriod, HistoryId};
use crate::utils::constants::{JOINT_STATION_SLOTS, MONTHS_PER_YEAR, SENTINEL_NAN};

/// True for the cell values that stand for "absent".
pub fn is_sentinel(value: &str) -> bool {
    value == SENTINEL_NAN || value.is_empty()
}

pub fn monthly_years_column(period: ClimatologyPeriod, month: usize) -> String {
    format!("monthlyyears_{}_{}", period.column_year(), month)
}

pub fn joint_station_column(period: ClimatologyPeriod, slot: usize) -> String {
    format!("joint_stations_{}_{}", period.column_year(), slot)
}

/// Header row of a station info file, in column order.
pub fn station_info_headers() -> Vec<String> {
    let mut headers: Vec<String> = ["history_id", "lat", "lon", "elev", "basin"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for period in ClimatologyPeriod::ALL {
        headers.extend((1..=MONTHS_PER_YEAR).map(|m| monthly_years_column(period, m)));
        headers.extend((1..=JOINT_STATION_SLOTS).map(|s| joint_station_column(period, s)));
    }
    headers
}

fn field<'a>(fields: &'a HashMap<String, String>, name: &str, line: u64) -> Result<&'a str> {
    fields
        .get(name)
        .map(|s| s.as_str())
        .ok_or_else(|| ImportError::malformed(line, name, "", "missing column"))
}

fn parse_required<T>(fields: &HashMap<String, String>, name: &str, line: u64) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = field(fields, name, line)?;
    if is_sentinel(raw) {
        return Err(ImportError::malformed(line, name, raw, "required value is absent"));
    }
    raw.parse::<T>()
        .map_err(|e| ImportError::malformed(line, name, raw, e.to_string()))
}

/// A required float that must also be finite ("inf" parses as f64).
fn parse_required_finite(
    fields: &HashMap<String, String>,
    name: &str,
    line: u64,
) -> Result<f64> {
    let value: f64 = parse_required(fields, name, line)?;
    if !value.is_finite() {
        let raw = field(fields, name, line)?;
        return Err(ImportError::malformed(line, name, raw, "value is not finite"));
    }
    Ok(value)
}

/// Parse an integer cell where "NaN" and "" mean absent.
pub fn parse_optional_int(
    fields: &HashMap<String, String>,
    name: &str,
    line: u64,
) -> Result<Option<i32>> {
    let raw = field(fields, name, line)?;
    if is_sentinel(raw) {
        return Ok(None);
    }
    raw.parse::<i32>()
        .map(Some)
        .map_err(|e| ImportError::malformed(line, name, raw, e.to_string()))
}

/// Contributing years and joint stations for one climatology period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodColumns {
    pub monthly_contributing_years: [Option<i32>; MONTHS_PER_YEAR],
    pub joint_station_ids: [Option<HistoryId>; JOINT_STATION_SLOTS],
}

impl PeriodColumns {
    /// Complete coverage: every month has a contributing-year count.
    /// A count of zero is a present value.
    pub fn has_data(&self) -> bool {
        self.monthly_contributing_years.iter().all(Option::is_some)
    }

    pub fn is_composite(&self) -> bool {
        self.joint_station_ids.iter().any(Option::is_some)
    }

    fn parse(
        fields: &HashMap<String, String>,
        period: ClimatologyPeriod,
        line: u64,
    ) -> Result<Self> {
        let mut columns = PeriodColumns::default();
        for (i, slot) in columns.monthly_contributing_years.iter_mut().enumerate() {
            *slot = parse_optional_int(fields, &monthly_years_column(period, i + 1), line)?;
        }
        for (i, slot) in columns.joint_station_ids.iter_mut().enumerate() {
            *slot = parse_optional_int(fields, &joint_station_column(period, i + 1), line)?;
        }
        Ok(columns)
    }
}

/// One row of a composite station info file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub history_id: HistoryId,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub basin_id: Option<i32>,
    pub periods: [PeriodColumns; 3],
}

impl HistoryRecord {
    /// Build a record from a header-keyed row. `line` is only used in errors.
    pub fn from_fields(fields: &HashMap<String, String>, line: u64) -> Result<Self> {
        Ok(Self {
            history_id: parse_required(fields, "history_id", line)?,
            latitude: parse_required_finite(fields, "lat", line)?,
            longitude: parse_required_finite(fields, "lon", line)?,
            elevation: parse_required_finite(fields, "elev", line)?,
            basin_id: parse_optional_int(fields, "basin", line)?,
            periods: [
                PeriodColumns::parse(fields, ClimatologyPeriod::P1971To2000, line)?,
                PeriodColumns::parse(fields, ClimatologyPeriod::P1981To2010, line)?,
                PeriodColumns::parse(fields, ClimatologyPeriod::P1991To2020, line)?,
            ],
        })
    }

    pub fn period(&self, period: ClimatologyPeriod) -> &PeriodColumns {
        &self.periods[period.index()]
    }

    pub fn has_data(&self, period: ClimatologyPeriod) -> bool {
        self.period(period).has_data()
    }

    pub fn periods_with_data(&self) -> impl Iterator<Item = ClimatologyPeriod> + '_ {
        ClimatologyPeriod::ALL
            .into_iter()
            .filter(move |p| self.has_data(*p))
    }
}
