use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::RowId;

/// The three fixed 30-year climatology windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimatologyPeriod {
    P1971To2000,
    P1981To2010,
    P1991To2020,
}

impl ClimatologyPeriod {
    /// All periods in processing order.
    pub const ALL: [ClimatologyPeriod; 3] = [
        ClimatologyPeriod::P1971To2000,
        ClimatologyPeriod::P1981To2010,
        ClimatologyPeriod::P1991To2020,
    ];

    pub fn start_year(&self) -> i32 {
        match self {
            ClimatologyPeriod::P1971To2000 => 1971,
            ClimatologyPeriod::P1981To2010 => 1981,
            ClimatologyPeriod::P1991To2020 => 1991,
        }
    }

    pub fn end_year(&self) -> i32 {
        self.start_year() + 29
    }

    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.start_year(), 1, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn end_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.end_year(), 12, 31).unwrap_or(NaiveDate::MAX)
    }

    /// Token used in value file paths, e.g. `1971_2000`.
    pub fn path_token(&self) -> String {
        format!("{}_{}", self.start_year(), self.end_year())
    }

    /// Year used in station info column names, e.g. `monthlyyears_1971_3`.
    pub fn column_year(&self) -> i32 {
        self.start_year()
    }

    pub fn index(&self) -> usize {
        match self {
            ClimatologyPeriod::P1971To2000 => 0,
            ClimatologyPeriod::P1981To2010 => 1,
            ClimatologyPeriod::P1991To2020 => 2,
        }
    }

    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.start_date() == start && p.end_date() == end)
    }
}

impl std::fmt::Display for ClimatologyPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start_year(), self.end_year())
    }
}

/// Stored period row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRow {
    pub id: RowId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl PeriodRow {
    pub fn period(&self) -> Option<ClimatologyPeriod> {
        ClimatologyPeriod::from_dates(self.start_date, self.end_date)
    }
}

/// A generated period id carried together with the window it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPeriod {
    pub id: RowId,
    pub period: ClimatologyPeriod,
}
