use serde::{Deserialize, Serialize};

use crate::models::{HistoryId, RowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StationType {
    LongRecord,
    Composite,
    /// Legacy PRISM climatologies; never produced by this importer.
    Prism,
}

impl StationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StationType::LongRecord => "long-record",
            StationType::Composite => "composite",
            StationType::Prism => "prism",
        }
    }

    pub fn from_joint_presence(has_joint: bool) -> Self {
        if has_joint {
            StationType::Composite
        } else {
            StationType::LongRecord
        }
    }
}

impl std::fmt::Display for StationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Station row before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStation {
    pub station_type: StationType,
    pub basin_id: Option<i32>,
    pub comments: String,
    pub climo_period_id: RowId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRow {
    pub id: RowId,
    #[serde(rename = "type")]
    pub station_type: StationType,
    pub basin_id: Option<i32>,
    pub comments: String,
    pub climo_period_id: RowId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    Base,
    Joint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationHistoryLink {
    pub climo_station_id: RowId,
    pub history_id: HistoryId,
    pub role: HistoryRole,
}

/// Value row before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimatologicalValue {
    pub climo_station_id: RowId,
    pub climo_variable_id: RowId,
    pub value_time: String,
    pub value: f64,
    pub num_contributing_years: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRow {
    pub id: RowId,
    #[serde(flatten)]
    pub value: ClimatologicalValue,
}
