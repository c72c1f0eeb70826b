pub mod history;
pub mod period;
pub mod station;
pub mod value;
pub mod variable;

/// Id generated by the store for a new row.
pub type RowId = i64;

/// Identifier of a station history in the external observation catalog.
pub type HistoryId = i32;

pub use history::{HistoryRecord, PeriodColumns};
pub use period::{ClimatologyPeriod, PeriodRow, ResolvedPeriod};
pub use station::{
    ClimatologicalValue, HistoryRole, NewStation, StationHistoryLink, StationRow, StationType,
    ValueRow,
};
pub use value::ValueRecord;
pub use variable::{ClimateVariable, VariableDefinition, VariableRow, VARIABLE_DEFINITIONS};
