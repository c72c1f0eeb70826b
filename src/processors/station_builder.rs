use tracing::debug;

use crate::error::Result;
use crate::models::{HistoryRecord, NewStation, ResolvedPeriod, RowId, StationType};
use crate::processors::registry::resolve_period;
use crate::store::ClimoStore;
use crate::utils::constants::DEFAULT_STATION_COMMENT;

/// Composite if any joint station contributes to this period.
pub fn classify(record: &HistoryRecord, period: ResolvedPeriod) -> StationType {
    StationType::from_joint_presence(record.period(period.period).is_composite())
}

/// Insert the climatological station for one history record and period.
pub fn build_station(
    store: &mut dyn ClimoStore,
    record: &HistoryRecord,
    period: ResolvedPeriod,
) -> Result<RowId> {
    let station_type = classify(record, period);
    let id = store.insert_station(NewStation {
        station_type,
        basin_id: record.basin_id,
        comments: DEFAULT_STATION_COMMENT.to_string(),
        climo_period_id: period.id,
    })?;

    debug!(
        "Created {} station {} for history {} ({})",
        station_type, id, record.history_id, period.period
    );
    Ok(id)
}

/// As [`build_station`], starting from a bare period id.
pub fn build_station_for_period_id(
    store: &mut dyn ClimoStore,
    record: &HistoryRecord,
    period_id: RowId,
) -> Result<RowId> {
    let period = resolve_period(store, period_id)?;
    build_station(store, record, period)
}
