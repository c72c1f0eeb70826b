use tracing::debug;

use crate::error::Result;
use crate::models::{HistoryId, HistoryRole, RowId, StationHistoryLink};
use crate::store::ClimoStore;

pub fn link_base(
    store: &mut dyn ClimoStore,
    station_id: RowId,
    history_id: HistoryId,
) -> Result<()> {
    debug!("Linking station {} to base history {}", station_id, history_id);
    store.insert_history_link(StationHistoryLink {
        climo_station_id: station_id,
        history_id,
        role: HistoryRole::Base,
    })
}

/// One joint link per present id, in column order. Absent slots are
/// skipped and repeated ids are linked repeatedly. Returns links written.
pub fn link_joint(
    store: &mut dyn ClimoStore,
    station_id: RowId,
    joint_ids: &[Option<HistoryId>],
) -> Result<usize> {
    let mut linked = 0;
    for history_id in joint_ids.iter().flatten() {
        store.insert_history_link(StationHistoryLink {
            climo_station_id: station_id,
            history_id: *history_id,
            role: HistoryRole::Joint,
        })?;
        linked += 1;
    }

    if linked > 0 {
        debug!("Linked station {} to {} joint histories", station_id, linked);
    }
    Ok(linked)
}
