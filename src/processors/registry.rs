use std::collections::HashMap;
use tracing::{debug, info};

use crate::error::{ImportError, Result};
use crate::models::{
    ClimateVariable, ClimatologyPeriod, ResolvedPeriod, RowId, VariableRow, VARIABLE_DEFINITIONS,
};
use crate::store::ClimoStore;

/// Generated ids of the three period rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodIds {
    ids: [RowId; 3],
}

impl PeriodIds {
    /// Look the three periods up by date range.
    pub fn resolve(store: &dyn ClimoStore) -> Result<Self> {
        let mut ids = [0; 3];
        for period in ClimatologyPeriod::ALL {
            let row = store
                .find_period(period.start_date(), period.end_date())?
                .ok_or_else(|| ImportError::PeriodNotFound {
                    key: format!("{} to {}", period.start_date(), period.end_date()),
                })?;
            ids[period.index()] = row.id;
        }
        Ok(Self { ids })
    }

    pub fn id(&self, period: ClimatologyPeriod) -> RowId {
        self.ids[period.index()]
    }

    pub fn resolved(&self, period: ClimatologyPeriod) -> ResolvedPeriod {
        ResolvedPeriod {
            id: self.id(period),
            period,
        }
    }
}

/// Create whichever of the three period rows are missing. Existing rows
/// are reused, so running this twice creates nothing the second time.
pub fn ensure_periods(store: &mut dyn ClimoStore) -> Result<PeriodIds> {
    let mut created = 0;
    for period in ClimatologyPeriod::ALL {
        if store
            .find_period(period.start_date(), period.end_date())?
            .is_none()
        {
            let id = store.insert_period(period.start_date(), period.end_date())?;
            debug!("Created climatology period {} with id {}", period, id);
            created += 1;
        }
    }
    info!(
        "Climatology periods ready ({} created, {} existing)",
        created,
        ClimatologyPeriod::ALL.len() - created
    );
    PeriodIds::resolve(store)
}

/// Create whichever variable rows are missing; returns net name -> id.
pub fn ensure_variables(store: &mut dyn ClimoStore) -> Result<HashMap<String, RowId>> {
    let mut ids = HashMap::with_capacity(VARIABLE_DEFINITIONS.len());
    let mut created = Vec::new();
    for definition in &VARIABLE_DEFINITIONS {
        let id = match store.find_variable(definition.net_var_name)? {
            Some(row) => row.id,
            None => {
                created.push(definition.net_var_name);
                store.insert_variable(definition)?
            }
        };
        ids.insert(definition.net_var_name.to_string(), id);
    }
    info!(
        "Climatology variables ready ({} created: {:?})",
        created.len(),
        created
    );
    Ok(ids)
}

/// Map a period id back to its window. Fails if the id is unknown or its
/// dates are not one of the three fixed ranges.
pub fn resolve_period(store: &dyn ClimoStore, period_id: RowId) -> Result<ResolvedPeriod> {
    let row = store
        .get_period(period_id)?
        .ok_or_else(|| ImportError::PeriodNotFound {
            key: format!("id {}", period_id),
        })?;
    let period = row.period().ok_or_else(|| ImportError::PeriodNotFound {
        key: format!("unknown range {} to {}", row.start_date, row.end_date),
    })?;
    Ok(ResolvedPeriod {
        id: period_id,
        period,
    })
}

pub fn resolve_variable(store: &dyn ClimoStore, variable: ClimateVariable) -> Result<VariableRow> {
    store
        .find_variable(variable.net_var_name())?
        .ok_or_else(|| ImportError::VariableNotFound {
            net_var_name: variable.net_var_name().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    #[test]
    fn test_ensure_periods_creates_three() {
        let mut store = MemoryStore::new();
        let ids = ensure_periods(&mut store).unwrap();

        assert_eq!(store.tables().periods.len(), 3);
        let start = NaiveDate::from_ymd_opt(1981, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2010, 12, 31).unwrap();
        let row = store.find_period(start, end).unwrap().unwrap();
        assert_eq!(row.id, ids.id(ClimatologyPeriod::P1981To2010));
    }

    #[test]
    fn test_ensure_periods_is_idempotent() {
        let mut store = MemoryStore::new();
        let first = ensure_periods(&mut store).unwrap();
        let second = ensure_periods(&mut store).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.tables().periods.len(), 3);
    }

    #[test]
    fn test_ensure_variables_is_idempotent() {
        let mut store = MemoryStore::new();
        let first = ensure_variables(&mut store).unwrap();
        let second = ensure_variables(&mut store).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.tables().variables.len(), 4);
        assert!(first.contains_key("T_mean_Climatology"));
        let ppt = resolve_variable(&store, ClimateVariable::Precipitation).unwrap();
        assert_eq!(ppt.unit, "mm");
        assert_eq!(ppt.id, first["Precip_Climatology"]);
    }

    #[test]
    fn test_lookups_before_registries() {
        let store = MemoryStore::new();

        assert!(matches!(
            PeriodIds::resolve(&store),
            Err(ImportError::PeriodNotFound { .. })
        ));
        assert!(matches!(
            resolve_variable(&store, ClimateVariable::MinTemperature),
            Err(ImportError::VariableNotFound { .. })
        ));
        assert!(resolve_period(&store, 1).unwrap_err().is_reference_error());
    }

    #[test]
    fn test_resolve_period_rejects_unknown_range() {
        let mut store = MemoryStore::new();
        let id = store
            .insert_period(
                NaiveDate::from_ymd_opt(1961, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(1990, 12, 31).unwrap(),
            )
            .unwrap();

        assert!(matches!(
            resolve_period(&store, id),
            Err(ImportError::PeriodNotFound { .. })
        ));
    }
}
