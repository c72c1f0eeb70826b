use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::ImportConfig;
use crate::error::Result;
use crate::models::{ClimateVariable, ClimatologyPeriod, HistoryRecord, ResolvedPeriod};
use crate::processors::history_linker::{link_base, link_joint};
use crate::processors::registry::{ensure_periods, ensure_variables, PeriodIds};
use crate::processors::station_builder::build_station;
use crate::processors::value_attacher::ValueAttacher;
use crate::readers::StationInfoReader;
use crate::store::ClimoStore;
use crate::utils::constants::PROGRESS_LOG_INTERVAL;
use crate::utils::{PathResolver, ProgressReporter};

/// Counts for one imported variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableReport {
    pub variable: ClimateVariable,
    pub history_lines: usize,
    /// Indexed like [`ClimatologyPeriod::ALL`].
    pub stations_per_period: [usize; 3],
    pub composite_stations: usize,
    pub long_record_stations: usize,
    pub base_links: usize,
    pub joint_links: usize,
    pub values: usize,
}

impl VariableReport {
    fn new(variable: ClimateVariable) -> Self {
        Self {
            variable,
            history_lines: 0,
            stations_per_period: [0; 3],
            composite_stations: 0,
            long_record_stations: 0,
            base_links: 0,
            joint_links: 0,
            values: 0,
        }
    }

    pub fn stations(&self) -> usize {
        self.stations_per_period.iter().sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub variables: Vec<VariableReport>,
}

impl ImportReport {
    pub fn total_stations(&self) -> usize {
        self.variables.iter().map(VariableReport::stations).sum()
    }

    pub fn total_values(&self) -> usize {
        self.variables.iter().map(|v| v.values).sum()
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("=== Climatology Import Report ===\n");
        for report in &self.variables {
            summary.push_str(&format!(
                "{}: {} history lines -> {} stations ({} composite, {} long-record)\n",
                report.variable,
                report.history_lines,
                report.stations(),
                report.composite_stations,
                report.long_record_stations
            ));
            for period in ClimatologyPeriod::ALL {
                summary.push_str(&format!(
                    "  {}: {} stations\n",
                    period,
                    report.stations_per_period[period.index()]
                ));
            }
            summary.push_str(&format!(
                "  links: {} base, {} joint; values: {}\n",
                report.base_links, report.joint_links, report.values
            ));
        }
        summary.push_str(&format!(
            "Total: {} stations, {} values\n",
            self.total_stations(),
            self.total_values()
        ));
        summary
    }
}

/// Drives station building, history linking and value attachment for every
/// history line of each variable, committing once at the end.
pub struct ImportPipeline {
    paths: PathResolver,
    reader: StationInfoReader,
    variables: Vec<ClimateVariable>,
    strict_month_count: bool,
}

impl ImportPipeline {
    pub fn new(paths: PathResolver) -> Self {
        Self {
            paths,
            reader: StationInfoReader::new(),
            variables: ClimateVariable::ALL.to_vec(),
            strict_month_count: true,
        }
    }

    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new(config.path_resolver()).with_strict_month_count(config.strict_month_count)
    }

    pub fn with_strict_month_count(mut self, strict: bool) -> Self {
        self.strict_month_count = strict;
        self
    }

    /// Restrict the run to a subset; order stays ppt, tmax, tmin.
    pub fn with_variables(mut self, variables: &[ClimateVariable]) -> Self {
        if !variables.is_empty() {
            self.variables = ClimateVariable::ALL
                .into_iter()
                .filter(|v| variables.contains(v))
                .collect();
        }
        self
    }

    pub fn variables(&self) -> &[ClimateVariable] {
        &self.variables
    }

    /// Register periods and variables, import every variable, then commit.
    /// Any failure rolls the store back to its state before the call.
    pub fn run_all(
        &self,
        store: &mut dyn ClimoStore,
        progress: Option<&ProgressReporter>,
    ) -> Result<ImportReport> {
        info!("Starting climatology import for {:?}", self.variables);

        let staged = self.stage_all(store, progress).and_then(|report| {
            store.commit()?;
            Ok(report)
        });

        match staged {
            Ok(report) => {
                info!(
                    "Import committed: {} stations, {} values",
                    report.total_stations(),
                    report.total_values()
                );
                Ok(report)
            }
            Err(e) => {
                error!("Import failed, rolling back: {}", e);
                if let Some(p) = progress {
                    p.abandon();
                }
                store.rollback()?;
                Err(e)
            }
        }
    }

    fn stage_all(
        &self,
        store: &mut dyn ClimoStore,
        progress: Option<&ProgressReporter>,
    ) -> Result<ImportReport> {
        ensure_periods(store)?;
        ensure_variables(store)?;

        let mut report = ImportReport::default();
        for (idx, variable) in self.variables.iter().enumerate() {
            info!(
                "Processing variable {}/{}: '{}'",
                idx + 1,
                self.variables.len(),
                variable
            );
            report.variables.push(self.run_variable(store, *variable, progress)?);
        }
        Ok(report)
    }

    /// Import one variable. Registries must already have run. Stops at the
    /// first failure; nothing is committed here.
    pub fn run_variable(
        &self,
        store: &mut dyn ClimoStore,
        variable: ClimateVariable,
        progress: Option<&ProgressReporter>,
    ) -> Result<VariableReport> {
        let period_ids = PeriodIds::resolve(store)?;
        debug!(
            "Period ids: 1971-2000={}, 1981-2010={}, 1991-2020={}",
            period_ids.id(ClimatologyPeriod::P1971To2000),
            period_ids.id(ClimatologyPeriod::P1981To2010),
            period_ids.id(ClimatologyPeriod::P1991To2020)
        );

        let records = self
            .reader
            .read_history_records(&self.paths.station_info_path(variable))?;
        let total = records.len();
        if let Some(p) = progress {
            p.reset(total as u64, &format!("Importing {} stations", variable));
        }

        let attacher =
            ValueAttacher::new(&self.paths).with_strict_month_count(self.strict_month_count);
        let mut report = VariableReport::new(variable);

        for (idx, record) in records.iter().enumerate() {
            for period in record.periods_with_data() {
                self.import_station(
                    store,
                    &attacher,
                    variable,
                    record,
                    period_ids.resolved(period),
                    &mut report,
                )?;
            }
            report.history_lines += 1;

            if let Some(p) = progress {
                p.increment(1);
            }
            if (idx + 1) % PROGRESS_LOG_INTERVAL == 0 {
                info!("Processed {}/{} history lines for '{}'", idx + 1, total, variable);
            }
        }

        info!(
            "Completed '{}': {} (1971-2000), {} (1981-2010), {} (1991-2020) stations from {} history lines",
            variable,
            report.stations_per_period[0],
            report.stations_per_period[1],
            report.stations_per_period[2],
            report.history_lines
        );
        Ok(report)
    }

    fn import_station(
        &self,
        store: &mut dyn ClimoStore,
        attacher: &ValueAttacher<'_>,
        variable: ClimateVariable,
        record: &HistoryRecord,
        period: ResolvedPeriod,
        report: &mut VariableReport,
    ) -> Result<()> {
        let columns = record.period(period.period);

        let station_id = build_station(store, record, period)?;
        link_base(store, station_id, record.history_id)?;
        let joints = link_joint(store, station_id, &columns.joint_station_ids)?;
        let values = attacher.attach_values(
            store,
            variable,
            period.period,
            station_id,
            record.history_id,
            &columns.monthly_contributing_years,
        )?;

        report.stations_per_period[period.period.index()] += 1;
        if columns.is_composite() {
            report.composite_stations += 1;
        } else {
            report.long_record_stations += 1;
        }
        report.base_links += 1;
        report.joint_links += joints;
        report.values += values;
        Ok(())
    }
}
