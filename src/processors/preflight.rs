use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ImportError, Result};
use crate::models::{ClimateVariable, ClimatologyPeriod, HistoryId};
use crate::readers::{StationInfoReader, ValueFileReader};
use crate::utils::constants::MONTHS_PER_YEAR;
use crate::utils::{PathResolver, ProgressReporter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreflightIssue {
    pub variable: ClimateVariable,
    pub history_id: Option<HistoryId>,
    pub period: Option<ClimatologyPeriod>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreflightReport {
    pub history_lines: usize,
    pub value_files_checked: usize,
    pub issues: Vec<PreflightIssue>,
}

impl PreflightReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("=== Preflight Report ===\n");
        summary.push_str(&format!("History lines: {}\n", self.history_lines));
        summary.push_str(&format!("Value files checked: {}\n", self.value_files_checked));
        summary.push_str(&format!("Issues: {}\n", self.issues.len()));

        if !self.issues.is_empty() {
            summary.push_str("\nFirst 10 issues:\n");
            for (i, issue) in self.issues.iter().take(10).enumerate() {
                let history = issue
                    .history_id
                    .map(|h| format!(" history {}", h))
                    .unwrap_or_default();
                let period = issue.period.map(|p| format!(" {}", p)).unwrap_or_default();
                summary.push_str(&format!(
                    "  {}. [{}{}{}] {}\n",
                    i + 1,
                    issue.variable,
                    history,
                    period,
                    issue.message
                ));
            }
        }
        summary
    }
}

/// Read-only check that every file an import would need exists and parses.
/// Unlike the import it collects every problem instead of stopping.
pub struct Preflight {
    paths: PathResolver,
    max_workers: usize,
    strict_month_count: bool,
}

impl Preflight {
    pub fn new(paths: PathResolver, max_workers: usize) -> Self {
        Self {
            paths,
            max_workers: max_workers.max(1),
            strict_month_count: true,
        }
    }

    pub fn with_strict_month_count(mut self, strict: bool) -> Self {
        self.strict_month_count = strict;
        self
    }

    pub fn check(
        &self,
        variables: &[ClimateVariable],
        progress: Option<&ProgressReporter>,
    ) -> Result<PreflightReport> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ImportError::Config(e.to_string()))?;

        let mut report = PreflightReport::default();
        for variable in variables {
            let records = match StationInfoReader::new()
                .read_history_records(&self.paths.station_info_path(*variable))
            {
                Ok(records) => records,
                Err(e) => {
                    warn!("Skipping '{}': {}", variable, e);
                    report.issues.push(PreflightIssue {
                        variable: *variable,
                        history_id: None,
                        period: None,
                        message: e.to_string(),
                    });
                    continue;
                }
            };
            report.history_lines += records.len();

            let promised: Vec<(HistoryId, ClimatologyPeriod)> = records
                .iter()
                .flat_map(|r| r.periods_with_data().map(move |p| (r.history_id, p)))
                .collect();
            if let Some(p) = progress {
                p.reset(promised.len() as u64, &format!("Checking {} value files", variable));
            }

            let issues: Vec<PreflightIssue> = pool.install(|| {
                promised
                    .par_iter()
                    .filter_map(|(history_id, period)| {
                        let problem = self.check_value_file(*variable, *period, *history_id);
                        if let Some(p) = progress {
                            p.increment(1);
                        }
                        problem.map(|message| PreflightIssue {
                            variable: *variable,
                            history_id: Some(*history_id),
                            period: Some(*period),
                            message,
                        })
                    })
                    .collect()
            });

            info!(
                "Checked {} value files for '{}': {} issues",
                promised.len(),
                variable,
                issues.len()
            );
            report.value_files_checked += promised.len();
            report.issues.extend(issues);
        }

        if let Some(p) = progress {
            p.finish_with_message("Preflight complete");
        }
        Ok(report)
    }

    fn check_value_file(
        &self,
        variable: ClimateVariable,
        period: ClimatologyPeriod,
        history_id: HistoryId,
    ) -> Option<String> {
        let path = self.paths.value_file_path(variable, period, history_id);
        match ValueFileReader::new().read_values(&path) {
            Ok(rows) if self.strict_month_count && rows.len() != MONTHS_PER_YEAR => Some(format!(
                "expected {} monthly rows in {}, found {}",
                MONTHS_PER_YEAR,
                path.display(),
                rows.len()
            )),
            Ok(_) => None,
            Err(e) => Some(e.to_string()),
        }
    }
}
