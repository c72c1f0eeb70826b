use std::path::PathBuf;

use crate::models::{ClimateVariable, ClimatologyPeriod, HistoryId};
use crate::utils::constants::{DEFAULT_STATION_INFO_TEMPLATE, DEFAULT_VALUE_FILE_TEMPLATE};

/// Maps (variable, period, history id) to input file locations under one root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    data_dir: PathBuf,
    station_info_template: String,
    value_file_template: String,
}

impl PathResolver {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            station_info_template: DEFAULT_STATION_INFO_TEMPLATE.to_string(),
            value_file_template: DEFAULT_VALUE_FILE_TEMPLATE.to_string(),
        }
    }

    pub fn with_station_info_template(mut self, template: impl Into<String>) -> Self {
        self.station_info_template = template.into();
        self
    }

    pub fn with_value_file_template(mut self, template: impl Into<String>) -> Self {
        self.value_file_template = template.into();
        self
    }

    /// e.g. `<root>/composite_station_info/ppt_composite_station_file.csv`
    pub fn station_info_path(&self, variable: ClimateVariable) -> PathBuf {
        PathBuf::from(self.expand(&self.station_info_template, variable, None, None))
    }

    /// e.g. `<root>/csv/ppt/1971_2000/12345_ppt_1971_2000.csv`
    pub fn value_file_path(
        &self,
        variable: ClimateVariable,
        period: ClimatologyPeriod,
        history_id: HistoryId,
    ) -> PathBuf {
        PathBuf::from(self.expand(
            &self.value_file_template,
            variable,
            Some(period),
            Some(history_id),
        ))
    }

    fn expand(
        &self,
        template: &str,
        variable: ClimateVariable,
        period: Option<ClimatologyPeriod>,
        history_id: Option<HistoryId>,
    ) -> String {
        let root = self.data_dir.to_string_lossy();
        let mut expanded = template
            .replace("{data_dir}", root.trim_end_matches('/'))
            .replace("{variable}", variable.token());
        if let Some(period) = period {
            expanded = expanded.replace("{period}", &period.path_token());
        }
        if let Some(history_id) = history_id {
            expanded = expanded.replace("{history_id}", &history_id.to_string());
        }
        expanded
    }
}
