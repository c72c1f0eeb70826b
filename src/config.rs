//! Import configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `CLIMO_*` environment variables. CLI flags are applied on top by the
//! command layer. The result is validated once and passed around by value.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::{Validate, ValidationError};

use crate::error::{ImportError, Result};
use crate::utils::constants::{
    DEFAULT_DATA_DIR, DEFAULT_STATION_INFO_TEMPLATE, DEFAULT_VALUE_FILE_TEMPLATE, ENV_PREFIX,
};
use crate::utils::PathResolver;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ImportConfig {
    /// Root of the station info and value file trees.
    pub data_dir: PathBuf,

    #[validate(custom(function = "validate_station_info_template"))]
    pub station_info_template: String,

    #[validate(custom(function = "validate_value_file_template"))]
    pub value_file_template: String,

    /// Require exactly twelve rows in every monthly value file.
    pub strict_month_count: bool,
}

fn require_placeholders(
    template: &str,
    placeholders: &[&str],
) -> std::result::Result<(), ValidationError> {
    if placeholders.iter().all(|p| template.contains(p)) {
        Ok(())
    } else {
        Err(ValidationError::new("missing_placeholder"))
    }
}

fn validate_station_info_template(template: &str) -> std::result::Result<(), ValidationError> {
    require_placeholders(template, &["{variable}"])
}

fn validate_value_file_template(template: &str) -> std::result::Result<(), ValidationError> {
    require_placeholders(template, &["{variable}", "{period}", "{history_id}"])
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            station_info_template: DEFAULT_STATION_INFO_TEMPLATE.to_string(),
            value_file_template: DEFAULT_VALUE_FILE_TEMPLATE.to_string(),
            strict_month_count: true,
        }
    }
}

impl ImportConfig {
    /// Load defaults, the optional config file and `CLIMO_*` overrides.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        Self::load_with_env_prefix(config_file, ENV_PREFIX)
    }

    pub fn load_with_env_prefix(config_file: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let defaults = ImportConfig::default();
        let mut builder = Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())?
            .set_default("station_info_template", defaults.station_info_template)?
            .set_default("value_file_template", defaults.value_file_template)?
            .set_default("strict_month_count", defaults.strict_month_count)?;

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ImportError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: ImportConfig = builder
            .add_source(Environment::with_prefix(env_prefix))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_strict_month_count(mut self, strict: bool) -> Self {
        self.strict_month_count = strict;
        self
    }

    pub fn path_resolver(&self) -> PathResolver {
        PathResolver::new(self.data_dir.clone())
            .with_station_info_template(self.station_info_template.clone())
            .with_value_file_template(self.value_file_template.clone())
    }
}
