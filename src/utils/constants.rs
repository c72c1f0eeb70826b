/// Months in a climatology year; one value row per month.
pub const MONTHS_PER_YEAR: usize = 12;

/// Joint station columns per period in the station info file.
pub const JOINT_STATION_SLOTS: usize = 3;

/// Literal used for absent numeric cells (the empty string is the other).
pub const SENTINEL_NAN: &str = "NaN";

/// Default root for input files.
pub const DEFAULT_DATA_DIR: &str = "/data/";

/// Path templates. Placeholders: {data_dir}, {variable}, {period}, {history_id}.
pub const DEFAULT_STATION_INFO_TEMPLATE: &str =
    "{data_dir}/composite_station_info/{variable}_composite_station_file.csv";
pub const DEFAULT_VALUE_FILE_TEMPLATE: &str =
    "{data_dir}/csv/{variable}/{period}/{history_id}_{variable}_{period}.csv";

/// Environment variable prefix for configuration overrides (CLIMO_DATA_DIR, ...).
pub const ENV_PREFIX: &str = "CLIMO";

/// History lines between progress log messages.
pub const PROGRESS_LOG_INTERVAL: usize = 100;

/// Column holding history ids in a history catalog file.
pub const HISTORY_CATALOG_COLUMN: &str = "history_id";

/// Station comment written for imported stations.
pub const DEFAULT_STATION_COMMENT: &str = "";
