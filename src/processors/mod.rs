pub mod history_linker;
pub mod pipeline;
pub mod preflight;
pub mod registry;
pub mod station_builder;
pub mod value_attacher;

pub use history_linker::{link_base, link_joint};
pub use pipeline::{ImportPipeline, ImportReport, VariableReport};
pub use preflight::{Preflight, PreflightIssue, PreflightReport};
pub use registry::{
    ensure_periods, ensure_variables, resolve_period, resolve_variable, PeriodIds,
};
pub use station_builder::{build_station, build_station_for_period_id, classify};
pub use value_attacher::{contributing_years, ValueAttacher};
