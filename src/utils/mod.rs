pub mod constants;
pub mod logging;
pub mod paths;
pub mod progress;

pub use constants::*;
pub use logging::init_logging;
pub use paths::PathResolver;
pub use progress::ProgressReporter;
