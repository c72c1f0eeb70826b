use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::ClimateVariable;

#[derive(Parser)]
#[command(name = "climo-import")]
#[command(about = "Import composite-station climatologies into the climatology schema")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Hide progress bars")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import all station info and value files into a store, in one commit
    Import {
        #[arg(short, long, help = "Store snapshot file (created if missing)")]
        store: PathBuf,

        #[arg(short, long, help = "Root data directory [env: CLIMO_DATA_DIR]")]
        data_dir: Option<PathBuf>,

        #[arg(short, long, help = "TOML configuration file")]
        config: Option<PathBuf>,

        #[arg(
            long = "variable",
            value_name = "ppt|tmax|tmin",
            help = "Only import these variables"
        )]
        variables: Vec<ClimateVariable>,

        #[arg(long, help = "Accept value files without exactly 12 rows")]
        lenient_months: bool,

        #[arg(long, help = "CSV of known history ids; links to other ids fail")]
        history_catalog: Option<PathBuf>,
    },

    /// Check that every file an import needs exists and parses, without writing
    Validate {
        #[arg(short, long, help = "Root data directory [env: CLIMO_DATA_DIR]")]
        data_dir: Option<PathBuf>,

        #[arg(short, long, help = "TOML configuration file")]
        config: Option<PathBuf>,

        #[arg(long = "variable", value_name = "ppt|tmax|tmin", help = "Only check these variables")]
        variables: Vec<ClimateVariable>,

        #[arg(long, help = "Accept value files without exactly 12 rows")]
        lenient_months: bool,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,
    },

    /// Summarise a committed store snapshot
    Info {
        #[arg(short, long)]
        store: PathBuf,

        #[arg(long, help = "Print the summary as JSON")]
        json: bool,
    },
}
