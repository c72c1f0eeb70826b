use std::path::Path;
use tracing::{info, warn};

use crate::cli::args::{Cli, Commands};
use crate::config::ImportConfig;
use crate::error::{ImportError, Result};
use crate::models::ClimateVariable;
use crate::processors::{ImportPipeline, Preflight};
use crate::readers::read_history_catalog;
use crate::store::MemoryStore;
use crate::utils::{init_logging, ProgressReporter};

fn load_config(
    config_file: Option<&Path>,
    data_dir: Option<&Path>,
    lenient_months: bool,
) -> Result<ImportConfig> {
    let mut config = ImportConfig::load(config_file)?;
    if let Some(dir) = data_dir {
        config = config.with_data_dir(dir);
    }
    if lenient_months {
        config = config.with_strict_month_count(false);
    }
    info!("Data directory: {}", config.data_dir.display());
    Ok(config)
}

fn selected(variables: &[ClimateVariable]) -> Vec<ClimateVariable> {
    if variables.is_empty() {
        ClimateVariable::ALL.to_vec()
    } else {
        ClimateVariable::ALL
            .into_iter()
            .filter(|v| variables.contains(v))
            .collect()
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Import {
            store,
            data_dir,
            config,
            variables,
            lenient_months,
            history_catalog,
        } => {
            let config = load_config(config.as_deref(), data_dir.as_deref(), lenient_months)?;
            let catalog = history_catalog
                .as_deref()
                .map(read_history_catalog)
                .transpose()?;

            println!("Importing climatologies...");
            println!("Data directory: {}", config.data_dir.display());
            println!("Store: {}", store.display());

            let report = tokio::task::spawn_blocking(move || {
                let mut store = MemoryStore::open(&store)?;
                let existing = store.committed().stations.len();
                if existing > 0 {
                    warn!(
                        "Store already holds {} stations; this run adds new station rows alongside them",
                        existing
                    );
                }
                if let Some(catalog) = catalog {
                    store = store.with_history_catalog(catalog);
                }

                let pipeline = ImportPipeline::from_config(&config).with_variables(&variables);
                let progress = ProgressReporter::new(0, "Importing", quiet);
                let report = pipeline.run_all(&mut store, Some(&progress))?;
                progress.finish_with_message("Import committed");
                Ok::<_, ImportError>(report)
            })
            .await??;

            println!("\n{}", report.summary());
            println!("Import complete!");
        }

        Commands::Validate {
            data_dir,
            config,
            variables,
            lenient_months,
            max_workers,
        } => {
            let config = load_config(config.as_deref(), data_dir.as_deref(), lenient_months)?;
            let variables = selected(&variables);

            println!("Validating climatology input files...");
            println!("Data directory: {}", config.data_dir.display());

            let report = tokio::task::spawn_blocking(move || {
                let progress = ProgressReporter::new(0, "Validating", quiet);
                Preflight::new(config.path_resolver(), max_workers)
                    .with_strict_month_count(config.strict_month_count)
                    .check(&variables, Some(&progress))
            })
            .await??;

            println!("\n{}", report.summary());
            if report.is_clean() {
                println!("✅ All input files passed validation checks");
            } else {
                println!("⚠️  Found {} validation issues", report.issues.len());
            }
        }

        Commands::Info { store, json } => {
            if !store.exists() {
                return Err(ImportError::Config(format!(
                    "store not found: {}",
                    store.display()
                )));
            }
            let store = MemoryStore::open(&store)?;
            let summary = store.committed().summary();

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary.render());
            }
        }
    }

    Ok(())
}
