use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::cli::args::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::models::WarehouseBatch;
use crate::processors::TransformPipeline;
use crate::readers::{FeedReader, ReadingFetcher};
use crate::utils::progress::ProgressReporter;
use crate::writers::{IncrementalLoader, LoadOutcome, MemoryStore, PgWarehouse};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Run { cities } => {
            let config = load_config(&cli, cities.clone())?;
            let dsn = config.store_dsn.clone().ok_or_else(|| {
                PipelineError::Config(config::ConfigError::Message(
                    "store_dsn is required for run; set AQI_STORE_DSN or store_dsn in the config file"
                        .to_string(),
                ))
            })?;

            println!("Loading readings for {} cities into the warehouse", config.cities.len());

            let progress = ProgressReporter::new_spinner("Fetching readings...", false);
            let batch = fetch_and_transform(&config, &progress).await?;

            progress.set_message("Loading warehouse tables...");
            let store = PgWarehouse::connect(&dsn, config.store_timeout_secs).await?;
            let outcomes = IncrementalLoader::new(&store).load_batch(&batch).await?;
            progress.finish_with_message("Load complete");

            print_outcomes(&outcomes);
        }

        Commands::Preview { cities } => {
            let config = load_config(&cli, cities.clone())?;
            println!("Previewing load for {} cities (in-memory store)", config.cities.len());

            let progress = ProgressReporter::new_spinner("Fetching readings...", false);
            let batch = fetch_and_transform(&config, &progress).await?;

            progress.set_message("Simulating warehouse load...");
            let store = MemoryStore::new();
            let outcomes = IncrementalLoader::new(&store).load_batch(&batch).await?;
            progress.finish_with_message("Preview complete");

            print_outcomes(&outcomes);
            println!("\nPreview only - the warehouse was not modified");
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "aqi_warehouse=debug,info" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

/// Merge the configuration file, environment, and any `--city`
/// overrides from the command line.
fn load_config(cli: &Cli, cities: Vec<String>) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::load(cli.config.as_deref())?;
    if !cities.is_empty() {
        config.cities = cities;
    }
    Ok(config)
}

async fn fetch_and_transform(
    config: &PipelineConfig,
    progress: &ProgressReporter,
) -> Result<WarehouseBatch> {
    let reader = FeedReader::with_timeout(
        &config.feed_url,
        &config.api_token,
        Duration::from_secs(config.fetch_timeout_secs),
    )?;

    let fetched = reader.fetch(&config.cities).await?;
    for city in &fetched.skipped {
        progress.println(&format!("City not recognized by the feed: {city}"));
    }

    progress.set_message("Transforming readings...");
    TransformPipeline::new().transform(&fetched.documents, Some(progress))
}

fn print_outcomes(outcomes: &[LoadOutcome]) {
    println!();
    for outcome in outcomes {
        println!("{}", outcome.summary());
    }

    let written: u64 = outcomes.iter().map(|outcome| outcome.written).sum();
    let created = outcomes.iter().filter(|outcome| outcome.created_table).count();
    println!("\n{} new rows across {} tables ({} tables created)", written, outcomes.len(), created);
}
