use std::{error::Error, path::Path, sync::Arc};

use clap::{Parser, ValueEnum};
use covid_stats::config::Sources;
use covid_stats::country::RegexCountryResolver;
use covid_stats::db::duck_warehouse::DuckWarehouse;
use covid_stats::fetch::HttpSource;
use covid_stats::pipeline::Pipeline;
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Job {
    /// Download the raw data into the source dataset
    Source,
    /// Recompute the output dataset
    Output,
    /// Both, in order
    All,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Which tables to update
    #[arg(value_enum, default_value = "all")]
    job: Job,

    /// Path of the DuckDB file holding the datasets
    #[arg(long, env = "COVID_DUCKDB_PATH", default_value = "covid_stats.duckdb")]
    duckdb_path: String,

    /// Environment name, e.g., test, prod
    #[arg(short, long)]
    env: Option<String>,
}

/// Run this job every day after the upstream repository is updated
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Some(env) = &args.env {
        dotenvy::from_path(Path::new(format!(".env/{}.env", env).as_str()))?;
    }

    let sources = Sources::from_env();
    let pipeline = Pipeline::new(
        Arc::new(HttpSource::new(sources.fetch_timeout)?),
        Arc::new(DuckWarehouse::open(&args.duckdb_path)?),
        Arc::new(RegexCountryResolver),
        sources,
    );

    if matches!(args.job, Job::Source | Job::All) {
        pipeline.update_source()?;
        info!("source dataset updated through {}", pipeline.last_update()?);
    }
    if matches!(args.job, Job::Output | Job::All) {
        pipeline.update_output()?;
        info!("output dataset updated");
    }

    Ok(())
}
