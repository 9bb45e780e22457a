//! Load a climate dataset into MySQL.
//!
//! Reads the connection settings from the same `MYSQL_*` variables as the
//! API server.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use ecovision_infra::{load_dotenv, schema, seed, AppConfig, MySqlClimateStore, SeedDataset};

#[derive(Debug, Parser)]
#[command(name = "ecovision-seed", about = "Seed the climate database")]
struct Args {
    /// Create the tables before inserting (idempotent).
    #[arg(long)]
    schema: bool,

    /// JSON dataset to load instead of the bundled sample data.
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    load_dotenv();
    ecovision_observability::init();

    let config = AppConfig::from_env();

    let dataset = match &args.data {
        Some(path) => SeedDataset::from_path(path)
            .with_context(|| format!("failed to read dataset {}", path.display()))?,
        None => SeedDataset::sample().context("bundled sample data is invalid")?,
    };

    let store = MySqlClimateStore::connect(&config.database)
        .await
        .context("failed to connect to MySQL")?;

    if args.schema {
        schema::apply(store.pool())
            .await
            .context("failed to apply schema")?;
    }

    let report = seed::seed_mysql(store.pool(), &dataset)
        .await
        .context("failed to seed dataset")?;

    tracing::info!(
        locations = report.locations,
        metrics = report.metrics,
        climate_data = report.climate_data,
        "seed complete"
    );
    Ok(())
}
