mod config;
mod dlq;
mod domain;
mod engine;
mod ingestion;
mod report;
mod store;

use std::fs::File;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::dlq::TracingDlq;
use crate::engine::Engine;
use crate::ingestion::CsvReader;
use crate::report::CsvReport;
use crate::store::InMemoryStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    // stdout carries the report, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_level)?)
        .with_writer(std::io::stderr)
        .init();

    let file = File::open(&config.input)?;
    tracing::info!(input = %config.input.display(), "replaying journal");

    let mut engine = Engine::new(CsvReader::new(file), InMemoryStore::new(), TracingDlq::default());
    engine.process().await?;

    let mut report = CsvReport::new(std::io::stdout().lock());
    engine.flush(&mut report)?;

    Ok(())
}
