use anyhow::Context;
use aqi_warehouse::cli::{run, Cli};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).await.context("pipeline run failed")
}
