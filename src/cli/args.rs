use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aqi-warehouse")]
#[command(about = "Incremental air-quality ETL into a PostgreSQL star schema")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Configuration file path")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch current readings and load them into the warehouse
    Run {
        #[arg(
            long = "city",
            help = "City to fetch (repeatable) [default: the configured list]"
        )]
        cities: Vec<String>,
    },

    /// Run the transform against an in-memory store and report what
    /// would be loaded, without touching the warehouse
    Preview {
        #[arg(
            long = "city",
            help = "City to fetch (repeatable) [default: the configured list]"
        )]
        cities: Vec<String>,
    },
}
