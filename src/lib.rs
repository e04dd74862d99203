pub mod aggregate;
pub mod cli;
pub mod columns;
pub mod data;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod io_utils;
pub mod lookup;
pub mod normalize;
pub mod report;
pub mod table;
pub mod views;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug};

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("restaurant_insights", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    debug!("Parsed command: {:?}", cli.command);
    match cli.command {
        Commands::Normalize(args) => report::execute_normalize(&args),
        Commands::Overview(args) => report::execute_overview(&args),
        Commands::Countries(args) => report::execute_countries(&args),
        Commands::Cities(args) => report::execute_cities(&args),
        Commands::Cuisines(args) => report::execute_cuisines(&args),
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
