mod brands;
mod cli;
mod commands;
mod config;
mod report;

use clap::Parser;
use crawl_logging::LogDestination;
use log::LevelFilter;

use crate::cli::{Cli, Command};
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let destination = match &cli.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    crawl_logging::initialize(destination, level);

    let config = AppConfig::load(cli.config.as_deref())?;
    match &cli.command {
        Command::Crawl(args) => {
            commands::crawl(config, args).await?;
        }
        Command::Rank(args) => commands::rank_best(config, args)?,
    }
    Ok(())
}
