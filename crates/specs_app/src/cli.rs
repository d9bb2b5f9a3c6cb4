use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "vehicle_specs",
    version,
    about = "Crawl vehicle specification pages into per-brand CSV files and rank them"
)]
pub struct Cli {
    /// RON file with crawl and ranking settings
    #[arg(long, global = true, env = "VEHICLE_SPECS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write the log to this file
    #[arg(long, global = true, env = "VEHICLE_SPECS_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Crawl one CSV file per brand
    Crawl(CrawlArgs),
    /// Rank the crawled vehicles and write the best picks
    Rank(RankArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct CrawlArgs {
    /// Brands to crawl; defaults to the configured list
    pub categories: Vec<String>,

    /// Directory for the per-brand CSV files
    #[arg(long, env = "VEHICLE_SPECS_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Site origin, e.g. https://www.autobytel.com
    #[arg(long, env = "VEHICLE_SPECS_ORIGIN")]
    pub origin: Option<String>,

    /// Keep only sections whose heading contains this token
    #[arg(long, env = "VEHICLE_SPECS_CLASSIFICATION")]
    pub classification: Option<String>,

    /// Brands crawled at the same time; 1 crawls them one after another
    #[arg(long, env = "VEHICLE_SPECS_WORKERS")]
    pub workers: Option<usize>,

    /// Cap on requests in flight across all brands
    #[arg(long, env = "VEHICLE_SPECS_MAX_IN_FLIGHT")]
    pub max_in_flight: Option<usize>,

    /// Stop a brand after this many seconds
    #[arg(long, env = "VEHICLE_SPECS_DEADLINE_SECS")]
    pub deadline_secs: Option<u64>,

    /// Attempts per page, including the first
    #[arg(long, env = "VEHICLE_SPECS_RETRY_ATTEMPTS")]
    pub retry_attempts: Option<u32>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RankArgs {
    /// Directory holding the crawled CSV files
    #[arg(long, env = "VEHICLE_SPECS_RANK_INPUT")]
    pub input_dir: Option<PathBuf>,

    /// Where to write the best picks
    #[arg(long, env = "VEHICLE_SPECS_RANK_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Number of best picks to keep
    #[arg(long)]
    pub top: Option<usize>,

    /// Also log the top N for every ranked column
    #[arg(long)]
    pub per_column: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn crawl_takes_positional_brands_and_global_flags() {
        let cli = Cli::parse_from([
            "vehicle_specs",
            "crawl",
            "Acura",
            "BMW",
            "--workers",
            "1",
            "--verbose",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Command::Crawl(args) => {
                assert_eq!(args.categories, vec!["Acura", "BMW"]);
                assert_eq!(args.workers, Some(1));
            }
            Command::Rank(_) => panic!("expected crawl"),
        }
    }
}
