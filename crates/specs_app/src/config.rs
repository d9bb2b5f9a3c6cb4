use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use crawl_logging::crawl_info;
use serde::{Deserialize, Serialize};
use specs_core::{ClassificationFilter, CrawlConfig};
use specs_engine::EngineConfig;
use specs_rank::RankSettings;

use crate::brands::DEFAULT_BRANDS;
use crate::cli::{CrawlArgs, RankArgs};

/// Settings file contents. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub crawl: CrawlConfig,
    /// Brands crawled when none are given on the command line.
    pub categories: Vec<String>,
    pub output_dir: PathBuf,
    pub max_concurrent_categories: usize,
    pub max_in_flight_requests: usize,
    pub category_deadline_secs: Option<u64>,
    pub retry_attempts: u32,
    pub rank: RankSettings,
    pub rank_output: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let engine = EngineConfig::default_with_output(PathBuf::from("input"));
        Self {
            crawl: engine.crawl,
            categories: DEFAULT_BRANDS.iter().map(|b| b.to_string()).collect(),
            output_dir: engine.output_dir,
            max_concurrent_categories: engine.max_concurrent_categories,
            max_in_flight_requests: engine.max_in_flight_requests,
            category_deadline_secs: None,
            retry_attempts: engine.retry.max_attempts,
            rank: RankSettings::default(),
            rank_output: PathBuf::from("output").join("best_cars_for_me.csv"),
        }
    }
}

impl AppConfig {
    /// Read the RON file at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {path:?}"))?;
        let config: AppConfig =
            ron::from_str(&text).with_context(|| format!("invalid config file {path:?}"))?;
        crawl_info!("loaded settings from {:?}", path);
        Ok(config)
    }

    /// Command-line values win over the file.
    pub fn apply_crawl_args(&mut self, args: &CrawlArgs) {
        if !args.categories.is_empty() {
            self.categories = args.categories.clone();
        }
        if let Some(dir) = &args.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(origin) = &args.origin {
            self.crawl.origin = origin.clone();
        }
        if let Some(token) = &args.classification {
            self.crawl.classification = ClassificationFilter::new(token.clone());
        }
        if let Some(workers) = args.workers {
            self.max_concurrent_categories = workers;
        }
        if let Some(max) = args.max_in_flight {
            self.max_in_flight_requests = max;
        }
        if args.deadline_secs.is_some() {
            self.category_deadline_secs = args.deadline_secs;
        }
        if let Some(attempts) = args.retry_attempts {
            self.retry_attempts = attempts;
        }
    }

    pub fn apply_rank_args(&mut self, args: &RankArgs) {
        if let Some(dir) = &args.input_dir {
            self.output_dir = dir.clone();
        }
        if let Some(output) = &args.output {
            self.rank_output = output.clone();
        }
        if let Some(top) = args.top {
            self.rank.top_n = top;
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        let mut engine = EngineConfig::default_with_output(self.output_dir.clone());
        engine.crawl = self.crawl.clone();
        engine.max_concurrent_categories = self.max_concurrent_categories;
        engine.max_in_flight_requests = self.max_in_flight_requests;
        engine.category_deadline = self.category_deadline_secs.map(Duration::from_secs);
        engine.retry.max_attempts = self.retry_attempts.max(1);
        engine
    }
}
