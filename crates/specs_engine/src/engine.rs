use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crawl_logging::{crawl_error, crawl_info};
use specs_core::{ensure_output_dir, CategorySummary, ConfigError, CrawlConfig, PersistError};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::orchestrator::CategoryCrawler;
use crate::progress::ProgressSink;
use crate::resilience::{LimitedFetcher, RetryPolicy, RetryingFetcher};
use crate::writer::IncrementalWriter;
use crate::FetchError;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub crawl: CrawlConfig,
    pub fetch: FetchSettings,
    pub retry: RetryPolicy,
    /// Worker count; 1 runs categories one after another.
    pub max_concurrent_categories: usize,
    /// Cap on outbound requests across all categories.
    pub max_in_flight_requests: usize,
    pub category_deadline: Option<Duration>,
    pub output_dir: PathBuf,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            crawl: CrawlConfig::default(),
            fetch: FetchSettings::default(),
            retry: RetryPolicy::default(),
            max_concurrent_categories: 8,
            max_in_flight_requests: 16,
            category_deadline: None,
            output_dir,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid crawl configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot build http client: {0}")]
    Client(#[from] FetchError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Runs one [`CategoryCrawler`] pass per category on a fixed-size pool of
/// workers fed from a shared queue.
pub struct CrawlEngine {
    crawler: Arc<CategoryCrawler>,
    workers: usize,
    cancel: CancellationToken,
}

impl CrawlEngine {
    /// Production wiring: reqwest fetcher behind the in-flight cap and retry.
    pub fn new(config: EngineConfig, sink: Arc<dyn ProgressSink>) -> Result<Self, EngineError> {
        let fetcher = ReqwestFetcher::new(config.fetch.clone())?;
        let fetcher = RetryingFetcher::new(
            LimitedFetcher::new(fetcher, config.max_in_flight_requests),
            config.retry.clone(),
        );
        Self::with_fetcher(config, Arc::new(fetcher), sink)
    }

    pub fn with_fetcher(
        config: EngineConfig,
        fetcher: Arc<dyn Fetcher>,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<Self, EngineError> {
        config.crawl.validate()?;
        ensure_output_dir(&config.output_dir)?;

        let cancel = CancellationToken::new();
        let writer = IncrementalWriter::new(config.output_dir, config.crawl.schema.clone());
        let crawler = CategoryCrawler::new(fetcher, Arc::new(config.crawl), writer, sink)
            .with_deadline(config.category_deadline)
            .with_cancellation(cancel.clone());

        Ok(Self {
            crawler: Arc::new(crawler),
            workers: config.max_concurrent_categories.max(1),
            cancel,
        })
    }

    /// Cancelling stops workers from taking new categories and makes running
    /// ones finish before their next fetch.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Crawl every category and wait for all of them. Summaries arrive in
    /// completion order. Each category runs as its own task; one that panics
    /// is logged and left out, and its worker moves on to the next category.
    pub async fn run<I, S>(&self, categories: I) -> Vec<CategorySummary>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queue: VecDeque<String> = categories.into_iter().map(Into::into).collect();
        let workers = self.workers.min(queue.len());
        crawl_info!(
            "crawling {} categor{} with {} worker(s)",
            queue.len(),
            if queue.len() == 1 { "y" } else { "ies" },
            workers
        );

        let queue = Arc::new(Mutex::new(queue));
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let mut pool = JoinSet::new();
        for _ in 0..workers {
            let queue = Arc::clone(&queue);
            let crawler = Arc::clone(&self.crawler);
            let cancel = self.cancel.clone();
            let done_tx = done_tx.clone();
            pool.spawn(async move {
                while !cancel.is_cancelled() {
                    let next = queue
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .pop_front();
                    let Some(category) = next else {
                        break;
                    };
                    let task = tokio::spawn({
                        let crawler = Arc::clone(&crawler);
                        let category = category.clone();
                        async move { crawler.run(&category).await }
                    });
                    match task.await {
                        Ok(summary) => {
                            let _ = done_tx.send(summary);
                        }
                        Err(err) => crawl_error!(
                            "[{}] category crawl aborted: {}",
                            category.to_uppercase(),
                            err
                        ),
                    }
                }
            });
        }
        drop(done_tx);

        while let Some(joined) = pool.join_next().await {
            if let Err(err) = joined {
                crawl_error!("category worker aborted: {}", err);
            }
        }

        let mut summaries = Vec::new();
        while let Some(summary) = done_rx.recv().await {
            summaries.push(summary);
        }
        summaries
    }
}
