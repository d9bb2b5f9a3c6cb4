use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use crawl_logging::{crawl_info, crawl_warn};
use specs_engine::{CrawlEngine, LogProgressSink};
use specs_rank::{rank, write_best, Table};

use crate::cli::{CrawlArgs, RankArgs};
use crate::config::AppConfig;
use crate::report::CrawlReport;

pub async fn crawl(mut config: AppConfig, args: &CrawlArgs) -> anyhow::Result<CrawlReport> {
    config.apply_crawl_args(args);
    let engine_config = config.engine_config();
    let output_dir = engine_config.output_dir.clone();

    let engine = CrawlEngine::new(engine_config, Arc::new(LogProgressSink))
        .context("cannot start the crawl")?;

    let cancel = engine.cancellation_token();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            crawl_warn!("Ctrl-C received, finishing in-flight pages and stopping");
            on_ctrl_c.cancel();
        }
    });

    let started_at = Utc::now();
    let summaries = engine.run(config.categories.iter().cloned()).await;
    let report = CrawlReport::new(started_at, Utc::now(), cancel.is_cancelled(), summaries);

    report.log();
    let path = report
        .write(&output_dir)
        .with_context(|| format!("cannot write the crawl summary to {output_dir:?}"))?;
    crawl_info!("summary written to {:?}", path);
    Ok(report)
}

pub fn rank_best(mut config: AppConfig, args: &RankArgs) -> anyhow::Result<()> {
    config.apply_rank_args(args);

    let table = Table::load_dir(&config.output_dir)
        .with_context(|| format!("cannot load crawled files from {:?}", config.output_dir))?;
    let ranking = rank(&table, &config.rank)?;

    if let Some(n) = args.per_column {
        for column in ranking.columns() {
            let best = ranking.top_by_column(column, n)?;
            let names: Vec<String> = best
                .iter()
                .filter_map(|r| table.row(r.row))
                .map(|row| row.iter().take(3).cloned().collect::<Vec<_>>().join(" "))
                .collect();
            crawl_info!("top {} by {}: {}", n, column, names.join(", "));
        }
    }

    write_best(&table, &ranking, &config.rank, &config.rank_output)
        .with_context(|| format!("cannot write {:?}", config.rank_output))?;
    Ok(())
}
