mod catalog;
mod config;
mod coordinator;
mod error;
mod fetcher;
mod filter;
mod htx;
mod publisher;
mod sensor;
mod source;
mod stats;
mod strategy;
mod types;

use std::sync::Arc;

use anyhow::Result;
use tokio::time::{interval, MissedTickBehavior};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::coordinator::RefreshCoordinator;
use crate::fetcher::PageFetcher;
use crate::htx::HtxMarketData;
use crate::publisher::SnapshotPublisher;
use crate::source::ListingSource;
use crate::stats::Stats;
use crate::strategy::best_offer::BestOfferStrategy;

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let s = Settings::from_env()?;
    let catalog = s.catalog()?;
    let stats = Stats::new(now_ms());

    let source: Arc<dyn ListingSource> = Arc::new(HtxMarketData::new(
        s.base_url.clone(),
        s.query_params(),
        s.request_timeout(),
    )?);

    let fetcher = PageFetcher::new(source.clone(), s.listing_filter()?, s.max_pages, stats.clone());
    let mut coordinator = RefreshCoordinator::new(
        fetcher,
        Box::new(BestOfferStrategy::new(catalog.clone())),
        stats.clone(),
    );
    let mut publisher = SnapshotPublisher::new(
        catalog.targets().to_vec(),
        s.snapshot_jsonl_path.clone(),
        stats.clone(),
    );

    tracing::info!(
        interval_sec = s.scan_interval_sec,
        max_pages = s.max_pages,
        targets = catalog.targets().len(),
        "HTX P2P rates started"
    );

    let mut ticker = interval(s.scan_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => {
                tracing::info!("shutdown requested");
                break;
            }
        }

        let outcome = tokio::select! {
            res = coordinator.refresh() => res,
            _ = &mut shutdown => {
                tracing::info!(state = ?coordinator.state(), "shutdown requested during refresh");
                break;
            }
        };

        match outcome {
            Ok(result) => {
                let readings = publisher.publish(result).await;
                tracing::info!(
                    readings = readings.len(),
                    with_value = readings.iter().filter(|r| r.value.is_some()).count(),
                    "refresh published"
                );
            }
            Err(e) => match publisher.last() {
                Some(last) => tracing::warn!(error = %e, kept_ts = last.ts_ms, "update failed, keeping last result"),
                None => tracing::warn!(error = %e, "update failed, nothing published yet"),
            },
        }

        let t = now_ms();
        if stats.should_log(t, s.stats_log_sec) {
            stats.log(t);
        }
    }

    source.close().await;
    stats.log(now_ms());
    Ok(())
}
