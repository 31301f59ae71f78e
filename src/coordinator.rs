use std::sync::Arc;

use crate::error::UpdateFailed;
use crate::fetcher::{DirectionFetch, PageFetcher};
use crate::stats::Stats;
use crate::strategy::Strategy;
use crate::types::{RefreshResult, TradeDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

/// Runs one fetch, filter and rank pass per call. `&mut self` keeps at most
/// one refresh in flight.
pub struct RefreshCoordinator {
    fetcher: PageFetcher,
    strategy: Box<dyn Strategy>,
    stats: Arc<Stats>,
    state: RefreshState,
}

impl RefreshCoordinator {
    pub fn new(fetcher: PageFetcher, strategy: Box<dyn Strategy>, stats: Arc<Stats>) -> Self {
        Self {
            fetcher,
            strategy,
            stats,
            state: RefreshState::Idle,
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub async fn refresh(&mut self) -> Result<RefreshResult, UpdateFailed> {
        self.state = RefreshState::Refreshing;
        self.stats.inc_cycle();
        let res = self.run_cycle().await;
        self.state = RefreshState::Idle;

        if res.is_err() {
            self.stats.inc_failed_cycle();
        }
        res
    }

    /// Partial data still yields a result. Only a closed session, or both
    /// directions failing before any page arrived, fail the cycle.
    async fn run_cycle(&self) -> Result<RefreshResult, UpdateFailed> {
        let buy = self
            .fetcher
            .fetch(TradeDirection::Buy)
            .await
            .map_err(|e| UpdateFailed(e.to_string()))?;
        let sell = self
            .fetcher
            .fetch(TradeDirection::Sell)
            .await
            .map_err(|e| UpdateFailed(e.to_string()))?;

        if buy.is_outage() && sell.is_outage() {
            let cause = |f: &DirectionFetch| f.error.as_ref().map(|e| e.to_string()).unwrap_or_default();
            return Err(UpdateFailed(format!("buy: {}; sell: {}", cause(&buy), cause(&sell))));
        }

        tracing::debug!(buy = buy.listings.len(), sell = sell.listings.len(), "listings after filter");

        Ok(RefreshResult {
            ts_ms: chrono::Utc::now().timestamp_millis(),
            buy: self.strategy.select(TradeDirection::Buy, buy.listings),
            sell: self.strategy.select(TradeDirection::Sell, sell.listings),
        })
    }
}
