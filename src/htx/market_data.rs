use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::types::{RawListing, TradeMarketResponse};
use crate::error::PageError;
use crate::source::ListingSource;
use crate::types::TradeDirection;

/// Selectors held constant across every request.
#[derive(Debug, Clone)]
pub struct QueryParams {
    pub coin_id: String,
    pub currency: String,
}

impl QueryParams {
    pub fn to_pairs(&self, direction: TradeDirection, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("coinId", self.coin_id.clone()),
            ("currency", self.currency.clone()),
            ("tradeType", direction.as_str().to_string()),
            ("currPage", page.to_string()),
            ("payMethod", "0".to_string()),
            ("acceptOrder", "0".to_string()),
            ("blockType", "general".to_string()),
            ("online", "1".to_string()),
            ("range", "0".to_string()),
            ("onlyTradable", "false".to_string()),
            ("isFollowed", "false".to_string()),
        ]
    }
}

/// HTX P2P trade-market client. Holds one HTTP session until `close`.
pub struct HtxMarketData {
    base_url: String,
    params: QueryParams,
    http: RwLock<Option<reqwest::Client>>,
}

impl HtxMarketData {
    pub fn new(base_url: String, params: QueryParams, request_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("build reqwest client")?;

        tracing::debug!(base_url = %base_url, timeout_ms = request_timeout.as_millis() as u64, "HtxMarketData initialized");
        Ok(Self {
            base_url,
            params,
            http: RwLock::new(Some(http)),
        })
    }
}

#[async_trait]
impl ListingSource for HtxMarketData {
    async fn fetch_page(&self, direction: TradeDirection, page: u32) -> Result<Vec<RawListing>, PageError> {
        let http = self.http.read().await.clone().ok_or(PageError::SessionClosed)?;

        tracing::debug!(direction = %direction, page, "fetching trade-market page");

        let resp = http
            .get(&self.base_url)
            .query(&self.params.to_pairs(direction, page))
            .send()
            .await
            .map_err(|e| PageError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PageError::Status { status: status.as_u16() });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| PageError::Transport(e.to_string()))?;

        let decoded: TradeMarketResponse = serde_json::from_str(&body).map_err(|e| {
            let snippet: String = body.chars().take(512).collect();
            PageError::Decode(format!("{} body_snippet={}", e, snippet))
        })?;

        Ok(decoded.data)
    }

    async fn close(&self) {
        if self.http.write().await.take().is_some() {
            tracing::info!("HTX HTTP session closed");
        }
    }
}
