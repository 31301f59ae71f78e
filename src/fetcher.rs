use std::sync::Arc;

use crate::error::PageError;
use crate::filter::ListingFilter;
use crate::source::ListingSource;
use crate::stats::Stats;
use crate::types::{Listing, TradeDirection};

/// Outcome of paging through one direction.
#[derive(Debug)]
pub struct DirectionFetch {
    pub listings: Vec<Listing>,
    /// Non-empty pages received.
    pub pages: u32,
    /// Recoverable error that ended paging, if any.
    pub error: Option<PageError>,
}

impl DirectionFetch {
    /// Nothing arrived and paging ended on an error.
    pub fn is_outage(&self) -> bool {
        self.pages == 0 && self.error.is_some()
    }
}

/// Walks pages 1..=max_pages for one direction and returns the filtered listings.
pub struct PageFetcher {
    source: Arc<dyn ListingSource>,
    filter: ListingFilter,
    max_pages: u32,
    stats: Arc<Stats>,
}

impl PageFetcher {
    pub fn new(source: Arc<dyn ListingSource>, filter: ListingFilter, max_pages: u32, stats: Arc<Stats>) -> Self {
        Self {
            source,
            filter,
            max_pages: max_pages.max(1),
            stats,
        }
    }

    /// Stops at the first empty page, the first failing page, or the page cap.
    /// A recoverable page failure keeps what was accumulated so far and is
    /// reported in `DirectionFetch::error`; only a closed session is an `Err`.
    pub async fn fetch(&self, direction: TradeDirection) -> Result<DirectionFetch, PageError> {
        let mut raw_all = Vec::new();
        let mut pages: u32 = 0;
        let mut error = None;

        while pages < self.max_pages {
            let page = pages + 1;
            match self.source.fetch_page(direction, page).await {
                Ok(items) if items.is_empty() => break,
                Ok(items) => {
                    self.stats.inc_page();
                    raw_all.extend(items);
                    pages = page;
                }
                Err(e) if e.is_recoverable() => {
                    self.stats.inc_page_error();
                    tracing::error!(direction = %direction, page, error = %e, "error fetching data from HTX API");
                    error = Some(e);
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        let fetched = raw_all.len();
        let listings: Vec<Listing> = raw_all.into_iter().filter_map(Listing::from_raw).collect();
        let malformed = fetched - listings.len();
        let kept = self.filter.apply(listings);

        self.stats.add_listings(fetched as u64, malformed as u64, kept.len() as u64);
        tracing::debug!(
            direction = %direction,
            pages,
            fetched,
            malformed,
            kept = kept.len(),
            "direction fetched"
        );

        Ok(DirectionFetch {
            listings: kept,
            pages,
            error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::scripted::{raw, ScriptedSource};
    use rust_decimal_macros::dec;

    fn fetcher(src: Arc<ScriptedSource>, max_pages: u32) -> PageFetcher {
        PageFetcher::new(
            src,
            ListingFilter::new(dec!(10000), ["PAXBID".to_string()]),
            max_pages,
            Stats::new(0),
        )
    }

    #[tokio::test]
    async fn stops_on_first_empty_page() {
        let src = Arc::new(
            ScriptedSource::new()
                .page(TradeDirection::Sell, 1, vec![raw("95", "10000", "a", "29")])
                .page(TradeDirection::Sell, 2, vec![raw("96", "10000", "b", "29")])
                .page(TradeDirection::Sell, 3, vec![raw("97", "10000", "c", "29")]),
        );
        let out = fetcher(src.clone(), 10).fetch(TradeDirection::Sell).await.unwrap();
        assert_eq!(out.listings.len(), 3);
        assert_eq!(out.pages, 3);
        assert!(out.error.is_none());
        // page 4 is the empty one; nothing after it
        assert_eq!(src.requested(TradeDirection::Sell), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn failed_page_keeps_partial_data() {
        let src = Arc::new(
            ScriptedSource::new()
                .page(TradeDirection::Buy, 1, vec![raw("95", "20000", "a", "29"), raw("94", "100", "b", "29")])
                .failing(TradeDirection::Buy, 2, 500)
                .page(TradeDirection::Buy, 3, vec![raw("99", "20000", "c", "29")]),
        );
        let f = fetcher(src.clone(), 10);
        let out = f.fetch(TradeDirection::Buy).await.unwrap();
        assert_eq!(out.listings.len(), 1);
        assert_eq!(out.listings[0].user_name.as_deref(), Some("a"));
        assert_eq!(out.pages, 1);
        assert!(matches!(out.error, Some(PageError::Status { status: 500 })));
        assert!(!out.is_outage());
        assert_eq!(src.requested(TradeDirection::Buy), vec![1, 2]);
        assert_eq!(f.stats.snapshot(0).page_errors, 1);
    }

    #[tokio::test]
    async fn page_cap_is_respected() {
        let mut s = ScriptedSource::new();
        for p in 1..=15 {
            s = s.page(TradeDirection::Sell, p, vec![raw("95", "10000", "a", "29")]);
        }
        let src = Arc::new(s);
        let out = fetcher(src.clone(), 10).fetch(TradeDirection::Sell).await.unwrap();
        assert_eq!(out.listings.len(), 10);
        assert_eq!(out.pages, 10);
        assert_eq!(src.requested(TradeDirection::Sell), (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn filters_and_drops_malformed() {
        let mut broken = raw("95", "20000", "d", "29");
        broken.price = None;
        let src = Arc::new(ScriptedSource::new().page(
            TradeDirection::Sell,
            1,
            vec![
                raw("95", "5000", "a", "29"),
                raw("95", "50000", "PAXBID", "29"),
                broken,
                raw("95", "10000", "c", "29"),
            ],
        ));
        let f = fetcher(src, 10);
        let out = f.fetch(TradeDirection::Sell).await.unwrap();
        assert_eq!(out.listings.len(), 1);
        let ss = f.stats.snapshot(0);
        assert_eq!(ss.listings_fetched, 4);
        assert_eq!(ss.listings_malformed, 1);
        assert_eq!(ss.listings_kept, 1);
    }

    #[tokio::test]
    async fn first_page_failure_is_an_outage() {
        let src = Arc::new(ScriptedSource::new().failing(TradeDirection::Sell, 1, 503));
        let out = fetcher(src.clone(), 10).fetch(TradeDirection::Sell).await.unwrap();
        assert!(out.listings.is_empty());
        assert!(out.is_outage());
        assert_eq!(src.requested(TradeDirection::Sell), vec![1]);
    }

    #[tokio::test]
    async fn empty_market_is_not_an_outage() {
        let src = Arc::new(ScriptedSource::new());
        let out = fetcher(src, 10).fetch(TradeDirection::Buy).await.unwrap();
        assert_eq!(out.pages, 0);
        assert!(!out.is_outage());
    }

    #[tokio::test]
    async fn closed_session_is_an_error() {
        let src = Arc::new(ScriptedSource::new());
        src.close().await;
        let err = fetcher(src, 10).fetch(TradeDirection::Buy).await.unwrap_err();
        assert!(matches!(err, PageError::SessionClosed));
    }
}
