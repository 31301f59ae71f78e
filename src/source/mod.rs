use async_trait::async_trait;

use crate::error::PageError;
use crate::htx::types::RawListing;
use crate::types::TradeDirection;

/// Abstraction for the paginated listing endpoint.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch one 1-based page of listings for a direction. An empty vec marks the end.
    async fn fetch_page(&self, direction: TradeDirection, page: u32) -> Result<Vec<RawListing>, PageError>;

    /// Release the underlying session. Later fetches fail with `SessionClosed`.
    async fn close(&self);
}
