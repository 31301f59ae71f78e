pub mod market_data;
pub mod types;

pub use market_data::{HtxMarketData, QueryParams};
