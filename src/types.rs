use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::htx::types::{PayMethodRef, RawListing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Buy,
    Sell,
}

impl TradeDirection {
    pub const ALL: [TradeDirection; 2] = [TradeDirection::Buy, TradeDirection::Sell];

    /// Value sent as `tradeType` and used in entity ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeDirection::Buy => "buy",
            TradeDirection::Sell => "sell",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TradeDirection::Buy => "Buy",
            TradeDirection::Sell => "Sell",
        }
    }
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A marketplace order with every numeric field present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub price: Decimal,
    pub trade_count: Decimal,
    pub min_trade_limit: Decimal,
    pub max_trade_limit: Decimal,
    pub user_name: Option<String>,
    pub pay_method: Option<String>,
    pub pay_methods: Vec<PayMethodRef>,
}

impl Listing {
    /// Returns `None` when a required numeric field is missing or unparseable.
    pub fn from_raw(raw: RawListing) -> Option<Self> {
        Some(Self {
            price: raw.price?,
            trade_count: raw.trade_count?,
            min_trade_limit: raw.min_trade_limit?,
            max_trade_limit: raw.max_trade_limit?,
            user_name: raw.user_name,
            pay_method: raw.pay_method,
            pay_methods: raw.pay_methods,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestOffer {
    pub price: Decimal,
    pub available: Decimal,
    pub min_limit: Decimal,
    pub max_limit: Decimal,
    pub pay_methods: String,
    pub listing: Listing,
    pub last_update: chrono::DateTime<chrono::Utc>,
}

/// Target method name -> best offer, one key per target method.
pub type DirectionOffers = BTreeMap<String, Option<BestOffer>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshResult {
    pub ts_ms: i64,
    pub buy: DirectionOffers,
    pub sell: DirectionOffers,
}

impl RefreshResult {
    pub fn offers(&self, direction: TradeDirection) -> &DirectionOffers {
        match direction {
            TradeDirection::Buy => &self.buy,
            TradeDirection::Sell => &self.sell,
        }
    }

    pub fn offer(&self, direction: TradeDirection, method: &str) -> Option<&BestOffer> {
        self.offers(direction).get(method).and_then(|o| o.as_ref())
    }
}
