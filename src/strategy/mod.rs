pub mod best_offer;

use crate::types::{DirectionOffers, Listing, TradeDirection};

pub trait Strategy: Send + Sync {
    fn select(&self, direction: TradeDirection, listings: Vec<Listing>) -> DirectionOffers;
}
