use std::cmp::Ordering;

use chrono::Utc;

use super::Strategy;
use crate::catalog::PaymentCatalog;
use crate::types::{BestOffer, DirectionOffers, Listing, TradeDirection};

/// Picks, per target payment method, the best-priced listing whose resolved
/// method names contain the target (case-insensitive). The same listing may
/// be the best offer for several targets.
#[derive(Clone)]
pub struct BestOfferStrategy {
    pub catalog: PaymentCatalog,
}

impl BestOfferStrategy {
    pub fn new(catalog: PaymentCatalog) -> Self {
        Self { catalog }
    }

    /// Sell side: cheapest first. Buy side: highest bid first.
    fn rank(direction: TradeDirection, a: &Listing, b: &Listing) -> Ordering {
        match direction {
            TradeDirection::Sell => a.price.cmp(&b.price),
            TradeDirection::Buy => b.price.cmp(&a.price),
        }
    }
}

impl Strategy for BestOfferStrategy {
    fn select(&self, direction: TradeDirection, mut listings: Vec<Listing>) -> DirectionOffers {
        listings.sort_by(|a, b| Self::rank(direction, a, b));

        let resolved: Vec<(String, String)> = listings
            .iter()
            .map(|l| {
                let names = self.catalog.resolve(l.pay_method.as_deref(), &l.pay_methods);
                let lower = names.to_lowercase();
                (names, lower)
            })
            .collect();

        let now = Utc::now();
        let mut out = DirectionOffers::new();

        for target in self.catalog.targets() {
            let needle = target.to_lowercase();
            let best = listings
                .iter()
                .zip(resolved.iter())
                .find(|(_, (_, lower))| lower.contains(&needle))
                .map(|(l, (names, _))| BestOffer {
                    price: l.price.round_dp(2),
                    available: l.trade_count.round_dp(2),
                    min_limit: l.min_trade_limit.round_dp(2),
                    max_limit: l.max_trade_limit.round_dp(2),
                    pay_methods: names.clone(),
                    listing: l.clone(),
                    last_update: now,
                });

            if best.is_none() {
                tracing::debug!(direction = %direction, method = %target, "no eligible listing");
            }
            out.insert(target.clone(), best);
        }

        out
    }
}
