use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::types::Listing;

/// Drops listings below the minimum trade limit floor or posted by excluded users.
#[derive(Debug, Clone)]
pub struct ListingFilter {
    pub min_trade_limit: Decimal,
    pub excluded_users: HashSet<String>,
}

impl ListingFilter {
    pub fn new(min_trade_limit: Decimal, excluded_users: impl IntoIterator<Item = String>) -> Self {
        Self {
            min_trade_limit,
            excluded_users: excluded_users.into_iter().collect(),
        }
    }

    pub fn accepts(&self, l: &Listing) -> bool {
        if l.min_trade_limit < self.min_trade_limit {
            return false;
        }
        match l.user_name.as_deref() {
            Some(u) => !self.excluded_users.contains(u),
            None => true,
        }
    }

    pub fn apply(&self, listings: Vec<Listing>) -> Vec<Listing> {
        listings.into_iter().filter(|l| self.accepts(l)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn listing(min: Decimal, user: &str) -> Listing {
        Listing {
            price: dec!(95),
            trade_count: dec!(500),
            min_trade_limit: min,
            max_trade_limit: dec!(100000),
            user_name: Some(user.to_string()),
            pay_method: Some("29".into()),
            pay_methods: vec![],
        }
    }

    fn filter() -> ListingFilter {
        ListingFilter::new(dec!(10000), ["PAXBID".to_string(), "RushRubleMini-A".to_string()])
    }

    #[test]
    fn floor_is_inclusive() {
        let f = filter();
        assert!(f.accepts(&listing(dec!(10000), "bob")));
        assert!(!f.accepts(&listing(dec!(9999.99), "bob")));
        assert!(!f.accepts(&listing(dec!(5000), "bob")));
    }

    #[test]
    fn excluded_user_dropped_regardless_of_limit() {
        let f = filter();
        assert!(!f.accepts(&listing(dec!(500000), "PAXBID")));
        assert!(!f.accepts(&listing(dec!(10000), "RushRubleMini-A")));
    }

    #[test]
    fn anonymous_listing_passes_exclusion() {
        let f = filter();
        let mut l = listing(dec!(20000), "x");
        l.user_name = None;
        assert!(f.accepts(&l));
    }

    #[test]
    fn apply_keeps_order() {
        let f = filter();
        let kept = f.apply(vec![
            listing(dec!(20000), "a"),
            listing(dec!(100), "b"),
            listing(dec!(30000), "PAXBID"),
            listing(dec!(15000), "c"),
        ]);
        let users: Vec<_> = kept.iter().filter_map(|l| l.user_name.as_deref()).collect();
        assert_eq!(users, vec!["a", "c"]);
    }
}
