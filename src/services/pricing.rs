/// Listing-duration pricing. Prices are whole currency units; the checkout
/// session converts to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingTier {
    pub days: i32,
    pub price: i64,
    pub description: &'static str,
}

pub const LISTING_TIERS: [PricingTier; 3] = [
    PricingTier {
        days: 30,
        price: 99,
        description: "Standard listing",
    },
    PricingTier {
        days: 60,
        price: 179,
        description: "Extended listing",
    },
    PricingTier {
        days: 90,
        price: 249,
        description: "Maximum exposure",
    },
];

/// Exact-match lookup. Unknown durations are an error for the caller, never
/// rounded to a neighbouring tier.
pub fn price_for(days: i32) -> Option<&'static PricingTier> {
    LISTING_TIERS.iter().find(|tier| tier.days == days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_durations_resolve() {
        assert_eq!(price_for(30).unwrap().price, 99);
        assert_eq!(price_for(60).unwrap().price, 179);
        assert_eq!(price_for(90).unwrap().price, 249);
    }

    #[test]
    fn unknown_duration_is_none() {
        assert!(price_for(45).is_none());
        assert!(price_for(0).is_none());
        assert!(price_for(-30).is_none());
    }

    #[test]
    fn durations_are_unique() {
        for (i, a) in LISTING_TIERS.iter().enumerate() {
            for b in &LISTING_TIERS[i + 1..] {
                assert_ne!(a.days, b.days);
            }
        }
    }
}
