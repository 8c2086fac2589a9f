//! Price display helpers.

use super::types::Listing;

/// Percentage saved against the original price, rounded to a whole number.
///
/// Zero when no original price is known.
pub fn discount_percent(price: f64, original_price: f64) -> i64 {
    if original_price <= 0.0 {
        return 0;
    }
    (((original_price - price) / original_price) * 100.0).round() as i64
}

impl Listing {
    pub fn discount_percent(&self) -> i64 {
        discount_percent(self.price, self.original_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_half_price() {
        assert_eq!(discount_percent(450.0, 900.0), 50);
    }

    #[test]
    fn test_zero_original_price() {
        assert_eq!(discount_percent(450.0, 0.0), 0);
    }

    #[test]
    fn test_rounding() {
        // 595 -> 250 is 57.98%
        assert_eq!(discount_percent(250.0, 595.0), 58);
        assert_eq!(discount_percent(100.0, 100.0), 0);
    }

    #[test]
    fn test_listing_discount() {
        let listings = fixtures::sample_listings();
        assert_eq!(listings[0].discount_percent(), 50);
        assert_eq!(listings[1].discount_percent(), 54);
    }
}
