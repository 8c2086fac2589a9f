//! Listings: domain types, the browse filter engine and price helpers.

mod filter;
mod pricing;
mod samples;
mod types;

pub use filter::{
    apply_filter, estimate_distance_km, Choice, ListingFilter, SortMode, DEFAULT_MAX_PRICE,
    KM_PER_PINCODE_UNIT, UNKNOWN_DISTANCE_KM,
};
pub use pricing::discount_percent;
pub use samples::sample_listings;
pub use types::*;
