//! Client-side search, filter and sort over a listing snapshot.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use super::types::{ExamTag, Listing, ListingCategory, UnknownVariant};

/// Distance reported when either side has no usable pincode.
pub const UNKNOWN_DISTANCE_KM: f64 = 9999.0;

/// Kilometres per unit of pincode difference.
///
/// A crude stand-in for real geocoding: neighbouring pincodes tend to be
/// geographically close, nothing more.
pub const KM_PER_PINCODE_UNIT: f64 = 0.5;

/// Default upper bound of the price slider.
pub const DEFAULT_MAX_PRICE: f64 = 5000.0;

/// Either every value or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Choice<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Choice<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

impl<T> FromStr for Choice<T>
where
    T: FromStr<Err = UnknownVariant>,
{
    type Err = UnknownVariant;

    /// `""` and `"all"` select everything; anything else must name a variant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(Choice::All);
        }
        s.parse().map(Choice::Only)
    }
}

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Most recently posted first.
    #[default]
    Newest,
    /// Cheapest first.
    PriceLow,
    /// Closest first; listings with unknown distance last.
    Nearest,
}

impl FromStr for SortMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "newest" => Ok(SortMode::Newest),
            "price_low" => Ok(SortMode::PriceLow),
            "nearest" => Ok(SortMode::Nearest),
            other => Err(UnknownVariant {
                kind: "sort mode",
                value: other.to_string(),
            }),
        }
    }
}

/// The browse screen's current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFilter {
    /// Case-insensitive substring of title or author. Empty matches all.
    pub search: String,
    pub tag: Choice<ExamTag>,
    pub category: Choice<ListingCategory>,
    pub min_price: f64,
    pub max_price: f64,
    pub sort: SortMode,
}

impl Default for ListingFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            tag: Choice::All,
            category: Choice::All,
            min_price: 0.0,
            max_price: DEFAULT_MAX_PRICE,
            sort: SortMode::Newest,
        }
    }
}

impl ListingFilter {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_tag(mut self, tag: ExamTag) -> Self {
        self.tag = Choice::Only(tag);
        self
    }

    pub fn with_category(mut self, category: ListingCategory) -> Self {
        self.category = Choice::Only(category);
        self
    }

    pub fn with_max_price(mut self, max_price: f64) -> Self {
        self.max_price = max_price;
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    fn matches(&self, listing: &Listing, needle: &str) -> bool {
        let matches_search = listing.title.to_lowercase().contains(needle)
            || listing.author.to_lowercase().contains(needle);

        matches_search
            && self.tag_matches(listing)
            && self.category.admits(&listing.category)
            && listing.price >= self.min_price
            && listing.price <= self.max_price
    }

    fn tag_matches(&self, listing: &Listing) -> bool {
        match self.tag {
            Choice::All => true,
            Choice::Only(tag) => listing.tags.contains(&tag),
        }
    }
}

fn parse_pincode(pincode: &str) -> Option<u64> {
    let pincode = pincode.trim();
    if pincode.is_empty() || !pincode.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    pincode.parse().ok()
}

/// Heuristic distance between a user and a listing.
///
/// Returns [`UNKNOWN_DISTANCE_KM`] if either pincode is missing or not numeric.
pub fn estimate_distance_km(user_pincode: Option<&str>, listing_pincode: &str) -> f64 {
    known_distance_km(user_pincode, listing_pincode).unwrap_or(UNKNOWN_DISTANCE_KM)
}

fn known_distance_km(user_pincode: Option<&str>, listing_pincode: &str) -> Option<f64> {
    let user = user_pincode.and_then(parse_pincode)?;
    let listing = parse_pincode(listing_pincode)?;
    Some(user.abs_diff(listing) as f64 * KM_PER_PINCODE_UNIT)
}

/// Produce the ordered listings to render for the given selection.
///
/// Every returned listing carries a freshly computed `distance_km`. The sort
/// is stable, so ties keep their input order. Under [`SortMode::Nearest`]
/// listings with an unknown distance come after every known one, even when
/// the heuristic yields a figure above the sentinel.
pub fn apply_filter(
    listings: &[Listing],
    filter: &ListingFilter,
    user_pincode: Option<&str>,
) -> Vec<Listing> {
    let needle = filter.search.to_lowercase();

    let mut results: Vec<(Listing, Option<f64>)> = listings
        .iter()
        .filter(|listing| filter.matches(listing, &needle))
        .map(|listing| {
            let known = known_distance_km(user_pincode, &listing.pincode);
            let mut listing = listing.clone();
            listing.distance_km = Some(known.unwrap_or(UNKNOWN_DISTANCE_KM));
            (listing, known)
        })
        .collect();

    match filter.sort {
        SortMode::PriceLow => results.sort_by(|(a, _), (b, _)| a.price.total_cmp(&b.price)),
        SortMode::Nearest => results.sort_by(|(_, a), (_, b)| nearest_first(*a, *b)),
        SortMode::Newest => results.sort_by(|(a, _), (b, _)| b.posted_at.cmp(&a.posted_at)),
    }

    results.into_iter().map(|(listing, _)| listing).collect()
}

fn nearest_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
