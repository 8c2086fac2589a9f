//! Testing utilities and mock implementations.
//!
//! Mocks for the two external services (the marketplace backend and the
//! generative model) plus the sample catalogue, so the gateway can be
//! exercised end to end without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use bookbridge_core::testing::{fixtures, MockMarketplace};
//!
//! let market = MockMarketplace::with_listings(fixtures::sample_listings());
//! market.add_account("rahul.kumar@example.com", "secret1", fixtures::mock_user()).await;
//!
//! let auth = market.login("rahul.kumar@example.com", "secret1").await?;
//! assert_eq!(market.recorded_calls().await, vec!["login"]);
//! ```

mod mock_llm;
mod mock_marketplace;

pub use mock_llm::MockLlmClient;
pub use mock_marketplace::MockMarketplace;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{DateTime, Utc};

    use crate::backend::ListingDraft;
    use crate::listing::{
        BookCondition, ExamTag, Listing, ListingCategory, ListingStatus, User,
    };

    fn at(timestamp: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(timestamp)
            .expect("fixture timestamp")
            .with_timezone(&Utc)
    }

    /// A user with only an id and name set.
    pub fn user(id: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            avatar: None,
            phone: None,
            address: None,
            city: None,
            pincode: None,
            preferences: None,
            location: String::new(),
            rating: 0.0,
        }
    }

    /// The demo account.
    pub fn mock_user() -> User {
        User {
            avatar: Some("https://picsum.photos/id/1005/100/100".to_string()),
            location: "Koramangala, Bangalore".to_string(),
            rating: 4.8,
            ..user("u1", "Rahul Kumar")
        }
    }

    /// A minimal available listing.
    pub fn listing(id: &str, title: &str, price: f64) -> Listing {
        Listing {
            id: id.to_string(),
            title: title.to_string(),
            author: "Unknown Author".to_string(),
            price,
            original_price: price * 2.0,
            description: format!("{} in usable condition.", title),
            images: vec![format!("https://picsum.photos/seed/{}/400/600", id)],
            condition: BookCondition::Good,
            tags: vec![ExamTag::GeneralReading],
            category: ListingCategory::Other,
            location: "Bangalore".to_string(),
            pincode: "560001".to_string(),
            seller: user("s0", "Test Seller"),
            posted_at: at("2023-10-20T00:00:00Z"),
            status: ListingStatus::Available,
            distance_km: None,
        }
    }

    /// A sell form that passes validation.
    pub fn listing_draft() -> ListingDraft {
        ListingDraft {
            title: "Concepts of Physics Vol 1".to_string(),
            author: "H.C. Verma".to_string(),
            category: ListingCategory::ExamPrep,
            exam_type: ExamTag::Jee,
            condition: BookCondition::Good,
            price: 450.0,
            mrp: 900.0,
            description: "Standard physics book for JEE preparation.".to_string(),
            pincode: "560038".to_string(),
            city: "Bangalore".to_string(),
            address: "Indiranagar 100ft Road".to_string(),
            images: vec!["https://picsum.photos/id/24/400/600".to_string()],
        }
    }

    pub use crate::listing::sample_listings;
}
