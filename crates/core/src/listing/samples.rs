//! Built-in demo catalogue.
//!
//! Shown when the backend has nothing to offer and used as the librarian's
//! catalogue in that case; the offline librarian's recommendations refer
//! to these ids.

use chrono::{DateTime, Utc};

use super::{BookCondition, ExamTag, Listing, ListingCategory, ListingStatus, User};

fn at(timestamp: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

fn seller(id: &str, name: &str, email: &str, avatar: &str, location: &str, rating: f64) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        avatar: Some(avatar.to_string()),
        phone: None,
        address: None,
        city: None,
        pincode: None,
        preferences: None,
        location: location.to_string(),
        rating,
    }
}

/// The five-book demo catalogue.
///
/// `distance_km` carries the stale values the demo data shipped with;
/// the filter engine recomputes it per query.
pub fn sample_listings() -> Vec<Listing> {
    vec![
        Listing {
            id: "l1".to_string(),
            title: "Concepts of Physics (Vol 1 & 2) - HC Verma".to_string(),
            author: "H.C. Verma".to_string(),
            price: 450.0,
            original_price: 900.0,
            description: "Bible for JEE aspirants. Both volumes available. Slightly marked with pencil but good condition.".to_string(),
            images: vec![
                "https://picsum.photos/id/24/400/600".to_string(),
                "https://picsum.photos/id/25/400/600".to_string(),
            ],
            condition: BookCondition::Good,
            tags: vec![ExamTag::Jee, ExamTag::Cbse12],
            category: ListingCategory::ExamPrep,
            location: "Indiranagar, Bangalore".to_string(),
            pincode: "560038".to_string(),
            seller: seller("s1", "Amit S.", "amit.s@example.com", "https://picsum.photos/id/1012/50/50", "Indiranagar", 4.5),
            posted_at: at("2023-10-25T10:00:00Z"),
            status: ListingStatus::Available,
            distance_km: Some(2.5),
        },
        Listing {
            id: "l2".to_string(),
            title: "Indian Polity - 6th Edition".to_string(),
            author: "M. Laxmikanth".to_string(),
            price: 300.0,
            original_price: 650.0,
            description: "Must have for UPSC. Highlighted important sections for quick revision.".to_string(),
            images: vec!["https://picsum.photos/id/20/400/600".to_string()],
            condition: BookCondition::Fair,
            tags: vec![ExamTag::Upsc],
            category: ListingCategory::ExamPrep,
            location: "Mukherjee Nagar, Delhi".to_string(),
            pincode: "110009".to_string(),
            seller: seller("s2", "Priya M.", "priya.m@example.com", "https://picsum.photos/id/1027/50/50", "Delhi", 4.9),
            posted_at: at("2023-10-24T14:30:00Z"),
            status: ListingStatus::Available,
            distance_km: Some(1200.0),
        },
        Listing {
            id: "l3".to_string(),
            title: "Biology NCERT Class 11 & 12".to_string(),
            author: "NCERT".to_string(),
            price: 150.0,
            original_price: 350.0,
            description: "Clean copies, no markings. Essential for NEET 2024.".to_string(),
            images: vec!["https://picsum.photos/id/30/400/600".to_string()],
            condition: BookCondition::LikeNew,
            tags: vec![ExamTag::Neet, ExamTag::Cbse11],
            category: ListingCategory::School,
            location: "Kota, Rajasthan".to_string(),
            pincode: "324005".to_string(),
            seller: seller("s3", "Sohan V.", "sohan.v@example.com", "https://picsum.photos/id/1001/50/50", "Kota", 4.2),
            posted_at: at("2023-10-26T09:15:00Z"),
            status: ListingStatus::Available,
            distance_km: Some(800.0),
        },
        Listing {
            id: "l4".to_string(),
            title: "Atomic Habits".to_string(),
            author: "James Clear".to_string(),
            price: 200.0,
            original_price: 500.0,
            description: "Best seller. Great read for productivity.".to_string(),
            images: vec!["https://picsum.photos/id/42/400/600".to_string()],
            condition: BookCondition::Good,
            tags: vec![ExamTag::GeneralReading],
            category: ListingCategory::Novel,
            location: "Jayanagar, Bangalore".to_string(),
            pincode: "560041".to_string(),
            seller: seller("s4", "Sneha R.", "sneha.r@example.com", "https://picsum.photos/id/1011/50/50", "Bangalore", 5.0),
            posted_at: at("2023-10-22T18:00:00Z"),
            status: ListingStatus::Available,
            distance_km: Some(4.2),
        },
        Listing {
            id: "l5".to_string(),
            title: "RD Sharma Mathematics Class 10".to_string(),
            author: "R.D. Sharma".to_string(),
            price: 250.0,
            original_price: 595.0,
            description: "Solved examples and exercises. Cover slightly torn.".to_string(),
            images: vec!["https://picsum.photos/id/55/400/600".to_string()],
            condition: BookCondition::Fair,
            tags: vec![ExamTag::Cbse10],
            category: ListingCategory::School,
            location: "Whitefield, Bangalore".to_string(),
            pincode: "560066".to_string(),
            seller: seller("s5", "Vikram", "vikram.k@example.com", "https://picsum.photos/id/1003/50/50", "Bangalore", 4.0),
            posted_at: at("2023-10-27T08:00:00Z"),
            status: ListingStatus::Available,
            distance_km: Some(15.0),
        },
    ]
}
