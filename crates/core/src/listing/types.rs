//! Marketplace domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a wire string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Physical condition of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookCondition {
    #[serde(rename = "Like New")]
    LikeNew,
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Fair")]
    Fair,
    #[serde(rename = "Readable")]
    Readable,
}

impl BookCondition {
    pub const ALL: [BookCondition; 4] = [
        BookCondition::LikeNew,
        BookCondition::Good,
        BookCondition::Fair,
        BookCondition::Readable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookCondition::LikeNew => "Like New",
            BookCondition::Good => "Good",
            BookCondition::Fair => "Fair",
            BookCondition::Readable => "Readable",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            BookCondition::LikeNew => "like_new",
            BookCondition::Good => "good",
            BookCondition::Fair => "fair",
            BookCondition::Readable => "readable",
        }
    }
}

/// Exam a book is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamTag {
    #[serde(rename = "JEE Mains/Adv")]
    Jee,
    #[serde(rename = "NEET")]
    Neet,
    #[serde(rename = "UPSC/Civil Services")]
    Upsc,
    #[serde(rename = "SSC CGL")]
    Ssc,
    #[serde(rename = "CBSE Class 10")]
    Cbse10,
    #[serde(rename = "CBSE Class 11")]
    Cbse11,
    #[serde(rename = "CBSE Class 12")]
    Cbse12,
    #[serde(rename = "GATE")]
    Gate,
    #[serde(rename = "General Reading")]
    GeneralReading,
}

impl ExamTag {
    pub const ALL: [ExamTag; 9] = [
        ExamTag::Jee,
        ExamTag::Neet,
        ExamTag::Upsc,
        ExamTag::Ssc,
        ExamTag::Cbse10,
        ExamTag::Cbse11,
        ExamTag::Cbse12,
        ExamTag::Gate,
        ExamTag::GeneralReading,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExamTag::Jee => "JEE Mains/Adv",
            ExamTag::Neet => "NEET",
            ExamTag::Upsc => "UPSC/Civil Services",
            ExamTag::Ssc => "SSC CGL",
            ExamTag::Cbse10 => "CBSE Class 10",
            ExamTag::Cbse11 => "CBSE Class 11",
            ExamTag::Cbse12 => "CBSE Class 12",
            ExamTag::Gate => "GATE",
            ExamTag::GeneralReading => "General Reading",
        }
    }

    /// Short identifier accepted in query strings (`jee`, `cbse_12`, ...).
    pub fn code(&self) -> &'static str {
        match self {
            ExamTag::Jee => "jee",
            ExamTag::Neet => "neet",
            ExamTag::Upsc => "upsc",
            ExamTag::Ssc => "ssc",
            ExamTag::Cbse10 => "cbse_10",
            ExamTag::Cbse11 => "cbse_11",
            ExamTag::Cbse12 => "cbse_12",
            ExamTag::Gate => "gate",
            ExamTag::GeneralReading => "none",
        }
    }
}

/// Shelf a listing is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingCategory {
    #[serde(rename = "Exam Prep")]
    ExamPrep,
    #[serde(rename = "School Textbooks")]
    School,
    #[serde(rename = "Novels/Fiction")]
    Novel,
    #[serde(rename = "Reference")]
    Reference,
    #[serde(rename = "Other")]
    Other,
}

impl ListingCategory {
    pub const ALL: [ListingCategory; 5] = [
        ListingCategory::ExamPrep,
        ListingCategory::School,
        ListingCategory::Novel,
        ListingCategory::Reference,
        ListingCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingCategory::ExamPrep => "Exam Prep",
            ListingCategory::School => "School Textbooks",
            ListingCategory::Novel => "Novels/Fiction",
            ListingCategory::Reference => "Reference",
            ListingCategory::Other => "Other",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ListingCategory::ExamPrep => "exam_prep",
            ListingCategory::School => "school",
            ListingCategory::Novel => "novel",
            ListingCategory::Reference => "reference",
            ListingCategory::Other => "other",
        }
    }
}

/// Sale state of a listing. Only ever moves from `Available` to `Sold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    #[default]
    Available,
    Sold,
}

/// Rejected status change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("listing cannot move from {from} to {to}")]
pub struct InvalidTransition {
    pub from: ListingStatus,
    pub to: ListingStatus,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 2] = [ListingStatus::Available, ListingStatus::Sold];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Available => "available",
            ListingStatus::Sold => "sold",
        }
    }

    pub fn code(&self) -> &'static str {
        self.as_str()
    }

    /// Returns the new status if the move is allowed.
    ///
    /// Re-applying the current status is a no-op; `Sold` is terminal.
    pub fn transition_to(self, to: ListingStatus) -> Result<ListingStatus, InvalidTransition> {
        match (self, to) {
            (ListingStatus::Available, _) => Ok(to),
            (ListingStatus::Sold, ListingStatus::Sold) => Ok(to),
            (ListingStatus::Sold, ListingStatus::Available) => {
                Err(InvalidTransition { from: self, to })
            }
        }
    }
}

macro_rules! wire_string_impls {
    ($ty:ident, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            /// Accepts the wire label or the short code, case-insensitively.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s) || v.code().eq_ignore_ascii_case(s))
                    .ok_or_else(|| UnknownVariant::new($kind, s))
            }
        }
    };
}

wire_string_impls!(BookCondition, "condition");
wire_string_impls!(ExamTag, "exam tag");
wire_string_impls!(ListingCategory, "category");
wire_string_impls!(ListingStatus, "status");

/// A marketplace member. Sellers are embedded in listings with the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    /// Free-form exam interests, e.g. "JEE, NEET".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub rating: f64,
}

impl User {
    /// Placeholder seller used when the backend omits one.
    pub fn unknown() -> Self {
        Self {
            id: "unknown".to_string(),
            name: "Unknown".to_string(),
            email: String::new(),
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
}

/// A book offered for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub author: String,
    pub price: f64,
    pub original_price: f64,
    pub description: String,
    pub images: Vec<String>,
    pub condition: BookCondition,
    pub tags: Vec<ExamTag>,
    pub category: ListingCategory,
    pub location: String,
    pub pincode: String,
    pub seller: User,
    pub posted_at: DateTime<Utc>,
    pub status: ListingStatus,
    /// Filled in per query by the filter engine; never authoritative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl Listing {
    pub fn is_available(&self) -> bool {
        self.status == ListingStatus::Available
    }
}
