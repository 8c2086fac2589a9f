//! Wire types for the marketplace backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::listing::{
    BookCondition, ExamTag, Listing, ListingCategory, ListingStatus, SortMode, UnknownVariant,
    User,
};

/// Returned by login and signup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Profile fields a user can edit after signup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub phone: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    /// Exam interests, e.g. "JEE Mains/Adv".
    #[serde(default)]
    pub preferences: String,
}

/// The sell-a-book form as submitted to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub title: String,
    pub author: String,
    pub category: ListingCategory,
    pub exam_type: ExamTag,
    pub condition: BookCondition,
    pub price: f64,
    /// Printed price of a new copy.
    #[serde(default)]
    pub mrp: f64,
    pub description: String,
    pub pincode: String,
    pub city: String,
    pub address: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Server-side filters for the listing index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    pub category: Option<ListingCategory>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: Option<SortMode>,
}

impl ListingQuery {
    /// Query-string pairs; zero prices are treated as unset.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(category) = self.category {
            params.push(("category", category.as_str().to_string()));
        }
        if let Some(min) = self.min_price.filter(|p| *p > 0.0) {
            params.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.max_price.filter(|p| *p > 0.0) {
            params.push(("maxPrice", max.to_string()));
        }
        if let Some(sort) = self.sort {
            let sort = match sort {
                SortMode::Newest => "newest",
                SortMode::PriceLow => "price_low",
                SortMode::Nearest => "nearest",
            };
            params.push(("sort", sort.to_string()));
        }
        params
    }
}

/// A picture to attach to a listing.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

/// Why a backend listing could not be turned into a [`Listing`].
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("listing has no id")]
    MissingId,

    #[error("listing {id} has no {field}")]
    MissingField { id: String, field: &'static str },

    #[error("listing {id}: {source}")]
    Unknown {
        id: String,
        #[source]
        source: UnknownVariant,
    },
}

/// Listing as the backend stores it.
///
/// Older records use Mongo-style `_id`, `mrp`, a single `examType` and
/// `created_at`; newer ones use the client's names. Prices may arrive as
/// numbers or numeric strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawListing {
    #[serde(rename = "_id", default)]
    pub mongo_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub original_price: Option<Value>,
    #[serde(default)]
    pub mrp: Option<Value>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub exam_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    /// Populated seller object, or a bare id when the backend did not
    /// populate the reference.
    #[serde(default)]
    pub seller: Option<Value>,
    #[serde(default)]
    pub posted_at: Option<String>,
    #[serde(rename = "created_at", default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// User as the backend sends it.
///
/// Records may carry `_id`, `id` or both; `_id` wins.
#[derive(Debug, Default, Deserialize)]
pub struct RawUser {
    #[serde(rename = "_id", default)]
    pub mongo_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub preferences: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub rating: Option<Value>,
}

impl From<RawUser> for User {
    /// Missing ids become `"unknown"`; the display location falls back to
    /// the city.
    fn from(raw: RawUser) -> Self {
        let fallback = User::unknown();
        let location = non_empty(raw.location)
            .or_else(|| non_empty(raw.city.clone()))
            .unwrap_or_default();
        User {
            id: non_empty(raw.mongo_id)
                .or_else(|| non_empty(raw.id))
                .unwrap_or(fallback.id),
            name: raw.name,
            email: raw.email,
            avatar: raw.avatar,
            phone: raw.phone,
            address: raw.address,
            city: raw.city,
            pincode: raw.pincode,
            preferences: raw.preferences,
            location,
            rating: number(raw.rating.as_ref()).unwrap_or(0.0),
        }
    }
}

/// Login/signup reply before the user is normalized.
#[derive(Debug, Deserialize)]
pub(crate) struct RawAuthResponse {
    pub user: RawUser,
    pub token: String,
}

impl From<RawAuthResponse> for AuthResponse {
    fn from(raw: RawAuthResponse) -> Self {
        AuthResponse {
            user: raw.user.into(),
            token: raw.token,
        }
    }
}

/// Embedded seller: a populated object, or just its id.
fn seller(value: Option<Value>) -> User {
    match value {
        Some(Value::Object(fields)) => serde_json::from_value::<RawUser>(Value::Object(fields))
            .map(User::from)
            .unwrap_or_else(|_| User::unknown()),
        Some(Value::String(id)) if !id.trim().is_empty() => User {
            id,
            ..User::unknown()
        },
        _ => User::unknown(),
    }
}

impl TryFrom<RawListing> for Listing {
    type Error = NormalizeError;

    fn try_from(raw: RawListing) -> Result<Self, Self::Error> {
        let id = non_empty(raw.mongo_id)
            .or_else(|| non_empty(raw.id))
            .ok_or(NormalizeError::MissingId)?;

        let unknown = |source| NormalizeError::Unknown {
            id: id.clone(),
            source,
        };

        let condition: BookCondition = raw
            .condition
            .as_deref()
            .ok_or_else(|| NormalizeError::MissingField {
                id: id.clone(),
                field: "condition",
            })?
            .parse()
            .map_err(unknown)?;

        let category: ListingCategory = raw
            .category
            .as_deref()
            .ok_or_else(|| NormalizeError::MissingField {
                id: id.clone(),
                field: "category",
            })?
            .parse()
            .map_err(unknown)?;

        let status = match raw.status.as_deref() {
            None | Some("") => ListingStatus::Available,
            Some(s) => s.parse().map_err(unknown)?,
        };

        // Unrecognised tags are dropped rather than rejecting the listing.
        let tag_names = match raw.tags {
            Some(tags) => tags,
            None => raw.exam_type.into_iter().collect(),
        };
        let mut tags: Vec<ExamTag> = Vec::with_capacity(tag_names.len());
        for name in &tag_names {
            if let Ok(tag) = name.parse::<ExamTag>() {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
        }

        let original_price = number(raw.mrp.as_ref())
            .filter(|p| *p > 0.0)
            .or_else(|| number(raw.original_price.as_ref()))
            .unwrap_or(0.0);

        let posted_at = timestamp(raw.created_at.as_deref())
            .or_else(|| timestamp(raw.posted_at.as_deref()))
            .unwrap_or_else(Utc::now);

        let location = non_empty(raw.location)
            .or_else(|| non_empty(raw.city))
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(Listing {
            id,
            title: raw.title,
            author: raw.author,
            price: number(raw.price.as_ref()).unwrap_or(0.0),
            original_price,
            description: raw.description,
            images: raw.images,
            condition,
            tags,
            category,
            location,
            pincode: raw.pincode.unwrap_or_default(),
            seller: seller(raw.seller),
            posted_at,
            status,
            distance_km: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawListing {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_mongo_shaped_listing() {
        let listing = Listing::try_from(raw(json!({
            "_id": "65a1f0",
            "title": "Indian Polity - 6th Edition",
            "author": "M. Laxmikanth",
            "price": "300",
            "mrp": 650,
            "description": "Must have for UPSC.",
            "images": ["https://cdn.example.com/polity.jpg"],
            "condition": "Fair",
            "examType": "UPSC/Civil Services",
            "category": "Exam Prep",
            "city": "Delhi",
            "pincode": "110009",
            "created_at": "2023-10-24T14:30:00.000Z",
            "status": "available"
        })))
        .unwrap();

        assert_eq!(listing.id, "65a1f0");
        assert_eq!(listing.price, 300.0);
        assert_eq!(listing.original_price, 650.0);
        assert_eq!(listing.tags, vec![ExamTag::Upsc]);
        assert_eq!(listing.location, "Delhi");
        assert_eq!(listing.posted_at.to_rfc3339(), "2023-10-24T14:30:00+00:00");
        assert_eq!(listing.seller.id, "unknown");
        assert_eq!(listing.seller.name, "Unknown");
        assert_eq!(listing.status, ListingStatus::Available);
        assert!(listing.distance_km.is_none());
    }

    #[test]
    fn test_client_shaped_listing() {
        let listing = Listing::try_from(raw(json!({
            "id": "l1",
            "title": "Concepts of Physics",
            "author": "H.C. Verma",
            "price": 450,
            "originalPrice": 900,
            "condition": "Good",
            "tags": ["JEE Mains/Adv", "CBSE Class 12", "Olympiad"],
            "category": "Exam Prep",
            "location": "Indiranagar, Bangalore",
            "pincode": "560038",
            "seller": {"_id": "s1", "name": "Amit S.", "city": "Bangalore", "rating": 4.5},
            "postedAt": "2023-10-25T10:00:00Z",
            "status": "sold",
            "distanceKm": 2.5
        })))
        .unwrap();

        assert_eq!(listing.original_price, 900.0);
        assert_eq!(listing.tags, vec![ExamTag::Jee, ExamTag::Cbse12]);
        assert_eq!(listing.seller.id, "s1");
        assert_eq!(listing.seller.location, "Bangalore");
        assert_eq!(listing.status, ListingStatus::Sold);
        // Backend-provided distance is never trusted.
        assert!(listing.distance_km.is_none());
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let listing = Listing::try_from(raw(json!({
            "id": "l9",
            "title": "Untitled",
            "condition": "Readable",
            "category": "Other"
        })))
        .unwrap();

        assert_eq!(listing.original_price, 0.0);
        assert_eq!(listing.location, "Unknown");
        assert!(listing.tags.is_empty());
        assert_eq!(listing.pincode, "");
    }

    #[test]
    fn test_rejects_missing_id_and_unknown_enums() {
        assert!(matches!(
            Listing::try_from(raw(json!({"condition": "Good", "category": "Other"}))),
            Err(NormalizeError::MissingId)
        ));
        assert!(matches!(
            Listing::try_from(raw(json!({"id": "x", "condition": "Mint", "category": "Other"}))),
            Err(NormalizeError::Unknown { .. })
        ));
        assert!(matches!(
            Listing::try_from(raw(json!({"id": "x", "condition": "Good"}))),
            Err(NormalizeError::MissingField { field: "category", .. })
        ));
    }

    #[test]
    fn test_seller_with_both_id_keys() {
        let listing = Listing::try_from(raw(json!({
            "_id": "a1",
            "condition": "Good",
            "category": "Exam Prep",
            "seller": {"_id": "s1", "id": "s1-virtual", "name": "Amit", "rating": "4.5"}
        })))
        .unwrap();

        assert_eq!(listing.seller.id, "s1");
        assert_eq!(listing.seller.name, "Amit");
        assert_eq!(listing.seller.rating, 4.5);
    }

    #[test]
    fn test_unpopulated_seller_keeps_its_id() {
        let listing = Listing::try_from(raw(json!({
            "_id": "a2",
            "condition": "Good",
            "category": "Other",
            "seller": "65a1f0c2e4b0a1b2c3d4e5f6"
        })))
        .unwrap();

        assert_eq!(listing.seller.id, "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(listing.seller.name, "Unknown");

        let listing = Listing::try_from(raw(json!({
            "_id": "a3",
            "condition": "Good",
            "category": "Other",
            "seller": null
        })))
        .unwrap();
        assert_eq!(listing.seller, User::unknown());
    }

    #[test]
    fn test_auth_user_with_both_id_keys() {
        let auth: RawAuthResponse = serde_json::from_value(json!({
            "token": "tok-1",
            "user": {"_id": "u1", "id": "u1", "email": "riya@example.com", "city": "Pune"}
        }))
        .unwrap();
        let auth = AuthResponse::from(auth);

        assert_eq!(auth.user.id, "u1");
        assert_eq!(auth.user.name, "");
        assert_eq!(auth.user.location, "Pune");
        assert_eq!(auth.token, "tok-1");
    }

    #[test]
    fn test_user_without_any_id() {
        let user = User::from(RawUser {
            name: "Riya".to_string(),
            ..RawUser::default()
        });
        assert_eq!(user.id, "unknown");
        assert_eq!(user.location, "");
    }

    #[test]
    fn test_listing_query_params() {
        let query = ListingQuery {
            category: Some(ListingCategory::School),
            min_price: Some(0.0),
            max_price: Some(500.0),
            sort: Some(SortMode::PriceLow),
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("category", "School Textbooks".to_string()),
                ("maxPrice", "500".to_string()),
                ("sort", "price_low".to_string()),
            ]
        );
        assert!(ListingQuery::default().to_params().is_empty());
    }

    #[test]
    fn test_listing_draft_wire_names() {
        let draft = ListingDraft {
            title: "Atomic Habits".to_string(),
            author: "James Clear".to_string(),
            category: ListingCategory::Novel,
            exam_type: ExamTag::GeneralReading,
            condition: BookCondition::Good,
            price: 200.0,
            mrp: 500.0,
            description: "Best seller. Great read for productivity.".to_string(),
            pincode: "560041".to_string(),
            city: "Bangalore".to_string(),
            address: "Jayanagar 4th Block".to_string(),
            images: vec!["https://cdn.example.com/a.jpg".to_string()],
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["examType"], "General Reading");
        assert_eq!(value["category"], "Novels/Fiction");
        assert_eq!(value["mrp"], 500.0);
    }
}
