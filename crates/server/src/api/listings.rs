//! Listing API handlers.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use bookbridge_core::backend::{ImageUpload, ListingDraft, ListingQuery};
use bookbridge_core::listing::{
    apply_filter, Choice, ExamTag, Listing, ListingCategory, ListingFilter, SortMode,
    DEFAULT_MAX_PRICE,
};
use bookbridge_core::validation::{validate_image_batch, validate_listing_draft};
use bookbridge_core::Session;

use super::error::ApiError;
use crate::state::AppState;

/// Largest accepted multipart body for image uploads.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for browsing listings
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    #[serde(default)]
    pub search: String,
    /// Exam tag label or code; empty or "all" for every tag
    pub tag: Option<String>,
    /// Category label or code; empty or "all" for every category
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// "newest" (default), "price_low" or "nearest"
    pub sort: Option<String>,
}

impl ListingParams {
    fn to_filter(&self) -> Result<ListingFilter, ApiError> {
        let tag: Choice<ExamTag> = parse_param(self.tag.as_deref())?;
        let category: Choice<ListingCategory> = parse_param(self.category.as_deref())?;
        let sort: SortMode = match self.sort.as_deref().map(str::trim) {
            None | Some("") => SortMode::default(),
            Some(s) => s.parse().map_err(|e| ApiError::BadRequest(format!("{}", e)))?,
        };

        let min_price = self.min_price.unwrap_or(0.0);
        let max_price = self.max_price.unwrap_or(DEFAULT_MAX_PRICE);
        if min_price < 0.0 || max_price < 0.0 {
            return Err(ApiError::BadRequest("Prices cannot be negative".to_string()));
        }
        if min_price > max_price {
            return Err(ApiError::BadRequest(
                "min_price cannot exceed max_price".to_string(),
            ));
        }

        Ok(ListingFilter {
            search: self.search.clone(),
            tag,
            category,
            min_price,
            max_price,
            sort,
        })
    }

    /// The subset the backend can filter on itself.
    fn to_query(&self, filter: &ListingFilter) -> ListingQuery {
        ListingQuery {
            category: match filter.category {
                Choice::All => None,
                Choice::Only(category) => Some(category),
            },
            min_price: self.min_price,
            max_price: self.max_price,
            sort: self.sort.as_ref().map(|_| filter.sort),
        }
    }
}

fn parse_param<T>(value: Option<&str>) -> Result<Choice<T>, ApiError>
where
    Choice<T>: std::str::FromStr<Err = bookbridge_core::listing::UnknownVariant>,
{
    value
        .unwrap_or("")
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("{}", e)))
}

/// A listing as shown on a card: the listing plus its discount.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingView {
    #[serde(flatten)]
    pub listing: Listing,
    pub discount_percent: i64,
}

impl From<Listing> for ListingView {
    fn from(listing: Listing) -> Self {
        Self {
            discount_percent: listing.discount_percent(),
            listing,
        }
    }
}

fn views(listings: Vec<Listing>) -> Vec<ListingView> {
    listings.into_iter().map(ListingView::from).collect()
}

/// Query parameters for image uploads
#[derive(Debug, Default, Deserialize)]
pub struct UploadParams {
    /// Photos already attached to the form.
    #[serde(default)]
    pub existing: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub urls: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn signed_in(state: &AppState) -> Result<Session, ApiError> {
    let session = state.auth().session().await;
    if session.is_authenticated() {
        Ok(session)
    } else {
        Err(ApiError::NotAuthenticated)
    }
}

/// Browse listings with search, filters and sorting
pub async fn list_listings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListingParams>,
) -> Result<Json<Vec<ListingView>>, ApiError> {
    let filter = params.to_filter()?;
    let listings = state.market().list_listings(&params.to_query(&filter)).await;

    let session = state.auth().session().await;
    let results = apply_filter(&listings, &filter, session.pincode());
    Ok(Json(views(results)))
}

/// Listings posted by the signed-in user
pub async fn my_listings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ListingView>>, ApiError> {
    let session = signed_in(&state).await?;
    let listings = state.market().my_listings(&session).await;
    Ok(Json(views(listings)))
}

/// Post a new listing
pub async fn create_listing(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ListingDraft>,
) -> Result<(StatusCode, Json<ListingView>), ApiError> {
    validate_listing_draft(&draft)?;
    let session = signed_in(&state).await?;

    let listing = state.market().create_listing(&session, &draft).await?;
    info!(listing_id = %listing.id, title = %listing.title, "Listing created");
    Ok((StatusCode::CREATED, Json(ListingView::from(listing))))
}

/// Mark a listing as sold
pub async fn mark_sold(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let session = signed_in(&state).await?;
    state.market().mark_sold(&session, &id).await?;
    info!(listing_id = %id, "Listing marked sold");
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a listing
pub async fn delete_listing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let session = signed_in(&state).await?;
    state.market().delete_listing(&session, &id).await?;
    info!(listing_id = %id, "Listing deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Upload listing photos (multipart field `images`, one or more files)
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let session = signed_in(&state).await?;

    let mut images = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("images") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("image").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        images.push(ImageUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    validate_image_batch(params.existing, images.len())?;

    let market = state.market();
    let urls = try_join_all(
        images
            .into_iter()
            .map(|image| market.upload_image(&session, image)),
    )
    .await?;

    Ok(Json(UploadResponse { urls }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(tag: &str, category: &str, sort: &str) -> ListingParams {
        ListingParams {
            tag: Some(tag.to_string()),
            category: Some(category.to_string()),
            sort: Some(sort.to_string()),
            ..ListingParams::default()
        }
    }

    #[test]
    fn test_params_accept_labels_and_codes() {
        let filter = params("JEE Mains/Adv", "school", "price_low").to_filter().unwrap();
        assert_eq!(filter.tag, Choice::Only(ExamTag::Jee));
        assert_eq!(filter.category, Choice::Only(ListingCategory::School));
        assert_eq!(filter.sort, SortMode::PriceLow);
        assert_eq!(filter.max_price, DEFAULT_MAX_PRICE);

        let filter = params("all", "", "").to_filter().unwrap();
        assert_eq!(filter.tag, Choice::All);
        assert_eq!(filter.category, Choice::All);
        assert_eq!(filter.sort, SortMode::Newest);
    }

    #[test]
    fn test_params_reject_unknown_values() {
        assert!(matches!(
            params("ICSE", "", "").to_filter(),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            params("", "", "cheapest").to_filter(),
            Err(ApiError::BadRequest(_))
        ));

        let inverted = ListingParams {
            min_price: Some(500.0),
            max_price: Some(100.0),
            ..ListingParams::default()
        };
        assert!(matches!(inverted.to_filter(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_backend_query_only_carries_explicit_values() {
        let p = ListingParams {
            category: Some("Exam Prep".to_string()),
            max_price: Some(800.0),
            ..ListingParams::default()
        };
        let filter = p.to_filter().unwrap();
        let query = p.to_query(&filter);
        assert_eq!(query.category, Some(ListingCategory::ExamPrep));
        assert_eq!(query.min_price, None);
        assert_eq!(query.max_price, Some(800.0));
        assert_eq!(query.sort, None);
    }
}
