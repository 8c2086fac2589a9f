//! Marketplace backend client.
//!
//! The backend owns users, listings and uploaded images. This module
//! abstracts it behind the [`Marketplace`] trait so the gateway can run
//! against the REST service or an in-memory mock.

mod rest;
mod types;

pub use rest::RestMarketplace;
pub use types::{
    AuthResponse, ImageUpload, ListingDraft, ListingQuery, NormalizeError, ProfileUpdate,
    RawListing, RawUser,
};

use async_trait::async_trait;
use thiserror::Error;

use crate::listing::{Listing, User};
use crate::session::Session;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx reply. `message` is the backend's own `error` text when it
    /// sent one.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl BackendError {
    /// HTTP status carried by the error, if the backend replied at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Operations offered by the marketplace backend.
///
/// Mutations take the caller's [`Session`] and fail with
/// [`BackendError::NotAuthenticated`] when it carries no token. Reads
/// never fail: they return an empty list and log instead.
#[async_trait]
pub trait Marketplace: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, BackendError>;

    async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, BackendError>;

    /// Returns the updated user record.
    async fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> Result<User, BackendError>;

    async fn create_listing(
        &self,
        session: &Session,
        draft: &ListingDraft,
    ) -> Result<Listing, BackendError>;

    async fn list_listings(&self, query: &ListingQuery) -> Vec<Listing>;

    /// Listings posted by the session's user. Empty when logged out.
    async fn my_listings(&self, session: &Session) -> Vec<Listing>;

    async fn mark_sold(&self, session: &Session, listing_id: &str) -> Result<(), BackendError>;

    async fn delete_listing(&self, session: &Session, listing_id: &str)
        -> Result<(), BackendError>;

    /// Upload one image, returning its public URL.
    async fn upload_image(
        &self,
        session: &Session,
        image: ImageUpload,
    ) -> Result<String, BackendError>;
}
