//! Mock marketplace backend for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::backend::{
    AuthResponse, BackendError, ImageUpload, ListingDraft, ListingQuery, Marketplace,
    ProfileUpdate,
};
use crate::listing::{Listing, ListingStatus, User};
use crate::session::Session;

#[derive(Debug, Clone)]
struct Account {
    password: String,
    user: User,
}

/// In-memory implementation of the Marketplace trait.
///
/// Keeps accounts and listings in memory, hands out `mock-token-<user id>`
/// bearer tokens and records the name of every operation called.
#[derive(Debug, Clone, Default)]
pub struct MockMarketplace {
    listings: Arc<RwLock<Vec<Listing>>>,
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    uploads: Arc<RwLock<Vec<ImageUpload>>>,
    calls: Arc<RwLock<Vec<String>>>,
    /// If set, the next mutation fails with this error.
    next_error: Arc<RwLock<Option<BackendError>>>,
    /// When true, read paths behave as if the backend were down.
    unavailable: Arc<RwLock<bool>>,
}

impl MockMarketplace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock pre-populated with listings.
    pub fn with_listings(listings: Vec<Listing>) -> Self {
        Self {
            listings: Arc::new(RwLock::new(listings)),
            ..Self::default()
        }
    }

    /// Register an account that can log in.
    pub async fn add_account(&self, email: &str, password: &str, user: User) {
        self.accounts.write().await.insert(
            email.to_lowercase(),
            Account {
                password: password.to_string(),
                user,
            },
        );
    }

    pub async fn set_listings(&self, listings: Vec<Listing>) {
        *self.listings.write().await = listings;
    }

    /// Current backend-side listings.
    pub async fn listings(&self) -> Vec<Listing> {
        self.listings.read().await.clone()
    }

    /// Make the next mutation fail.
    pub async fn set_next_error(&self, error: BackendError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().await = unavailable;
    }

    /// Operation names in call order.
    pub async fn recorded_calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    pub async fn recorded_uploads(&self) -> Vec<ImageUpload> {
        self.uploads.read().await.clone()
    }

    fn token_for(user: &User) -> String {
        format!("mock-token-{}", user.id)
    }

    async fn record(&self, operation: &str) {
        self.calls.write().await.push(operation.to_string());
    }

    async fn take_error(&self) -> Result<(), BackendError> {
        match self.next_error.write().await.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Resolve the session to the account it was issued for.
    async fn authorize(&self, session: &Session) -> Result<User, BackendError> {
        let token = session.bearer().ok_or(BackendError::NotAuthenticated)?;
        self.accounts
            .read()
            .await
            .values()
            .map(|account| &account.user)
            .find(|user| Self::token_for(user) == token)
            .cloned()
            .ok_or_else(|| BackendError::Api {
                status: 401,
                message: "Invalid token".to_string(),
            })
    }

    fn not_found() -> BackendError {
        BackendError::Api {
            status: 404,
            message: "Listing not found".to_string(),
        }
    }
}

#[async_trait]
impl Marketplace for MockMarketplace {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, BackendError> {
        self.record("login").await;
        self.take_error().await?;

        let accounts = self.accounts.read().await;
        match accounts.get(&email.to_lowercase()) {
            Some(account) if account.password == password => Ok(AuthResponse {
                token: Self::token_for(&account.user),
                user: account.user.clone(),
            }),
            _ => Err(BackendError::Api {
                status: 401,
                message: "Invalid credentials".to_string(),
            }),
        }
    }

    async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, BackendError> {
        self.record("signup").await;
        self.take_error().await?;

        let mut accounts = self.accounts.write().await;
        let key = email.to_lowercase();
        if accounts.contains_key(&key) {
            return Err(BackendError::Api {
                status: 400,
                message: "User already exists".to_string(),
            });
        }

        let mut user = User::unknown();
        user.id = format!("u{}", accounts.len() + 100);
        user.name = name.to_string();
        user.email = email.to_string();
        accounts.insert(
            key,
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );

        Ok(AuthResponse {
            token: Self::token_for(&user),
            user,
        })
    }

    async fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> Result<User, BackendError> {
        self.record("update_profile").await;
        let user = self.authorize(session).await?;
        self.take_error().await?;

        let mut accounts = self.accounts.write().await;
        let account = accounts
            .values_mut()
            .find(|account| account.user.id == user.id)
            .ok_or(BackendError::NotAuthenticated)?;

        let user = &mut account.user;
        user.phone = Some(update.phone.clone());
        user.address = Some(update.address.clone());
        user.city = Some(update.city.clone());
        user.pincode = Some(update.pincode.clone()).filter(|p| !p.is_empty());
        user.preferences = Some(update.preferences.clone()).filter(|p| !p.is_empty());
        if !update.city.is_empty() {
            user.location = update.city.clone();
        }
        Ok(user.clone())
    }

    async fn create_listing(
        &self,
        session: &Session,
        draft: &ListingDraft,
    ) -> Result<Listing, BackendError> {
        self.record("create_listing").await;
        let seller = self.authorize(session).await?;
        self.take_error().await?;

        let mut listings = self.listings.write().await;
        let listing = Listing {
            id: format!("m{}", listings.len() + 1),
            title: draft.title.clone(),
            author: draft.author.clone(),
            price: draft.price,
            original_price: draft.mrp,
            description: draft.description.clone(),
            images: draft.images.clone(),
            condition: draft.condition,
            tags: vec![draft.exam_type],
            category: draft.category,
            location: draft.city.clone(),
            pincode: draft.pincode.clone(),
            seller,
            posted_at: Utc::now(),
            status: ListingStatus::Available,
            distance_km: None,
        };
        listings.push(listing.clone());
        Ok(listing)
    }

    async fn list_listings(&self, query: &ListingQuery) -> Vec<Listing> {
        self.record("list_listings").await;
        if *self.unavailable.read().await {
            return Vec::new();
        }

        self.listings
            .read()
            .await
            .iter()
            .filter(|l| query.category.is_none_or(|c| l.category == c))
            .filter(|l| query.min_price.is_none_or(|p| l.price >= p))
            .filter(|l| query.max_price.is_none_or(|p| l.price <= p))
            .cloned()
            .collect()
    }

    async fn my_listings(&self, session: &Session) -> Vec<Listing> {
        self.record("my_listings").await;
        if *self.unavailable.read().await {
            return Vec::new();
        }
        let Ok(user) = self.authorize(session).await else {
            return Vec::new();
        };

        self.listings
            .read()
            .await
            .iter()
            .filter(|l| l.seller.id == user.id)
            .cloned()
            .collect()
    }

    async fn mark_sold(&self, session: &Session, listing_id: &str) -> Result<(), BackendError> {
        self.record("mark_sold").await;
        self.authorize(session).await?;
        self.take_error().await?;

        let mut listings = self.listings.write().await;
        let listing = listings
            .iter_mut()
            .find(|l| l.id == listing_id)
            .ok_or_else(Self::not_found)?;
        listing.status = listing
            .status
            .transition_to(ListingStatus::Sold)
            .map_err(|e| BackendError::Api {
                status: 409,
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn delete_listing(
        &self,
        session: &Session,
        listing_id: &str,
    ) -> Result<(), BackendError> {
        self.record("delete_listing").await;
        self.authorize(session).await?;
        self.take_error().await?;

        let mut listings = self.listings.write().await;
        let before = listings.len();
        listings.retain(|l| l.id != listing_id);
        if listings.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }

    async fn upload_image(
        &self,
        session: &Session,
        image: ImageUpload,
    ) -> Result<String, BackendError> {
        self.record("upload_image").await;
        self.authorize(session).await?;
        self.take_error().await?;

        let mut uploads = self.uploads.write().await;
        let url = format!(
            "https://cdn.bookbridge.test/uploads/{}-{}",
            uploads.len() + 1,
            image.file_name
        );
        uploads.push(image);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_login_and_authorize() {
        let market = MockMarketplace::with_listings(fixtures::sample_listings());
        market
            .add_account("Rahul.Kumar@example.com", "secret1", fixtures::mock_user())
            .await;

        let auth = market.login("rahul.kumar@example.com", "secret1").await.unwrap();
        assert_eq!(auth.token, "mock-token-u1");

        let err = market.login("rahul.kumar@example.com", "nope").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");

        let session = Session::authenticated(auth.token, auth.user);
        market.mark_sold(&session, "l1").await.unwrap();
        assert_eq!(market.listings().await[0].status, ListingStatus::Sold);
        assert_eq!(market.recorded_calls().await, vec!["login", "login", "mark_sold"]);
    }

    #[tokio::test]
    async fn test_mark_sold_is_one_way_and_repeatable() {
        let market = MockMarketplace::with_listings(fixtures::sample_listings());
        market
            .add_account("rahul.kumar@example.com", "secret1", fixtures::mock_user())
            .await;
        let auth = market.login("rahul.kumar@example.com", "secret1").await.unwrap();
        let session = Session::authenticated(auth.token, auth.user);

        market.mark_sold(&session, "l2").await.unwrap();
        market.mark_sold(&session, "l2").await.unwrap();

        let listings = market.listings().await;
        let l2 = listings.iter().find(|l| l.id == "l2").unwrap();
        assert_eq!(l2.status, ListingStatus::Sold);
        assert!(!l2.is_available());

        let err = market.mark_sold(&session, "missing").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicates() {
        let market = MockMarketplace::new();
        market.signup("Riya", "riya@example.com", "secret1").await.unwrap();
        let err = market
            .signup("Riya", "RIYA@example.com", "secret1")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn test_next_error_is_consumed_once() {
        let market = MockMarketplace::new();
        market
            .set_next_error(BackendError::Api {
                status: 500,
                message: "Server exploded".to_string(),
            })
            .await;
        assert!(market.signup("A", "a@example.com", "secret1").await.is_err());
        assert!(market.signup("A", "a@example.com", "secret1").await.is_ok());
    }

    #[tokio::test]
    async fn test_unavailable_reads_are_empty() {
        let market = MockMarketplace::with_listings(fixtures::sample_listings());
        assert_eq!(market.list_listings(&ListingQuery::default()).await.len(), 5);
        market.set_unavailable(true).await;
        assert!(market.list_listings(&ListingQuery::default()).await.is_empty());
    }
}
