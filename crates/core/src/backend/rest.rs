//! REST implementation of [`Marketplace`].

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::listing::{Listing, ListingStatus, User};
use crate::metrics::{BACKEND_REQUESTS, BACKEND_REQUEST_DURATION};
use crate::session::Session;

use super::types::{ErrorBody, RawAuthResponse, RawListing, RawUser, UploadResponse};
use super::{
    AuthResponse, BackendError, ImageUpload, ListingDraft, ListingQuery, Marketplace,
    ProfileUpdate,
};

/// Client for the marketplace REST API.
pub struct RestMarketplace {
    client: Client,
    base: Url,
}

impl RestMarketplace {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let base = Url::parse(config.api_url.trim_end_matches('/'))
            .map_err(|e| BackendError::Parse(format!("invalid backend url: {}", e)))?;
        if base.cannot_be_a_base() {
            return Err(BackendError::Parse(format!(
                "invalid backend url: {}",
                config.api_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, base })
    }

    /// Base URL the client talks to.
    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Build `<base>/<segments...>`, escaping each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn bearer<'a>(session: &'a Session, operation: &str) -> Result<&'a str, BackendError> {
        session.bearer().ok_or_else(|| {
            BACKEND_REQUESTS
                .with_label_values(&[operation, "skipped"])
                .inc();
            BackendError::NotAuthenticated
        })
    }

    /// Send a request and record its duration and outcome.
    async fn send(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<Response, BackendError> {
        let started = Instant::now();
        let result = request.send().await;
        BACKEND_REQUEST_DURATION
            .with_label_values(&[operation])
            .observe(started.elapsed().as_secs_f64());

        let outcome = match &result {
            Ok(response) if response.status().is_success() => "success",
            _ => "error",
        };
        BACKEND_REQUESTS
            .with_label_values(&[operation, outcome])
            .inc();

        Ok(result?)
    }

    /// Send a mutation and decode its JSON reply, mapping non-2xx replies
    /// to [`BackendError::Api`].
    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
        default_error: &str,
    ) -> Result<T, BackendError> {
        let response = self.send(operation, request).await?;
        if !response.status().is_success() {
            return Err(api_error(response, default_error).await);
        }
        response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    /// Send a mutation whose reply body is irrelevant.
    async fn send_empty(
        &self,
        operation: &str,
        request: RequestBuilder,
        default_error: &str,
    ) -> Result<(), BackendError> {
        let response = self.send(operation, request).await?;
        if !response.status().is_success() {
            return Err(api_error(response, default_error).await);
        }
        Ok(())
    }

    /// Fetch a listing index. Any failure yields an empty list.
    async fn fetch_listings(&self, operation: &str, request: RequestBuilder) -> Vec<Listing> {
        let response = match self.send(operation, request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(operation, error = %e, "Backend unavailable, returning empty list");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            warn!(
                operation,
                status = response.status().as_u16(),
                "Backend returned an error, returning empty list"
            );
            return Vec::new();
        }

        match response.json::<Value>().await {
            Ok(body) => normalize_listings(body),
            Err(e) => {
                warn!(operation, error = %e, "Unreadable listing response");
                Vec::new()
            }
        }
    }
}

async fn api_error(response: Response, default_error: &str) -> BackendError {
    let status = response.status().as_u16();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| default_error.to_string());
    BackendError::Api { status, message }
}

fn normalize_listing(value: Value) -> Result<Listing, BackendError> {
    let raw: RawListing =
        serde_json::from_value(value).map_err(|e| BackendError::Parse(e.to_string()))?;
    Listing::try_from(raw).map_err(|e| BackendError::Parse(e.to_string()))
}

/// Normalize a JSON array of backend listings, skipping malformed entries.
fn normalize_listings(body: Value) -> Vec<Listing> {
    let Value::Array(items) = body else {
        warn!("Listing response is not an array");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match normalize_listing(item) {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!(error = %e, "Skipping malformed listing");
                None
            }
        })
        .collect()
}

#[async_trait]
impl Marketplace for RestMarketplace {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, BackendError> {
        debug!(email, "Logging in");
        let request = self
            .client
            .post(self.endpoint(&["auth", "login"]))
            .json(&json!({ "email": email, "password": password }));
        let auth: RawAuthResponse = self.send_json("login", request, "Login failed").await?;
        Ok(auth.into())
    }

    async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, BackendError> {
        debug!(email, "Signing up");
        let request = self
            .client
            .post(self.endpoint(&["auth", "signup"]))
            .json(&json!({ "name": name, "email": email, "password": password }));
        let auth: RawAuthResponse = self.send_json("signup", request, "Signup failed").await?;
        Ok(auth.into())
    }

    async fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> Result<User, BackendError> {
        let token = Self::bearer(session, "update_profile")?;
        let request = self
            .client
            .put(self.endpoint(&["auth", "profile"]))
            .bearer_auth(token)
            .json(update);
        let user: RawUser = self
            .send_json("update_profile", request, "Update failed")
            .await?;
        Ok(user.into())
    }

    async fn create_listing(
        &self,
        session: &Session,
        draft: &ListingDraft,
    ) -> Result<Listing, BackendError> {
        let token = Self::bearer(session, "create_listing")?;
        debug!(title = %draft.title, "Creating listing");
        let request = self
            .client
            .post(self.endpoint(&["listings", "new"]))
            .bearer_auth(token)
            .json(draft);
        let body: Value = self
            .send_json("create_listing", request, "Failed to create listing")
            .await?;
        normalize_listing(body)
    }

    async fn list_listings(&self, query: &ListingQuery) -> Vec<Listing> {
        let request = self
            .client
            .get(self.endpoint(&["listings"]))
            .query(&query.to_params());
        self.fetch_listings("list_listings", request).await
    }

    async fn my_listings(&self, session: &Session) -> Vec<Listing> {
        let Ok(token) = Self::bearer(session, "my_listings") else {
            return Vec::new();
        };
        let request = self
            .client
            .get(self.endpoint(&["listings", "mine"]))
            .bearer_auth(token);
        self.fetch_listings("my_listings", request).await
    }

    async fn mark_sold(&self, session: &Session, listing_id: &str) -> Result<(), BackendError> {
        let token = Self::bearer(session, "mark_sold")?;
        debug!(listing_id, "Marking listing sold");
        let request = self
            .client
            .put(self.endpoint(&["listings", listing_id, "status"]))
            .bearer_auth(token)
            .json(&json!({ "status": ListingStatus::Sold.as_str() }));
        self.send_empty("mark_sold", request, "Failed to update listing")
            .await
    }

    async fn delete_listing(
        &self,
        session: &Session,
        listing_id: &str,
    ) -> Result<(), BackendError> {
        let token = Self::bearer(session, "delete_listing")?;
        debug!(listing_id, "Deleting listing");
        let request = self
            .client
            .delete(self.endpoint(&["listings", listing_id]))
            .bearer_auth(token);
        self.send_empty("delete_listing", request, "Failed to delete listing")
            .await
    }

    async fn upload_image(
        &self,
        session: &Session,
        image: ImageUpload,
    ) -> Result<String, BackendError> {
        let token = Self::bearer(session, "upload_image")?;
        debug!(file_name = %image.file_name, bytes = image.bytes.len(), "Uploading image");

        let mut part = Part::bytes(image.bytes).file_name(image.file_name);
        if let Some(content_type) = image.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        let request = self
            .client
            .post(self.endpoint(&["listings", "images"]))
            .bearer_auth(token)
            .multipart(Form::new().part("images", part));

        let uploaded: UploadResponse = self
            .send_json("upload_image", request, "Image upload failed")
            .await?;
        uploaded
            .urls
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::Parse("upload response has no urls".to_string()))
    }
}
