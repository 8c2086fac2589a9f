//! Form validation run before anything is sent to the backend.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::backend::{ListingDraft, ProfileUpdate};

/// Most photos a single listing may carry.
pub const MAX_IMAGES: usize = 5;

/// Shortest accepted listing description, in characters.
pub const MIN_DESCRIPTION_CHARS: usize = 20;

/// Shortest accepted password.
pub const MIN_PASSWORD_CHARS: usize = 6;

static PINCODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}$").unwrap());
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}$").unwrap());

/// Whether `value` is a six-digit Indian postal code.
pub fn is_valid_pincode(value: &str) -> bool {
    PINCODE.is_match(value)
}

/// Field name to message. Submission is blocked while non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{}", describe(.fields))]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

fn describe(fields: &BTreeMap<&'static str, String>) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`, replacing any earlier one.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `Ok` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check the sell-a-book form.
pub fn validate_listing_draft(draft: &ListingDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if blank(&draft.title) {
        errors.add("title", "Book title is required");
    }
    if blank(&draft.author) {
        errors.add("author", "Author name is required");
    }
    if !(draft.price.is_finite() && draft.price > 0.0) {
        errors.add("price", "Enter a valid price");
    }
    if blank(&draft.description) {
        errors.add("description", "Please provide a description");
    }
    if draft.description.chars().count() < MIN_DESCRIPTION_CHARS {
        errors.add(
            "description",
            format!(
                "Description should be at least {} characters",
                MIN_DESCRIPTION_CHARS
            ),
        );
    }
    if !is_valid_pincode(&draft.pincode) {
        errors.add("pincode", "Enter a valid 6-digit pincode");
    }
    if blank(&draft.city) {
        errors.add("city", "City is required");
    }
    if blank(&draft.address) {
        errors.add("address", "Pickup address is required");
    }
    if draft.images.is_empty() {
        errors.add("images", "Upload at least one photo");
    } else if draft.images.len() > MAX_IMAGES {
        errors.add(
            "images",
            format!("You can only upload up to {} images", MAX_IMAGES),
        );
    }

    errors.into_result()
}

/// Check that adding `incoming` photos to `existing` stays within the limit.
pub fn validate_image_batch(existing: usize, incoming: usize) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if incoming == 0 {
        errors.add("images", "Upload at least one photo");
    } else if existing + incoming > MAX_IMAGES {
        errors.add(
            "images",
            format!("You can only upload up to {} images", MAX_IMAGES),
        );
    }
    errors.into_result()
}

pub fn validate_signup(name: &str, email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if blank(name) {
        errors.add("name", "Name is required");
    }
    if blank(email) {
        errors.add("email", "Email is required");
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        errors.add(
            "password",
            format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_CHARS
            ),
        );
    }
    errors.into_result()
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if blank(email) {
        errors.add("email", "Email is required");
    }
    if password.is_empty() {
        errors.add("password", "Password is required");
    }
    errors.into_result()
}

/// Check the profile form. Pincode may be left empty.
pub fn validate_profile(update: &ProfileUpdate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if !PHONE.is_match(&update.phone) {
        errors.add("phone", "Phone number must be 10 digits");
    }
    if !update.pincode.is_empty() && !is_valid_pincode(&update.pincode) {
        errors.add("pincode", "Enter a valid 6-digit pincode");
    }
    errors.into_result()
}
