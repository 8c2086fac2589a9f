//! Login state for the storefront.
//!
//! [`AuthService`] owns the current [`Session`](crate::session::Session),
//! validates credentials before they reach the backend and persists the
//! result through a [`SessionStore`](crate::session::SessionStore).

mod service;

pub use service::AuthService;

use thiserror::Error;

use crate::backend::BackendError;
use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Form input rejected before any request was made.
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error(transparent)]
    Backend(BackendError),
}

impl From<BackendError> for AuthError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotAuthenticated => AuthError::NotAuthenticated,
            other => AuthError::Backend(other),
        }
    }
}
