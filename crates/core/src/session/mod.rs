//! Who is signed in, and where that is remembered between runs.
//!
//! A [`Session`] is an explicit value handed to whatever needs identity;
//! nothing reads credentials from global state. A [`SessionStore`] persists
//! it with a simple lifecycle: `load` at start-up, `save` after login or a
//! profile change, `clear` on logout.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::listing::User;

/// Errors from session storage.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Bearer token and last known user record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Session {
    /// A session with no identity.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: impl Into<String>, user: User) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    /// Token for the `Authorization` header, if any.
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer().is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The signed-in user's pincode, used for distance estimates.
    pub fn pincode(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.pincode.as_deref())
    }
}

/// Persistent key-value home for the session.
pub trait SessionStore: Send + Sync {
    /// Read the stored session. Missing data is an anonymous session.
    fn load(&self) -> Result<Session, SessionError>;

    fn save(&self, session: &Session) -> Result<(), SessionError>;

    fn clear(&self) -> Result<(), SessionError>;
}
