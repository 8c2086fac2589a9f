pub mod auth;
pub mod backend;
pub mod chat;
pub mod config;
pub mod librarian;
pub mod listing;
pub mod metrics;
pub mod session;
pub mod testing;
pub mod validation;

pub use auth::{AuthError, AuthService};
pub use backend::{BackendError, Marketplace, RestMarketplace};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use librarian::{create_librarian, Librarian, LibrarianResponse};
pub use listing::{apply_filter, Listing, ListingFilter, SortMode};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
pub use validation::ValidationErrors;
