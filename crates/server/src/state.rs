use std::sync::Arc;

use bookbridge_core::backend::ListingQuery;
use bookbridge_core::listing::sample_listings;
use bookbridge_core::{
    AuthService, Config, Librarian, Listing, Marketplace, SanitizedConfig, SessionStore,
};

/// Login state shared by all handlers.
pub type Auth = AuthService<dyn Marketplace, dyn SessionStore>;

/// Shared application state
pub struct AppState {
    config: Config,
    market: Arc<dyn Marketplace>,
    librarian: Arc<dyn Librarian>,
    auth: Auth,
}

impl AppState {
    /// Build the state, restoring any session the store holds.
    pub fn new(
        config: Config,
        market: Arc<dyn Marketplace>,
        librarian: Arc<dyn Librarian>,
        session_store: Arc<dyn SessionStore>,
    ) -> Self {
        let auth = AuthService::restore(Arc::clone(&market), session_store);
        Self {
            config,
            market,
            librarian,
            auth,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn market(&self) -> &dyn Marketplace {
        self.market.as_ref()
    }

    pub fn librarian(&self) -> &dyn Librarian {
        self.librarian.as_ref()
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Everything the backend currently lists, or the demo catalogue when
    /// it has nothing.
    pub async fn catalogue(&self) -> Vec<Listing> {
        let listings = self.market.list_listings(&ListingQuery::default()).await;
        if listings.is_empty() {
            sample_listings()
        } else {
            listings
        }
    }
}
