//! Librarian used when no model credential is configured.

use async_trait::async_trait;
use std::time::Duration;

use super::{Librarian, LibrarianResponse};
use crate::listing::Listing;
use crate::metrics::LIBRARIAN_REQUESTS;

/// Returns the canned offline answer after a fixed latency, simulating a
/// model round trip. [`OfflineLibrarian::instant`] skips the wait.
#[derive(Debug, Clone)]
pub struct OfflineLibrarian {
    latency: Duration,
}

impl OfflineLibrarian {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait]
impl Librarian for OfflineLibrarian {
    fn mode(&self) -> &str {
        "offline"
    }

    async fn ask(&self, _query: &str, _listings: &[Listing]) -> LibrarianResponse {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        LIBRARIAN_REQUESTS.with_label_values(&["offline"]).inc();
        LibrarianResponse::offline()
    }
}
