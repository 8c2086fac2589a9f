use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::backend::{AuthResponse, Marketplace, ProfileUpdate};
use crate::listing::User;
use crate::session::{Session, SessionStore};
use crate::validation::{validate_login, validate_profile, validate_signup};

use super::AuthError;

/// Holds the signed-in user and keeps the session store in sync.
///
/// Store failures are logged and otherwise ignored: the in-memory session
/// stays authoritative until the process exits.
pub struct AuthService<M: ?Sized, S: ?Sized> {
    market: Arc<M>,
    store: Arc<S>,
    session: RwLock<Session>,
}

impl<M, S> AuthService<M, S>
where
    M: Marketplace + ?Sized,
    S: SessionStore + ?Sized,
{
    /// Resume whatever session the store holds. An unreadable store starts
    /// logged out.
    pub fn restore(market: Arc<M>, store: Arc<S>) -> Self {
        let session = match store.load() {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable session");
                Session::anonymous()
            }
        };
        if let Some(user) = session.user().filter(|_| session.is_authenticated()) {
            info!(user_id = %user.id, "Restored session");
        }

        Self {
            market,
            store,
            session: RwLock::new(session),
        }
    }

    /// Snapshot of the current session.
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        let session = self.session.read().await;
        if session.is_authenticated() {
            session.user().cloned()
        } else {
            None
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_authenticated()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        validate_login(email, password)?;
        let auth = self.market.login(email.trim(), password).await?;
        Ok(self.establish(auth).await)
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        validate_signup(name, email, password)?;
        let auth = self
            .market
            .signup(name.trim(), email.trim(), password)
            .await?;
        Ok(self.establish(auth).await)
    }

    /// Update contact details; the stored user is replaced by the
    /// backend's copy.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, AuthError> {
        validate_profile(update)?;
        let current = self.session().await;
        if !current.is_authenticated() {
            return Err(AuthError::NotAuthenticated);
        }

        let user = self.market.update_profile(&current, update).await?;

        let mut session = self.session.write().await;
        session.user = Some(user.clone());
        self.persist(&session);
        Ok(user)
    }

    pub async fn logout(&self) {
        let mut session = self.session.write().await;
        *session = Session::anonymous();
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored session");
        }
        info!("Logged out");
    }

    async fn establish(&self, auth: AuthResponse) -> User {
        let user = auth.user.clone();
        info!(user_id = %user.id, "Signed in");

        let mut session = self.session.write().await;
        *session = Session::authenticated(auth.token, auth.user);
        self.persist(&session);
        user
    }

    fn persist(&self, session: &Session) {
        if let Err(e) = self.store.save(session) {
            warn!(error = %e, "Failed to persist session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use crate::session::MemorySessionStore;
    use crate::testing::{fixtures, MockMarketplace};

    async fn service() -> (
        AuthService<MockMarketplace, MemorySessionStore>,
        Arc<MockMarketplace>,
        Arc<MemorySessionStore>,
    ) {
        let market = Arc::new(MockMarketplace::new());
        market
            .add_account("rahul.kumar@example.com", "secret1", fixtures::mock_user())
            .await;
        let store = Arc::new(MemorySessionStore::new());
        let auth = AuthService::restore(Arc::clone(&market), Arc::clone(&store));
        (auth, market, store)
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let (auth, _, store) = service().await;
        assert!(auth.current_user().await.is_none());

        let user = auth
            .login("rahul.kumar@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(user.id, "u1");
        assert!(auth.is_authenticated().await);

        let stored = store.load().unwrap();
        assert_eq!(stored.bearer(), Some("mock-token-u1"));
        assert_eq!(stored.user().map(|u| u.id.as_str()), Some("u1"));
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_backend() {
        let (auth, market, _) = service().await;

        let err = auth.login("", "").await.unwrap_err();
        assert!(matches!(err, AuthError::Invalid(ref e) if e.len() == 2));

        let err = auth.signup("Riya", "riya@example.com", "123").await.unwrap_err();
        assert!(matches!(err, AuthError::Invalid(_)));

        assert!(market.recorded_calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_backend_rejection_is_surfaced() {
        let (auth, _, store) = service().await;
        let err = auth
            .login("rahul.kumar@example.com", "wrong-password")
            .await
            .unwrap_err();
        match err {
            AuthError::Backend(BackendError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid credentials");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!store.load().unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn test_signup_then_update_profile() {
        let (auth, _, store) = service().await;
        auth.signup("Riya", "riya@example.com", "secret1")
            .await
            .unwrap();

        let user = auth
            .update_profile(&ProfileUpdate {
                phone: "9876543210".to_string(),
                address: "FC Road".to_string(),
                city: "Pune".to_string(),
                pincode: "411001".to_string(),
                preferences: "NEET".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.pincode.as_deref(), Some("411001"));
        assert_eq!(auth.session().await.pincode(), Some("411001"));
        assert_eq!(
            store.load().unwrap().user().and_then(|u| u.city.clone()),
            Some("Pune".to_string())
        );
    }

    #[tokio::test]
    async fn test_update_profile_requires_login() {
        let (auth, market, _) = service().await;
        let err = auth
            .update_profile(&ProfileUpdate {
                phone: "9876543210".to_string(),
                ..ProfileUpdate::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotAuthenticated));
        assert!(market.recorded_calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_restore_and_logout() {
        let market = Arc::new(MockMarketplace::new());
        let store = Arc::new(MemorySessionStore::with_session(Session::authenticated(
            "mock-token-u1",
            fixtures::mock_user(),
        )));

        let auth = AuthService::restore(market, Arc::clone(&store));
        assert_eq!(auth.current_user().await.map(|u| u.id), Some("u1".to_string()));

        auth.logout().await;
        assert!(auth.current_user().await.is_none());
        assert!(!store.load().unwrap().is_authenticated());
    }
}
