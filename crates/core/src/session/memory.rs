use std::sync::RwLock;

use super::{Session, SessionError, SessionStore};

/// Session store that forgets everything when dropped.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Session, SessionError> {
        Ok(self
            .session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self
            .session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.save(&Session::anonymous())
    }
}
