// ABOUTME: Session store — the client's belief about whether the user is authenticated.
// ABOUTME: Keeps the bearer token in memory and mirrors it to durable storage.

use crate::session::storage::TokenStorage;

/// Holds the bearer token and keeps durable storage in sync with memory.
pub struct SessionStore {
    token: Option<String>,
    storage: Box<dyn TokenStorage>,
}

impl SessionStore {
    /// Hydrate from durable storage. Unreadable storage counts as "no token".
    pub fn init(storage: Box<dyn TokenStorage>) -> Self {
        let token = match storage.get() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("session storage unavailable, starting signed out: {}", e);
                None
            }
        };
        if token.is_some() {
            tracing::info!("restored session from storage");
        }
        Self { token, storage }
    }

    /// Store the token durably and in memory. The token is not inspected.
    pub fn login(&mut self, token: impl Into<String>) {
        let token = token.into();
        if let Err(e) = self.storage.set(&token) {
            tracing::warn!("failed to persist session token: {}", e);
        }
        self.token = Some(token);
        tracing::info!("session started");
    }

    /// Clear the token from durable storage and memory.
    pub fn logout(&mut self) {
        if let Err(e) = self.storage.remove() {
            tracing::warn!("failed to clear persisted session token: {}", e);
        }
        self.token = None;
        tracing::info!("session ended");
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Give back the storage, e.g. to simulate a restart.
    pub fn into_storage(self) -> Box<dyn TokenStorage> {
        self.storage
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
