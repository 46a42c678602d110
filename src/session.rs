use crate::errors::StorageError;
use crate::models::Identity;
use crate::storage::DurableStore;
use tracing::info;

/// Well-known durable key holding the bearer token.
pub const AUTH_TOKEN_KEY: &str = "authToken";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    /// Unknown for a session restored from storage.
    pub identity: Option<Identity>,
}

/// The single session of this client instance.
#[derive(Debug)]
pub struct SessionStore {
    store: DurableStore,
    current: Option<Session>,
}

impl SessionStore {
    /// Trusts a stored token without asking the server; a revoked token only
    /// surfaces as a failed call later on.
    pub fn restore(store: DurableStore) -> Self {
        let current = store
            .get(AUTH_TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .map(|token| Session {
                token: token.to_string(),
                identity: None,
            });
        if current.is_some() {
            info!(path = %store.path().display(), "restored session from storage");
        }
        Self { store, current }
    }

    /// The in-memory session stays active even if persisting the token fails.
    pub async fn establish(
        &mut self,
        token: impl Into<String>,
        identity: Identity,
    ) -> Result<(), StorageError> {
        let token = token.into();
        if token.is_empty() {
            return Ok(());
        }
        self.current = Some(Session {
            token: token.clone(),
            identity: Some(identity),
        });
        self.store.set(AUTH_TOKEN_KEY, token).await
    }

    pub async fn clear(&mut self) -> Result<(), StorageError> {
        self.current = None;
        self.store.remove(AUTH_TOKEN_KEY).await
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|session| session.token.as_str())
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.current.as_ref().and_then(|session| session.identity.as_ref())
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}
