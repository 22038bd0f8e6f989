//! Session Store
//!
//! Holds the signed-in user and the authentication flags, and owns the
//! persisted bearer token. The session is shared through an `Arc` by the API
//! client, the route guard and the CLI; every transition is published as a
//! [`SessionEvent`] so front-ends can react (e.g. navigate to login on
//! expiry).

mod policy;

pub use policy::BootPolicy;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::api::{ApiError, ErrorKind};
use crate::models::{User, UserPatch};
use crate::store::{KeyValueStore, StoreResult, TOKEN_KEY};

const EVENT_CAPACITY: usize = 32;

/// Observable session state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    /// Set once the boot check has run, whatever its outcome
    pub is_initialized: bool,
}

/// Session transitions
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    LoggedIn { user_id: i64 },
    LoggedOut,
    /// The backend rejected the token; the viewer should be sent to `redirect_to`
    Expired { redirect_to: String },
    Initialized { authenticated: bool },
}

/// Source of the current user's profile, used to validate a stored token
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self) -> Result<User, ApiError>;
}

/// Shared authentication context
pub struct Session {
    state: RwLock<SessionState>,
    store: Arc<dyn KeyValueStore>,
    events: broadcast::Sender<SessionEvent>,
    policy: BootPolicy,
    login_path: String,
}

impl Session {
    /// Create a session over `store`
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        policy: BootPolicy,
        login_path: impl Into<String>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: RwLock::new(SessionState::default()),
            store,
            events,
            policy,
            login_path: login_path.into(),
        }
    }

    /// Session with the default policy and login path
    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, BootPolicy::default(), "/login")
    }

    pub fn policy(&self) -> BootPolicy {
        self.policy
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated
    }

    /// Persisted bearer token, if any. Storage failures read as "no token".
    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    /// Persist `token` and mark `user` as signed in
    pub async fn login(&self, user: User, token: &str) -> StoreResult<()> {
        self.store.set(TOKEN_KEY, token)?;

        let user_id = user.id;
        {
            let mut state = self.state.write().await;
            state.user = Some(user);
            state.is_authenticated = true;
            state.is_initialized = true;
        }

        tracing::info!(user_id, "Signed in");
        self.publish(SessionEvent::LoggedIn { user_id });
        Ok(())
    }

    /// Forget the user and delete the persisted token
    pub async fn logout(&self) -> StoreResult<()> {
        self.clear().await;
        self.store.remove(TOKEN_KEY)?;

        tracing::info!("Signed out");
        self.publish(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Forced logout after the backend rejected the token
    pub async fn expire(&self) {
        self.clear().await;
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            tracing::error!(error = %e, "Failed to clear expired token");
        }

        tracing::warn!(redirect_to = %self.login_path, "Session expired");
        self.publish(SessionEvent::Expired {
            redirect_to: self.login_path.clone(),
        });
    }

    /// Merge changed profile fields into the held user.
    /// Returns `false` when there is no user to update.
    pub async fn update_user(&self, patch: &UserPatch) -> bool {
        let mut state = self.state.write().await;
        match state.user.as_mut() {
            Some(user) => {
                patch.apply_to(user);
                tracing::debug!(user_id = user.id, "Profile updated");
                true
            }
            None => false,
        }
    }

    /// Replace the user; authenticated iff a user is present
    pub async fn set_user(&self, user: Option<User>) {
        let mut state = self.state.write().await;
        state.is_authenticated = user.is_some();
        state.user = user;
    }

    /// Boot check: read the persisted token and, under
    /// [`BootPolicy::Validate`], confirm it with `source`.
    ///
    /// `is_initialized` is true afterwards regardless of the outcome. A token
    /// rejected with 401 is cleared; any other failure keeps the token and
    /// falls back to trusting it.
    pub async fn initialize(&self, source: &dyn ProfileSource) -> SessionState {
        let token = self.token();

        let (user, authenticated) = match (token, self.policy) {
            (None, _) => (None, false),
            (Some(_), BootPolicy::TrustToken) => (None, true),
            (Some(_), BootPolicy::Validate) => match source.fetch_profile().await {
                Ok(user) => (Some(user), true),
                Err(e) if e.kind() == ErrorKind::Auth => {
                    tracing::info!("Stored token rejected, clearing");
                    if let Err(e) = self.store.remove(TOKEN_KEY) {
                        tracing::error!(error = %e, "Failed to clear rejected token");
                    }
                    (None, false)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Could not validate stored token, trusting it");
                    (None, true)
                }
            },
        };

        let snapshot = {
            let mut state = self.state.write().await;
            state.user = user;
            state.is_authenticated = authenticated;
            state.is_initialized = true;
            state.clone()
        };

        tracing::debug!(authenticated, policy = %self.policy, "Session initialized");
        self.publish(SessionEvent::Initialized { authenticated });
        snapshot
    }

    async fn clear(&self) {
        let mut state = self.state.write().await;
        state.user = None;
        state.is_authenticated = false;
    }

    fn publish(&self, event: SessionEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }
}
