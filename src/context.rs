//! Application Context
//!
//! Wires the persisted store, the session, the API client and the
//! background helpers from a [`Config`].

use std::sync::Arc;
use std::time::Duration;

use crate::api::{ApiClient, ApiResult};
use crate::autosave::AutosaveScheduler;
use crate::config::Config;
use crate::guard::RouteGuard;
use crate::poller::UnreadPoller;
use crate::session::{Session, SessionState};
use crate::store::{FileStore, KeyValueStore};

/// Everything a front-end needs, shared behind `Arc`s
pub struct AppContext {
    pub config: Config,
    pub session: Arc<Session>,
    pub api: Arc<ApiClient>,
    pub guard: RouteGuard,
    pub autosave: AutosaveScheduler,
    pub unread: Arc<UnreadPoller>,
}

impl AppContext {
    /// Build the context over the on-disk token store
    pub fn bootstrap(config: Config) -> ApiResult<Self> {
        let path = config.session.store_path();
        tracing::debug!(path = %path.display(), "Opening session store");
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(path)?);
        Self::with_store(config, store)
    }

    /// Build the context over any store
    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> ApiResult<Self> {
        let session = Arc::new(Session::new(
            store,
            config.session.boot_policy,
            config.session.login_path.clone(),
        ));
        let api = Arc::new(ApiClient::new(&config.api, session.clone())?);
        let guard = RouteGuard::new(
            config.session.login_path.clone(),
            config.session.default_path.clone(),
        );
        let autosave = AutosaveScheduler::new(
            api.clone(),
            Duration::from_millis(config.autosave.delay_ms),
        );
        let unread = Arc::new(UnreadPoller::new(
            api.clone(),
            session.clone(),
            Duration::from_secs(config.notifications.poll_interval_secs),
        ));

        Ok(Self {
            config,
            session,
            api,
            guard,
            autosave,
            unread,
        })
    }

    /// Run the boot check against the profile endpoint
    pub async fn initialize(&self) -> SessionState {
        self.session.initialize(self.api.as_ref()).await
    }

    /// Flush pending note edits
    pub async fn shutdown(&self) {
        self.autosave.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::BootPolicy;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_wires_config() {
        let mut config = Config::default();
        config.api.base_url = "http://127.0.0.1:9/api/".into();
        config.session.boot_policy = BootPolicy::TrustToken;
        config.session.default_path = "/dashboard".into();
        config.autosave.delay_ms = 750;

        let ctx = AppContext::with_store(config, Arc::new(MemoryStore::with_token("t"))).unwrap();
        assert_eq!(ctx.api.base_url(), "http://127.0.0.1:9/api");
        assert_eq!(ctx.guard.default_path(), "/dashboard");
        assert_eq!(ctx.autosave.delay(), Duration::from_millis(750));

        let state = ctx.initialize().await;
        assert!(state.is_authenticated);
        assert!(state.user.is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_uses_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.session.data_dir = dir.path().to_string_lossy().to_string();

        let ctx = AppContext::bootstrap(config).unwrap();
        assert!(ctx.session.token().is_none());
        let state = ctx.initialize().await;
        assert!(!state.is_authenticated);
        assert!(state.is_initialized);
    }
}
