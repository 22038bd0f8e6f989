//! Unread Notification Poller
//!
//! Refreshes the unread-notification badge on a fixed interval while the
//! session is authenticated and publishes it on a watch channel.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::api::{ApiClient, ApiResult};
use crate::session::{Session, SessionEvent};

/// Source of the unread count
#[async_trait]
pub trait UnreadSource: Send + Sync {
    async fn fetch_unread(&self) -> ApiResult<u32>;
}

#[async_trait]
impl UnreadSource for ApiClient {
    async fn fetch_unread(&self) -> ApiResult<u32> {
        self.unread_count().await
    }
}

pub struct UnreadPoller {
    source: Arc<dyn UnreadSource>,
    session: Arc<Session>,
    interval: Duration,
    count: watch::Sender<u32>,
}

impl UnreadPoller {
    pub fn new(source: Arc<dyn UnreadSource>, session: Arc<Session>, interval: Duration) -> Self {
        let (count, _) = watch::channel(0);
        Self {
            source,
            session,
            interval,
            count,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.count.subscribe()
    }

    pub fn current(&self) -> u32 {
        *self.count.borrow()
    }

    /// Local adjustment after marking notifications read
    pub fn set_count(&self, value: u32) {
        self.count.send_replace(value);
    }

    /// Poll once. Skipped while signed out; on error the last value is kept.
    pub async fn refresh(&self) {
        if !self.session.is_authenticated().await {
            return;
        }
        match self.source.fetch_unread().await {
            Ok(n) => {
                self.count.send_if_modified(|current| {
                    let changed = *current != n;
                    *current = n;
                    changed
                });
            }
            Err(e) => tracing::warn!(error = %e, "Failed to refresh unread count"),
        }
    }

    /// Poll immediately and then every interval until the task is aborted.
    /// Signing out resets the count to zero.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        tracing::debug!(interval_secs = self.interval.as_secs(), "Starting unread poller");

        let mut events = self.session.subscribe();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => self.refresh().await,
                    event = events.recv() => match event {
                        Ok(SessionEvent::LoggedOut) | Ok(SessionEvent::Expired { .. }) => {
                            self.set_count(0);
                        }
                        Ok(SessionEvent::LoggedIn { .. }) => self.refresh().await,
                        Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::{User, UserType};
    use crate::store::MemoryStore;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Counter {
        calls: AtomicU32,
        fail_after: u32,
    }

    #[async_trait]
    impl UnreadSource for Counter {
        async fn fetch_unread(&self) -> ApiResult<u32> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n > self.fail_after {
                return Err(ApiError::Timeout);
            }
            Ok(n * 10)
        }
    }

    async fn signed_in() -> Arc<Session> {
        let session = Arc::new(Session::with_store(Arc::new(MemoryStore::new())));
        let user = User {
            id: 1,
            username: "ana".into(),
            email: "ana@x.io".into(),
            user_type: UserType::Student,
            age: None,
            institution: None,
            created_at: None,
        };
        session.login(user, "tok").await.unwrap();
        session
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_on_interval() {
        let source = Arc::new(Counter {
            calls: AtomicU32::new(0),
            fail_after: u32::MAX,
        });
        let session = signed_in().await;
        let poller = Arc::new(UnreadPoller::new(source.clone(), session, Duration::from_secs(30)));
        let rx = poller.subscribe();

        let handle = poller.clone().start();
        tokio::time::sleep(Duration::from_secs(65)).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(*rx.borrow(), 30);
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_keeps_last_value() {
        let source = Arc::new(Counter {
            calls: AtomicU32::new(0),
            fail_after: 1,
        });
        let session = signed_in().await;
        let poller = UnreadPoller::new(source, session, Duration::from_secs(30));

        poller.refresh().await;
        assert_eq!(poller.current(), 10);
        poller.refresh().await;
        assert_eq!(poller.current(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_resets_and_stops_polling() {
        let source = Arc::new(Counter {
            calls: AtomicU32::new(0),
            fail_after: u32::MAX,
        });
        let session = signed_in().await;
        let poller = Arc::new(UnreadPoller::new(
            source.clone(),
            session.clone(),
            Duration::from_secs(30),
        ));

        let handle = poller.clone().start();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(poller.current(), 10);

        session.logout().await.unwrap();
        tokio::time::sleep(Duration::from_secs(100)).await;

        assert_eq!(poller.current(), 0);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        handle.abort();
    }
}
