//! Notification endpoints

use reqwest::Method;

use super::{ApiClient, ApiResult};
use crate::models::{Notification, UnreadCount};

impl ApiClient {
    /// `GET /notifications`
    pub async fn notifications(&self) -> ApiResult<Vec<Notification>> {
        self.fetch(Method::GET, "/notifications").await
    }

    /// `GET /notifications/unread-count`
    pub async fn unread_count(&self) -> ApiResult<u32> {
        let unread: UnreadCount = self
            .fetch(Method::GET, "/notifications/unread-count")
            .await?;
        Ok(unread.count)
    }

    /// `PUT /notifications/{id}/read`
    pub async fn mark_notification_read(&self, id: i64) -> ApiResult<Option<String>> {
        self.command(Method::PUT, &format!("/notifications/{}/read", id))
            .await
    }

    /// `PUT /notifications/read-all`
    pub async fn mark_all_notifications_read(&self) -> ApiResult<Option<String>> {
        self.command(Method::PUT, "/notifications/read-all").await
    }

    /// `DELETE /notifications/{id}`
    pub async fn delete_notification(&self, id: i64) -> ApiResult<Option<String>> {
        self.command(Method::DELETE, &format!("/notifications/{}", id))
            .await
    }
}
