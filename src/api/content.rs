//! Content endpoints

use reqwest::Method;

use super::dto::{ContentInput, DocumentProgress, VideoProgress};
use super::{ApiClient, ApiResult};
use crate::models::{Content, ContentStats};

impl ApiClient {
    /// `GET /content`, optionally restricted to one class
    pub async fn contents(&self, class_id: Option<i64>) -> ApiResult<Vec<Content>> {
        let path = match class_id {
            Some(id) => format!("/content?class_id={}", id),
            None => "/content".to_string(),
        };
        self.fetch(Method::GET, &path).await
    }

    /// `GET /content/{id}`
    pub async fn content(&self, id: i64) -> ApiResult<Content> {
        self.fetch(Method::GET, &format!("/content/{}", id)).await
    }

    /// `GET /content/stats`
    pub async fn content_stats(&self) -> ApiResult<ContentStats> {
        self.fetch(Method::GET, "/content/stats").await
    }

    /// `POST /content`
    pub async fn create_content(&self, input: &ContentInput) -> ApiResult<Content> {
        self.submit(Method::POST, "/content", input).await
    }

    /// `PUT /content/{id}`
    pub async fn update_content(&self, id: i64, input: &ContentInput) -> ApiResult<Content> {
        self.submit(Method::PUT, &format!("/content/{}", id), input)
            .await
    }

    /// `DELETE /content/{id}`
    pub async fn delete_content(&self, id: i64) -> ApiResult<Option<String>> {
        self.command(Method::DELETE, &format!("/content/{}", id))
            .await
    }

    /// `POST /content/{id}/complete`
    pub async fn complete_content(&self, id: i64) -> ApiResult<Option<String>> {
        self.command(Method::POST, &format!("/content/{}/complete", id))
            .await
    }

    /// `POST /content/{id}/progress/apostila`
    pub async fn record_document_progress(
        &self,
        id: i64,
        page: u32,
        total_pages: u32,
    ) -> ApiResult<Option<String>> {
        let body = DocumentProgress { page, total_pages };
        self.command_with(Method::POST, &format!("/content/{}/progress/apostila", id), &body)
            .await
    }

    /// `POST /content/{id}/progress/video`
    pub async fn record_video_progress(&self, id: i64, progress: f64) -> ApiResult<Option<String>> {
        let body = VideoProgress {
            progress: progress.clamp(0.0, 100.0),
        };
        self.command_with(Method::POST, &format!("/content/{}/progress/video", id), &body)
            .await
    }
}
