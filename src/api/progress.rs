//! Progress, feedback and user administration endpoints

use reqwest::Method;

use super::dto::{FeedbackRequest, ProgressUpdate, UserTypeChange};
use super::{ApiClient, ApiResult};
use crate::models::{Progress, User, UserType};

impl ApiClient {
    /// `GET /progress`
    pub async fn progress(&self) -> ApiResult<Vec<Progress>> {
        self.fetch(Method::GET, "/progress").await
    }

    /// `PUT /progress/{content_id}`
    pub async fn update_progress(
        &self,
        content_id: i64,
        update: &ProgressUpdate,
    ) -> ApiResult<Progress> {
        self.submit(Method::PUT, &format!("/progress/{}", content_id), update)
            .await
    }

    /// `POST /feedback`
    pub async fn send_feedback(&self, feedback: &FeedbackRequest) -> ApiResult<Option<String>> {
        self.command_with(Method::POST, "/feedback", feedback).await
    }

    /// `GET /users` (administrators only)
    pub async fn users(&self) -> ApiResult<Vec<User>> {
        self.fetch(Method::GET, "/users").await
    }

    /// `DELETE /users/{id}`
    pub async fn delete_user(&self, id: i64) -> ApiResult<Option<String>> {
        self.command(Method::DELETE, &format!("/users/{}", id))
            .await
    }

    /// `PATCH /users/{id}/type`
    pub async fn change_user_type(
        &self,
        id: i64,
        user_type: UserType,
    ) -> ApiResult<Option<String>> {
        self.command_with(
            Method::PATCH,
            &format!("/users/{}/type", id),
            &UserTypeChange { user_type },
        )
        .await
    }
}
