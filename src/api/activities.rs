//! Activity endpoints

use reqwest::Method;

use super::dto::ActivityInput;
use super::{ApiClient, ApiResult};
use crate::models::Activity;

impl ApiClient {
    /// `GET /activities`, optionally restricted to one class
    pub async fn activities(&self, class_id: Option<i64>) -> ApiResult<Vec<Activity>> {
        let path = match class_id {
            Some(id) => format!("/activities?class_id={}", id),
            None => "/activities".to_string(),
        };
        self.fetch(Method::GET, &path).await
    }

    /// `GET /activities/class/{id}`
    pub async fn class_activities(&self, class_id: i64) -> ApiResult<Vec<Activity>> {
        self.fetch(Method::GET, &format!("/activities/class/{}", class_id))
            .await
    }

    /// `GET /app/activities`: the signed-in student's activities
    pub async fn student_activities(&self) -> ApiResult<Vec<Activity>> {
        self.fetch(Method::GET, "/app/activities").await
    }

    /// `GET /activities/{id}`
    pub async fn activity(&self, id: i64) -> ApiResult<Activity> {
        self.fetch(Method::GET, &format!("/activities/{}", id))
            .await
    }

    /// `POST /activities`
    pub async fn create_activity(&self, input: &ActivityInput) -> ApiResult<Activity> {
        self.submit(Method::POST, "/activities", input).await
    }

    /// `PUT /activities/{id}`
    pub async fn update_activity(&self, id: i64, input: &ActivityInput) -> ApiResult<Activity> {
        self.submit(Method::PUT, &format!("/activities/{}", id), input)
            .await
    }

    /// `DELETE /activities/{id}`
    pub async fn delete_activity(&self, id: i64) -> ApiResult<Option<String>> {
        self.command(Method::DELETE, &format!("/activities/{}", id))
            .await
    }
}
