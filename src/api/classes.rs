//! Class endpoints

use reqwest::Method;

use super::dto::{
    AddCollaboratorRequest, ClassCode, ClassInput, JoinClassRequest, RemoveCollaboratorRequest,
};
use super::{ApiClient, ApiResult};
use crate::models::{Class, Student};

impl ApiClient {
    /// `GET /classes`
    pub async fn classes(&self) -> ApiResult<Vec<Class>> {
        self.fetch(Method::GET, "/classes").await
    }

    /// `GET /classes/{id}`
    pub async fn class(&self, id: i64) -> ApiResult<Class> {
        self.fetch(Method::GET, &format!("/classes/{}", id)).await
    }

    /// `GET /classes/{id}/students`
    pub async fn class_students(&self, id: i64) -> ApiResult<Vec<Student>> {
        self.fetch(Method::GET, &format!("/classes/{}/students", id))
            .await
    }

    /// `POST /classes`
    pub async fn create_class(&self, input: &ClassInput) -> ApiResult<Class> {
        self.submit(Method::POST, "/classes", input).await
    }

    /// `PUT /classes/{id}`
    pub async fn update_class(&self, id: i64, input: &ClassInput) -> ApiResult<Class> {
        self.submit(Method::PUT, &format!("/classes/{}", id), input)
            .await
    }

    /// `DELETE /classes/{id}`
    pub async fn delete_class(&self, id: i64) -> ApiResult<Option<String>> {
        self.command(Method::DELETE, &format!("/classes/{}", id))
            .await
    }

    /// `POST /classes/join`
    pub async fn join_class(&self, code: &str) -> ApiResult<Option<String>> {
        let body = JoinClassRequest {
            code: code.trim().to_string(),
        };
        self.command_with(Method::POST, "/classes/join", &body)
            .await
    }

    /// `POST /classes/{id}/regenerate-code`
    pub async fn regenerate_class_code(&self, id: i64) -> ApiResult<String> {
        let code: ClassCode = self
            .fetch(Method::POST, &format!("/classes/{}/regenerate-code", id))
            .await?;
        Ok(code.code)
    }

    /// `POST /classes/{id}/collaborator`
    pub async fn add_collaborator(&self, id: i64, email: &str) -> ApiResult<Option<String>> {
        let body = AddCollaboratorRequest {
            collaborator_email: email.trim().to_string(),
        };
        self.command_with(Method::POST, &format!("/classes/{}/collaborator", id), &body)
            .await
    }

    /// `DELETE /classes/{id}/collaborator`
    pub async fn remove_collaborator(
        &self,
        id: i64,
        collaborator_id: i64,
    ) -> ApiResult<Option<String>> {
        let body = RemoveCollaboratorRequest { collaborator_id };
        self.command_with(Method::DELETE, &format!("/classes/{}/collaborator", id), &body)
            .await
    }
}
