//! Note endpoints

use async_trait::async_trait;
use reqwest::Method;

use super::dto::{AutosaveRequest, NoteInput, NoteQuery};
use super::{ApiClient, ApiResult};
use crate::autosave::NoteWriter;
use crate::models::Note;

impl ApiClient {
    /// `GET /notes` with optional class/content filters
    pub async fn notes(&self, query: NoteQuery) -> ApiResult<Vec<Note>> {
        self.fetch(Method::GET, &format!("/notes{}", query.to_query_string()))
            .await
    }

    /// `GET /notes/{id}`
    pub async fn note(&self, id: i64) -> ApiResult<Note> {
        self.fetch(Method::GET, &format!("/notes/{}", id)).await
    }

    /// `POST /notes`
    pub async fn create_note(&self, input: &NoteInput) -> ApiResult<Note> {
        self.submit(Method::POST, "/notes", input).await
    }

    /// `PUT /notes/{id}`
    pub async fn update_note(&self, id: i64, input: &NoteInput) -> ApiResult<Note> {
        self.submit(Method::PUT, &format!("/notes/{}", id), input)
            .await
    }

    /// `DELETE /notes/{id}`
    pub async fn delete_note(&self, id: i64) -> ApiResult<Option<String>> {
        self.command(Method::DELETE, &format!("/notes/{}", id))
            .await
    }

    /// `PUT /notes/{id}/autosave`
    pub async fn autosave_note(&self, id: i64, content: &str) -> ApiResult<Option<String>> {
        self.command_with(
            Method::PUT,
            &format!("/notes/{}/autosave", id),
            &AutosaveRequest { content },
        )
        .await
    }
}

#[async_trait]
impl NoteWriter for ApiClient {
    async fn save(&self, note_id: i64, content: &str) -> ApiResult<()> {
        self.autosave_note(note_id, content).await.map(|_| ())
    }
}
