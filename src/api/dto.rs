//! Data Transfer Objects
//!
//! Request bodies sent to the platform API and the small response payloads
//! that have no counterpart in [`crate::models`].

use serde::{Deserialize, Serialize};

use crate::models::{ActivityKind, ContentKind, NoteKind, Question, UserType};

// ============================================
// AUTH DTOs
// ============================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub user_type: UserType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    pub privacy_policy_accepted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

// ============================================
// CLASS DTOs
// ============================================

/// Body of class create/update
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassInput {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_students: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinClassRequest {
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddCollaboratorRequest {
    pub collaborator_email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveCollaboratorRequest {
    pub collaborator_id: i64,
}

/// `data` of a regenerate-code response
#[derive(Debug, Clone, Deserialize)]
pub struct ClassCode {
    pub code: String,
}

// ============================================
// CONTENT DTOs
// ============================================

/// Body of content create/update
#[derive(Debug, Clone, Serialize)]
pub struct ContentInput {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<i64>,
}

/// Reading position in a handout
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DocumentProgress {
    pub page: u32,
    pub total_pages: u32,
}

/// Watched share of a video, 0-100
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VideoProgress {
    pub progress: f64,
}

// ============================================
// ACTIVITY DTOs
// ============================================

/// Body of activity create/update
#[derive(Debug, Clone, Serialize)]
pub struct ActivityInput {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
}

// ============================================
// NOTE DTOs
// ============================================

/// Body of note create/update
#[derive(Debug, Clone, Serialize)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
    pub content_type: NoteKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AutosaveRequest<'a> {
    pub content: &'a str,
}

/// Optional filters of the note listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteQuery {
    pub class_id: Option<i64>,
    pub content_id: Option<i64>,
}

impl NoteQuery {
    /// Render as a query string, empty when no filter is set
    pub fn to_query_string(&self) -> String {
        let mut params = Vec::new();
        if let Some(id) = self.class_id {
            params.push(format!("class_id={}", id));
        }
        if let Some(id) = self.content_id {
            params.push(format!("content_id={}", id));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

// ============================================
// PROGRESS / FEEDBACK / USER DTOs
// ============================================

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProgressUpdate {
    pub completed: bool,
    pub progress_percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UserTypeChange {
    pub user_type: UserType,
}
