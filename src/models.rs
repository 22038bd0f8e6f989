//! Platform Records
//!
//! Plain records mirrored from backend responses. The client holds no
//! authoritative state; these only need to match the JSON the server sends.
//! Enumerations carry an `Other` variant so a new server-side value never
//! breaks deserialization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a platform account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    #[serde(rename = "aluno")]
    Student,
    #[serde(rename = "professor")]
    Professor,
    #[serde(rename = "admin")]
    Admin,
    #[serde(other)]
    Other,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Student => "aluno",
            UserType::Professor => "professor",
            UserType::Admin => "admin",
            UserType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserType::Student => "Student",
            UserType::Professor => "Professor",
            UserType::Admin => "Administrator",
            UserType::Other => "User",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aluno" | "student" => Ok(UserType::Student),
            "professor" => Ok(UserType::Professor),
            "admin" => Ok(UserType::Admin),
            other => Err(format!("Unknown user type: {}", other)),
        }
    }
}

/// Signed-in account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl User {
    pub fn is_professor(&self) -> bool {
        self.user_type == UserType::Professor
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }
}

/// Partial profile update merged into the held [`User`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
}

impl UserPatch {
    /// Apply the set fields onto `user`
    pub fn apply_to(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(user_type) = self.user_type {
            user.user_type = user_type;
        }
        if let Some(age) = self.age {
            user.age = Some(age);
        }
        if let Some(institution) = &self.institution {
            user.institution = Some(institution.clone());
        }
    }
}

impl From<User> for UserPatch {
    fn from(user: User) -> Self {
        Self {
            username: Some(user.username),
            email: Some(user.email),
            user_type: Some(user.user_type),
            age: user.age,
            institution: user.institution,
        }
    }
}

/// Bearer credentials issued on login/register
#[derive(Debug, Clone, Deserialize)]
pub struct Tokens {
    pub token: String,
}

/// `data` of a login or register response
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub tokens: Tokens,
}

/// `data` of a profile update response
#[derive(Debug, Clone, Deserialize)]
pub struct ProfilePayload {
    pub user: User,
}

/// A class (turma)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub code: String,
    pub professor_id: i64,
    #[serde(default)]
    pub professor_name: Option<String>,
    #[serde(default)]
    pub collaborator_id: Option<i64>,
    #[serde(default)]
    pub collaborator_name: Option<String>,
    #[serde(default)]
    pub max_students: Option<u32>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Class {
    /// Display name of the owning professor
    pub fn professor_display(&self) -> String {
        self.professor_name
            .clone()
            .unwrap_or_else(|| format!("Prof. {}", self.professor_id))
    }

    /// Display name of the collaborating professor, if any
    pub fn collaborator_display(&self) -> Option<String> {
        self.collaborator_name
            .clone()
            .or_else(|| self.collaborator_id.map(|id| format!("Prof. {}", id)))
    }

    /// Whether `user` owns this class
    pub fn is_owned_by(&self, user: &User) -> bool {
        user.is_professor() && self.professor_id == user.id
    }

    /// Whether `user` collaborates on this class
    pub fn is_collaborator(&self, user: &User) -> bool {
        user.is_professor() && self.collaborator_id == Some(user.id)
    }
}

/// Member of a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Kind of learning content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Video,
    Document,
    Apostila,
    Link,
    Activity,
    #[serde(other)]
    Other,
}

impl ContentKind {
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Video => "Video",
            ContentKind::Document => "Document",
            ContentKind::Apostila => "Handout",
            ContentKind::Link => "Link",
            ContentKind::Activity => "Activity",
            ContentKind::Other => "Content",
        }
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "video" => Ok(ContentKind::Video),
            "document" => Ok(ContentKind::Document),
            "apostila" | "handout" => Ok(ContentKind::Apostila),
            "link" => Ok(ContentKind::Link),
            "activity" => Ok(ContentKind::Activity),
            other => Err(format!("Unknown content type: {}", other)),
        }
    }
}

/// A piece of learning content attached to a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub progress_percentage: Option<f64>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Completed/total pair for one content kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KindProgress {
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub total: u32,
}

/// `GET /content/stats` payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentStats {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub pending: u32,
    #[serde(default)]
    pub progress_percentage: f64,
    #[serde(default)]
    pub apostila: Option<KindProgress>,
    #[serde(default)]
    pub video: Option<KindProgress>,
    #[serde(default)]
    pub link: Option<KindProgress>,
}

/// Kind of class activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Quiz,
    /// Poll: questions carry no correct answer
    Enquete,
    Questionario,
    Assignment,
    Discussion,
    #[serde(other)]
    Other,
}

impl ActivityKind {
    /// Whether questions of this kind are graded against a correct answer
    pub fn is_graded(&self) -> bool {
        !matches!(self, ActivityKind::Enquete)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::Quiz => "Quiz",
            ActivityKind::Enquete => "Poll",
            ActivityKind::Questionario => "Questionnaire",
            ActivityKind::Assignment => "Assignment",
            ActivityKind::Discussion => "Discussion",
            ActivityKind::Other => "Activity",
        }
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quiz" => Ok(ActivityKind::Quiz),
            "enquete" | "poll" => Ok(ActivityKind::Enquete),
            "questionario" | "questionnaire" => Ok(ActivityKind::Questionario),
            "assignment" => Ok(ActivityKind::Assignment),
            "discussion" => Ok(ActivityKind::Discussion),
            other => Err(format!("Unknown activity type: {}", other)),
        }
    }
}

/// Answer option of a multiple-choice question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerOption {
    A,
    B,
    C,
    D,
}

/// Multiple-choice question of an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<AnswerOption>,
}

impl Question {
    /// Blank question; graded kinds default the answer to `a`
    pub fn blank(kind: ActivityKind) -> Self {
        Self {
            question_text: String::new(),
            option_a: String::new(),
            option_b: String::new(),
            option_c: String::new(),
            option_d: String::new(),
            correct_answer: kind.is_graded().then_some(AnswerOption::A),
        }
    }
}

/// A class activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    #[serde(default)]
    pub due_date: Option<String>,
    /// Time limit in seconds
    #[serde(default)]
    pub time_limit: Option<u32>,
    #[serde(default)]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// What a note is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    General,
    Apostila,
    Video,
    Activity,
    #[serde(other)]
    Other,
}

impl Default for NoteKind {
    fn default() -> Self {
        NoteKind::General
    }
}

impl NoteKind {
    pub fn label(&self) -> &'static str {
        match self {
            NoteKind::General => "General",
            NoteKind::Apostila => "Handout",
            NoteKind::Video => "Video",
            NoteKind::Activity => "Activity",
            NoteKind::Other => "Note",
        }
    }
}

impl std::str::FromStr for NoteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(NoteKind::General),
            "apostila" | "handout" => Ok(NoteKind::Apostila),
            "video" => Ok(NoteKind::Video),
            "activity" => Ok(NoteKind::Activity),
            other => Err(format!("Unknown note type: {}", other)),
        }
    }
}

/// A personal study note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub content_type: NoteKind,
    #[serde(default)]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub content_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub word_count: Option<u32>,
    #[serde(default)]
    pub last_saved: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
    #[serde(other)]
    Other,
}

/// An in-app notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub level: NotificationLevel,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub created_at: String,
}

/// `GET /notifications/unread-count` payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct UnreadCount {
    pub count: u32,
}

/// Per-content completion record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub id: i64,
    pub user_id: i64,
    pub content_id: i64,
    pub completed: bool,
    pub progress_percentage: f64,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}
