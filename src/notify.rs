//! Error Messages & Toasts
//!
//! [`describe`] is the single place where a failed API call is turned into
//! user-facing text; [`ToastCenter`] holds the resulting transient messages.

use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::api::{ApiError, ErrorKind};

/// What the user was doing when a call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Register,
    /// Free-form verb phrase, e.g. `"join the class"`
    Other(&'static str),
}

impl Action {
    fn fallback(&self) -> String {
        match self {
            Action::Login => "Failed to sign in".to_string(),
            Action::Register => "Failed to create account".to_string(),
            Action::Other(what) => format!("Failed to {}", what),
        }
    }
}

/// User-facing messages for `err`, one toast each
pub fn describe(err: &ApiError, action: Action) -> Vec<String> {
    let server = err.server_message().map(str::to_string);

    match err.kind() {
        ErrorKind::Validation => {
            let errors = err.server_errors();
            if errors.is_empty() {
                vec![server.unwrap_or_else(|| "Invalid data".to_string())]
            } else {
                errors.to_vec()
            }
        }
        ErrorKind::Auth => match action {
            Action::Login => vec!["Incorrect email or password".to_string()],
            _ => vec!["Your session has expired. Please sign in again".to_string()],
        },
        ErrorKind::Conflict => match action {
            Action::Register => vec!["Email or username already exists".to_string()],
            _ => vec![server.unwrap_or_else(|| action.fallback())],
        },
        ErrorKind::RateLimited => {
            vec!["Too many attempts. Try again in a few minutes".to_string()]
        }
        ErrorKind::Server => vec!["Server error. Try again later".to_string()],
        ErrorKind::Network => vec!["Connection error. Check your internet connection".to_string()],
        ErrorKind::Unexpected => match err.status() {
            Some(_) => vec![server.unwrap_or_else(|| action.fallback())],
            None => vec!["Unexpected error. Try again".to_string()],
        },
    }
}

/// Visual variant of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    /// How long a toast of this kind stays visible
    pub fn duration(&self) -> Duration {
        match self {
            ToastKind::Success => Duration::from_secs(3),
            ToastKind::Error => Duration::from_secs(5),
            ToastKind::Info => Duration::from_secs(4),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "✓",
            ToastKind::Error => "✕",
            ToastKind::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub message: String,
    pub expires_at: Instant,
}

/// Queue of visible toasts
#[derive(Debug, Default)]
pub struct ToastCenter {
    toasts: Vec<Toast>,
}

impl ToastCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> Uuid {
        self.push_at(kind, message, Instant::now())
    }

    /// Push with an explicit creation time
    pub fn push_at(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            expires_at: now + kind.duration(),
        };
        let id = toast.id;
        self.toasts.push(toast);
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> Uuid {
        self.push(ToastKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> Uuid {
        self.push(ToastKind::Error, message)
    }

    pub fn info(&mut self, message: impl Into<String>) -> Uuid {
        self.push(ToastKind::Info, message)
    }

    /// Push one error toast per message describing `err`
    pub fn api_error(&mut self, err: &ApiError, action: Action) -> Vec<Uuid> {
        tracing::debug!(error = %err, kind = ?err.kind(), "Showing API error");
        describe(err, action)
            .into_iter()
            .map(|message| self.error(message))
            .collect()
    }

    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Drop toasts whose time is up
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    pub fn visible(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, message: Option<&str>, errors: &[&str]) -> ApiError {
        ApiError::Http {
            status,
            message: message.map(str::to_string),
            errors: errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn test_login_wording() {
        assert_eq!(
            describe(&http(401, None, &[]), Action::Login),
            vec!["Incorrect email or password"]
        );
        assert_eq!(
            describe(&http(500, Some("boom"), &[]), Action::Login),
            vec!["Server error. Try again later"]
        );
    }

    #[test]
    fn test_register_conflict() {
        assert_eq!(
            describe(&http(409, Some("dup"), &[]), Action::Register),
            vec!["Email or username already exists"]
        );
        assert_eq!(
            describe(&http(409, Some("Already a member"), &[]), Action::Other("join the class")),
            vec!["Already a member"]
        );
    }

    #[test]
    fn test_validation_lists_every_error() {
        let messages = describe(
            &http(400, Some("Validation failed"), &["Email taken", "Username too short"]),
            Action::Register,
        );
        assert_eq!(messages, vec!["Email taken", "Username too short"]);

        let messages = describe(&http(400, Some("Bad code"), &[]), Action::Other("join"));
        assert_eq!(messages, vec!["Bad code"]);

        let messages = describe(&http(422, None, &[]), Action::Other("join"));
        assert_eq!(messages, vec!["Invalid data"]);
    }

    #[test]
    fn test_other_statuses_fall_back() {
        assert_eq!(
            describe(&http(404, None, &[]), Action::Other("load the class")),
            vec!["Failed to load the class"]
        );
        assert_eq!(
            describe(&ApiError::Timeout, Action::Login),
            vec!["Connection error. Check your internet connection"]
        );
        assert_eq!(
            describe(&ApiError::MissingData, Action::Login),
            vec!["Unexpected error. Try again"]
        );
    }

    #[test]
    fn test_toast_lifetimes() {
        let mut center = ToastCenter::new();
        let t0 = Instant::now();
        center.push_at(ToastKind::Success, "saved", t0);
        center.push_at(ToastKind::Info, "fyi", t0);
        center.push_at(ToastKind::Error, "oops", t0);

        center.prune(t0 + Duration::from_millis(3500));
        let kinds: Vec<_> = center.visible().iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![ToastKind::Info, ToastKind::Error]);

        center.prune(t0 + Duration::from_millis(4500));
        assert_eq!(center.visible().len(), 1);

        center.prune(t0 + Duration::from_secs(5));
        assert!(center.is_empty());
    }

    #[test]
    fn test_api_error_pushes_each_message() {
        let mut center = ToastCenter::new();
        let ids = center.api_error(&http(400, None, &["a", "b"]), Action::Register);
        assert_eq!(ids.len(), 2);
        assert!(center.visible().iter().all(|t| t.kind == ToastKind::Error));
        assert!(center.dismiss(ids[0]));
        assert!(!center.dismiss(ids[0]));
        assert_eq!(center.visible().len(), 1);
    }
}
