//! Field Validation
//!
//! Stateless checks shared by every form, plus [`FormErrors`] which collects
//! per-field messages the way a form renders them.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Characters accepted as "special" by the password checklist
pub const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

pub const USERNAME_MIN: usize = 4;
pub const USERNAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 12;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid username regex"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (USERNAME_MIN..=USERNAME_MAX).contains(&len) && username_regex().is_match(username)
}

/// One line of the live password checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    MinLength,
    MaxLength,
    Lowercase,
    Uppercase,
    Special,
}

impl PasswordRule {
    pub const ALL: [PasswordRule; 5] = [
        PasswordRule::MinLength,
        PasswordRule::MaxLength,
        PasswordRule::Lowercase,
        PasswordRule::Uppercase,
        PasswordRule::Special,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PasswordRule::MinLength => "At least 6 characters",
            PasswordRule::MaxLength => "At most 12 characters",
            PasswordRule::Lowercase => "At least one lowercase letter",
            PasswordRule::Uppercase => "At least one uppercase letter",
            PasswordRule::Special => "At least one special character",
        }
    }

    pub fn check(&self, password: &str) -> bool {
        let len = password.chars().count();
        match self {
            PasswordRule::MinLength => len >= PASSWORD_MIN,
            // An empty password does not tick the upper bound
            PasswordRule::MaxLength => len > 0 && len <= PASSWORD_MAX,
            PasswordRule::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            PasswordRule::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            PasswordRule::Special => password.chars().any(|c| SPECIAL_CHARS.contains(c)),
        }
    }
}

/// Pass/fail state of every rule, in display order
pub fn password_checklist(password: &str) -> Vec<(PasswordRule, bool)> {
    PasswordRule::ALL
        .iter()
        .map(|rule| (*rule, rule.check(password)))
        .collect()
}

pub fn is_strong_password(password: &str) -> bool {
    PasswordRule::ALL.iter().all(|rule| rule.check(password))
}

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Replace runs of whitespace with a single `_`
pub fn normalize_username(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message; the first message per field wins
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    /// Record `message` unless `value` has non-blank content
    pub fn require(&mut self, field: &'static str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.add(field, message);
        }
    }

    /// Record a message when the trimmed length is outside `min..=max`
    pub fn length(&mut self, field: &'static str, value: &str, min: usize, max: usize) {
        let len = value.trim().chars().count();
        if len < min {
            self.add(field, format!("Must be at least {} characters", min));
        } else if len > max {
            self.add(field, format!("Must be at most {} characters", max));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn merge(&mut self, other: FormErrors) {
        for (field, message) in other.fields {
            self.fields.entry(field).or_insert(message);
        }
    }

    /// `Ok(value)` when no error was recorded
    pub fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FormErrors {}
