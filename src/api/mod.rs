//! Platform REST API
//!
//! One method per backend endpoint on [`ApiClient`]. Every call attaches the
//! session's bearer token and unwraps the response envelope; a 401 from any
//! endpoint expires the session.
//!
//! # Endpoints
//!
//! - auth: `/auth/login`, `/auth/register`, `/auth/profile`, `/auth/change-password`
//! - classes: `/classes`, `/classes/{id}`, `/classes/{id}/students`,
//!   `/classes/join`, `/classes/{id}/regenerate-code`, `/classes/{id}/collaborator`
//! - content: `/content`, `/content/{id}`, `/content/stats`,
//!   `/content/{id}/complete`, `/content/{id}/progress/{apostila,video}`
//! - activities: `/activities`, `/activities/{id}`, `/activities/class/{id}`, `/app/activities`
//! - notes: `/notes`, `/notes/{id}`, `/notes/{id}/autosave`
//! - notifications: `/notifications`, `/notifications/unread-count`,
//!   `/notifications/{id}/read`, `/notifications/read-all`
//! - `/progress`, `/feedback`, `/users`

mod activities;
mod auth;
mod classes;
mod client;
mod content;
pub mod dto;
pub mod error;
mod notes;
mod notifications;
mod progress;

pub use client::{ApiClient, Envelope};
pub use error::{ApiError, ApiResult, ErrorKind};
