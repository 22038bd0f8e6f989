//! # Dino
//!
//! Client core for the Dino learning platform: classes, study content,
//! activities, notes, notifications and progress, all served by a REST
//! backend that wraps every response in a `{success, data, message, errors}`
//! envelope.
//!
//! ## Features
//!
//! - **Session management**: persisted bearer token, boot-time validation,
//!   forced logout on 401
//! - **Typed API client**: one method per endpoint over `reqwest`
//! - **Route guarding**: render, loading or redirect decisions with
//!   `returnUrl` round-trips
//! - **Forms**: validation for login, registration, classes, activities,
//!   notes and settings
//! - **Autosave**: debounced note saves with one in-flight write per note
//!
//! ## Modules
//!
//! - [`session`]: Authentication context and boot check
//! - [`api`]: REST client and error classification
//! - [`guard`]: Route access rules
//! - [`autosave`]: Debounced note persistence
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dino::{AppContext, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ctx = AppContext::bootstrap(Config::load_default())?;
//!
//!     // Validate the stored token, if any
//!     let state = ctx.initialize().await;
//!     if !state.is_authenticated {
//!         ctx.api.sign_in("ana@escola.br", "Rex#2024").await?;
//!     }
//!
//!     for class in ctx.api.classes().await? {
//!         println!("{} [{}] by {}", class.name, class.code, class.professor_display());
//!     }
//!
//!     ctx.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod autosave;
pub mod config;
pub mod context;
pub mod filter;
pub mod format;
pub mod forms;
pub mod guard;
pub mod logging;
pub mod models;
pub mod navigation;
pub mod notify;
pub mod poller;
pub mod registration;
pub mod session;
pub mod store;
pub mod summary;
pub mod validation;

// Re-export top-level types for convenience
pub use api::{ApiClient, ApiError, ApiResult, ErrorKind};

pub use autosave::{AutosaveScheduler, NoteWriter};

pub use config::{Config, ConfigError, LoggingConfig};

pub use context::AppContext;

pub use guard::{GuardDecision, Route, RouteGuard};

pub use models::{Activity, Class, Content, ContentStats, Note, Notification, User, UserType};

pub use session::{BootPolicy, ProfileSource, Session, SessionEvent, SessionState};

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
