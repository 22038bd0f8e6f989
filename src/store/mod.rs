//! Persistent Client Storage
//!
//! A small string key/value store standing in for browser `localStorage`.
//! The session token is the only value the client persists.
//!
//! - [`MemoryStore`]: process-local, used in tests and ephemeral sessions
//! - [`FileStore`]: JSON document on disk, survives restarts

mod error;
mod file;
mod memory;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Key under which the bearer token is persisted
pub const TOKEN_KEY: &str = "token";

/// String key/value storage shared by the session and the API client
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Insert or replace a value
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete a value; deleting a missing key is not an error
    fn remove(&self, key: &str) -> StoreResult<()>;
}
