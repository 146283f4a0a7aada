//! Port for the avatar object store.

use async_trait::async_trait;

use crate::domain::IconKey;

use super::define_port_error;

define_port_error! {
    /// Errors raised by icon store adapters.
    pub enum IconStoreError {
        /// Reading or writing the backing storage failed.
        Io { message: String } => "icon store i/o failed: {message}",
        /// A stored blob could not be decoded as text.
        Corrupt { key: String } => "icon blob {key} is not valid UTF-8",
    }
}

/// Key/value blob storage with overwrite semantics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IconStore: Send + Sync {
    /// Fetch the blob stored under `key`; `None` when no such key exists.
    async fn get(&self, key: &IconKey) -> Result<Option<String>, IconStoreError>;

    /// Store `blob` under `key`, replacing any previous value.
    async fn put(&self, key: &IconKey, blob: &str) -> Result<(), IconStoreError>;
}
