//! Driving port for reading avatar icons.

use async_trait::async_trait;

use crate::domain::{Error, Username};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IconQuery: Send + Sync {
    /// Icon blob for `username`, or the empty string when none is stored.
    async fn get_icon(&self, username: &Username) -> Result<String, Error>;
}
