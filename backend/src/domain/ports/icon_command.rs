//! Driving port for replacing avatar icons.

use async_trait::async_trait;

use crate::domain::{Error, Username};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IconCommand: Send + Sync {
    /// Overwrite the icon for `username` and echo the stored blob.
    async fn update_icon(&self, username: &Username, icon_image: String)
    -> Result<String, Error>;
}
