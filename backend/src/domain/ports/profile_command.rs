//! Driving port for editing profile text.

use async_trait::async_trait;

use crate::domain::{Error, Profile, Username};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Store `profile` for `username` and echo it back.
    async fn update_profile(&self, username: &Username, profile: Profile)
    -> Result<Profile, Error>;
}
