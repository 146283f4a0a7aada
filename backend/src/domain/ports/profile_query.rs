//! Driving port for reading profile text.

use async_trait::async_trait;

use crate::domain::{Error, Profile, Username};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Profile of `username`, empty when never written.
    async fn get_profile(&self, username: &Username) -> Result<Profile, Error>;
}
