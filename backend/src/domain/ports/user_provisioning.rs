//! Driving port for lazily provisioning users from external identities.

use async_trait::async_trait;

use crate::domain::{Error, User, Username};

/// Get-or-create lookup used by the authentication extractor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProvisioning: Send + Sync {
    /// Return the user named `username`, creating it with an empty profile
    /// on first sight.
    async fn get_or_save_user(&self, username: &Username) -> Result<User, Error>;
}
