//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Profile, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Port for user storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by their unique username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Create the user unless one with the same username exists, then return
    /// the stored row.
    ///
    /// Concurrent calls for the same username must all observe one row.
    async fn insert_if_absent(
        &self,
        username: &Username,
        registered_at: DateTime<Utc>,
    ) -> Result<User, UserPersistenceError>;

    /// Overwrite the profile text of an existing user.
    async fn update_profile(
        &self,
        id: UserId,
        profile: &Profile,
    ) -> Result<(), UserPersistenceError>;
}
