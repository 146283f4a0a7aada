//! User provisioning and profile service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    ProfileCommand, ProfileQuery, UserPersistenceError, UserProvisioning, UserRepository,
};
use crate::domain::{Error, Profile, User, Username};

/// Service implementing user provisioning and the profile driving ports.
#[derive(Clone)]
pub struct UserService<U> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> UserService<U> {
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::internal(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

impl<U: UserRepository> UserService<U> {
    async fn find_user(&self, username: &Username) -> Result<User, Error> {
        self.users
            .find_by_username(username)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("User:{username} does not exist.")))
    }
}

#[async_trait]
impl<U: UserRepository> UserProvisioning for UserService<U> {
    async fn get_or_save_user(&self, username: &Username) -> Result<User, Error> {
        if let Some(user) = self
            .users
            .find_by_username(username)
            .await
            .map_err(map_repository_error)?
        {
            return Ok(user);
        }
        let user = self
            .users
            .insert_if_absent(username, self.clock.utc())
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %user.id, %username, "provisioned user");
        Ok(user)
    }
}

#[async_trait]
impl<U: UserRepository> ProfileQuery for UserService<U> {
    async fn get_profile(&self, username: &Username) -> Result<Profile, Error> {
        let user = self.find_user(username).await?;
        Ok(user.profile.unwrap_or_default())
    }
}

#[async_trait]
impl<U: UserRepository> ProfileCommand for UserService<U> {
    async fn update_profile(
        &self,
        username: &Username,
        profile: Profile,
    ) -> Result<Profile, Error> {
        let user = self.find_user(username).await?;
        self.users
            .update_profile(user.id, &profile)
            .await
            .map_err(map_repository_error)?;
        Ok(profile)
    }
}
