//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Profile, User, UserId, Username};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

pub(super) fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let username = Username::new(row.username)
        .map_err(|err| UserPersistenceError::query(format!("invalid stored username: {err}")))?;
    let profile = row
        .profile
        .map(Profile::new)
        .transpose()
        .map_err(|err| UserPersistenceError::query(format!("invalid stored profile: {err}")))?;
    Ok(User {
        id: UserId::new(row.id),
        username,
        profile,
        registered_at: row.registered_at,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn insert_if_absent(
        &self,
        username: &Username,
        registered_at: DateTime<Utc>,
    ) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewUserRow {
            username: username.as_str(),
            registered_at,
        };
        // A concurrent first request may have inserted the same username;
        // the re-read below returns whichever row won.
        diesel::insert_into(users::table)
            .values(&new_row)
            .on_conflict(users::username)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let row: UserRow = users::table
            .filter(users::username.eq(username.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_user(row)
    }

    async fn update_profile(
        &self,
        id: UserId,
        profile: &Profile,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.find(id.get()))
            .set(users::profile.eq(Some(profile.as_str())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
