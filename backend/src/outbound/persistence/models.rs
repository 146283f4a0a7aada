//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them into
//! domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{post_likes, posts, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub profile: Option<String>,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: i32,
    pub content: String,
    pub post_type: String,
    pub posted_at: DateTime<Utc>,
    #[expect(dead_code, reason = "owner is read through the users join")]
    pub user_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub content: &'a str,
    pub post_type: &'a str,
    pub posted_at: DateTime<Utc>,
    pub user_id: i32,
}

#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = post_likes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostLikeRow {
    pub post_id: i32,
    pub user_id: i32,
}
