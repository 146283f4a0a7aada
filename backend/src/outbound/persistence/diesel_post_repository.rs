//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.
//!
//! Posts are read joined with their owner; likers are fetched in a second
//! query keyed by the returned post ids. Like uniqueness is enforced by the
//! `post_likes` composite primary key.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{PostListQuery, PostRepository, PostRepositoryError};
use crate::domain::{NewPost, Post, PostContent, PostId, PostType, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_user_repository::row_to_user;
use super::models::{NewPostRow, PostLikeRow, PostRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{post_likes, posts, users};

/// Diesel-backed implementation of the [`PostRepository`] port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostRepositoryError {
    map_basic_pool_error(error, PostRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PostRepositoryError {
    map_basic_diesel_error(
        error,
        PostRepositoryError::query,
        PostRepositoryError::connection,
    )
}

/// Mutations by primary key touch exactly one row or the post is gone.
fn expect_row(affected: usize, id: PostId) -> Result<(), PostRepositoryError> {
    if affected == 0 {
        Err(PostRepositoryError::not_found(id.get()))
    } else {
        Ok(())
    }
}

fn row_to_post(
    (post, owner): (PostRow, UserRow),
    likers: Vec<UserId>,
) -> Result<Post, PostRepositoryError> {
    let content = PostContent::new(post.content)
        .map_err(|err| PostRepositoryError::query(format!("invalid stored content: {err}")))?;
    let post_type = PostType::parse(&post.post_type).ok_or_else(|| {
        PostRepositoryError::query(format!("unknown post type {}", post.post_type))
    })?;
    let owner = row_to_user(owner).map_err(|err| PostRepositoryError::query(err.to_string()))?;
    Ok(Post {
        id: PostId::new(post.id),
        content,
        post_type,
        posted_at: post.posted_at,
        owner,
        likers,
    })
}

async fn load_likers(
    conn: &mut AsyncPgConnection,
    post_ids: &[i32],
) -> Result<HashMap<i32, Vec<UserId>>, PostRepositoryError> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<PostLikeRow> = post_likes::table
        .filter(post_likes::post_id.eq_any(post_ids))
        .select(PostLikeRow::as_select())
        .order(post_likes::user_id.asc())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let mut likers: HashMap<i32, Vec<UserId>> = HashMap::new();
    for row in rows {
        likers
            .entry(row.post_id)
            .or_default()
            .push(UserId::new(row.user_id));
    }
    Ok(likers)
}

async fn count_likes(
    conn: &mut AsyncPgConnection,
    post_id: i32,
) -> Result<usize, PostRepositoryError> {
    let count: i64 = post_likes::table
        .filter(post_likes::post_id.eq(post_id))
        .count()
        .get_result(conn)
        .await
        .map_err(map_diesel_error)?;
    usize::try_from(count).map_err(|_| PostRepositoryError::query("negative like count"))
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn list(&self, query: &PostListQuery) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut statement = posts::table
            .inner_join(users::table)
            .select((PostRow::as_select(), UserRow::as_select()))
            .order((posts::posted_at.desc(), posts::id.desc()))
            .offset(query.page.offset)
            .limit(query.page.limit)
            .into_boxed();
        if let Some(owner) = &query.owner {
            statement = statement.filter(users::username.eq(owner.as_str()));
        }
        let rows: Vec<(PostRow, UserRow)> = statement
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ids: Vec<i32> = rows.iter().map(|(post, _)| post.id).collect();
        let mut likers = load_likers(&mut conn, &ids).await?;
        rows.into_iter()
            .map(|row| {
                let post_likers = likers.remove(&row.0.id).unwrap_or_default();
                row_to_post(row, post_likers)
            })
            .collect()
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(PostRow, UserRow)> = posts::table
            .inner_join(users::table)
            .filter(posts::id.eq(id.get()))
            .select((PostRow::as_select(), UserRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut likers = load_likers(&mut conn, &[id.get()]).await?;
        row_to_post(row, likers.remove(&id.get()).unwrap_or_default()).map(Some)
    }

    async fn insert(&self, post: &NewPost) -> Result<PostId, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPostRow {
            content: post.content.as_str(),
            post_type: post.post_type.as_str(),
            posted_at: post.posted_at,
            user_id: post.owner.get(),
        };
        diesel::insert_into(posts::table)
            .values(&row)
            .returning(posts::id)
            .get_result::<i32>(&mut conn)
            .await
            .map(PostId::new)
            .map_err(map_diesel_error)
    }

    async fn update_content(
        &self,
        id: PostId,
        content: &PostContent,
    ) -> Result<(), PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(posts::table.find(id.get()))
            .set(posts::content.eq(content.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
            .and_then(|updated| expect_row(updated, id))
    }

    async fn delete(&self, id: PostId) -> Result<(), PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // post_likes rows go with the post through ON DELETE CASCADE.
        diesel::delete(posts::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
            .and_then(|deleted| expect_row(deleted, id))
    }

    async fn add_like(&self, post: PostId, user: UserId) -> Result<usize, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(post_likes::table)
            .values(&PostLikeRow {
                post_id: post.get(),
                user_id: user.get(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if inserted == 0 {
            return Err(PostRepositoryError::already_liked(post.get(), user.get()));
        }
        count_likes(&mut conn, post.get()).await
    }

    async fn remove_like(
        &self,
        post: PostId,
        user: UserId,
    ) -> Result<usize, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(post_likes::table.find((post.get(), user.get())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if removed == 0 {
            return Err(PostRepositoryError::not_liked(post.get(), user.get()));
        }
        count_likes(&mut conn, post.get()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, Ok(()))]
    #[case(0, Err(PostRepositoryError::not_found(7)))]
    fn keyed_mutations_must_touch_a_row(
        #[case] affected: usize,
        #[case] expected: Result<(), PostRepositoryError>,
    ) {
        assert_eq!(expect_row(affected, PostId::new(7)), expected);
    }
}
