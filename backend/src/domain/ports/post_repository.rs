//! Port for post and like persistence.
//!
//! Posts are always returned with their owner and the full likers set. Like
//! membership is enforced by the store: adding an existing like or removing
//! a missing one is reported as a distinct error rather than silently
//! succeeding, so the check-then-act in the service cannot produce
//! duplicates under concurrency.

use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostContent, PostId, PostPage, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
        /// The post to mutate no longer exists.
        NotFound { post_id: i32 } => "post {post_id} not found",
        /// The like association already exists.
        AlreadyLiked { post_id: i32, user_id: i32 } =>
            "user {user_id} already likes post {post_id}",
        /// The like association does not exist.
        NotLiked { post_id: i32, user_id: i32 } =>
            "user {user_id} does not like post {post_id}",
    }
}

/// Filter and window for post listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListQuery {
    /// Restrict to posts owned by this username.
    pub owner: Option<Username>,
    pub page: PostPage,
}

/// Port for post storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// List posts newest first by `posted_at`.
    async fn list(&self, query: &PostListQuery) -> Result<Vec<Post>, PostRepositoryError>;

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// Persist a new post and return its assigned identifier.
    async fn insert(&self, post: &NewPost) -> Result<PostId, PostRepositoryError>;

    /// Replace the content of an existing post.
    ///
    /// Fails with [`PostRepositoryError::NotFound`] when no post matches.
    async fn update_content(
        &self,
        id: PostId,
        content: &PostContent,
    ) -> Result<(), PostRepositoryError>;

    /// Remove the post and its like associations.
    ///
    /// Fails with [`PostRepositoryError::NotFound`] when no post matches.
    async fn delete(&self, id: PostId) -> Result<(), PostRepositoryError>;

    /// Record a like and return the new like count.
    async fn add_like(&self, post: PostId, user: UserId) -> Result<usize, PostRepositoryError>;

    /// Remove a like and return the new like count.
    async fn remove_like(&self, post: PostId, user: UserId)
    -> Result<usize, PostRepositoryError>;
}
