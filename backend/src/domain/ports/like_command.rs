//! Driving port for liking and unliking posts.

use async_trait::async_trait;

use crate::domain::{Error, PostId, User};

/// Like toggling. Both operations return the post's like count afterwards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeCommand: Send + Sync {
    /// Fails with a validation error when `actor` already likes the post.
    async fn like_post(&self, id: PostId, actor: &User) -> Result<usize, Error>;

    /// Fails with a validation error when `actor` does not like the post.
    async fn unlike_post(&self, id: PostId, actor: &User) -> Result<usize, Error>;
}
