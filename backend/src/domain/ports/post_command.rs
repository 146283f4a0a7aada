//! Driving port for post mutations.
//!
//! Update and delete are restricted to the post owner; both fail with
//! [`crate::domain::ErrorCode::NotFound`] before the ownership check when
//! the post does not exist.

use async_trait::async_trait;

use crate::domain::{Error, PostContent, PostId, PostView, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Create a post owned by `owner`.
    async fn create_post(&self, content: PostContent, owner: &User) -> Result<PostView, Error>;

    /// Replace the content of a post owned by `actor`.
    async fn update_post(
        &self,
        id: PostId,
        content: PostContent,
        actor: &User,
    ) -> Result<PostView, Error>;

    /// Delete a post owned by `actor`, with its likes.
    async fn delete_post(&self, id: PostId, actor: &User) -> Result<(), Error>;
}
