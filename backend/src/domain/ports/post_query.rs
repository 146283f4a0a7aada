//! Driving port for reading post timelines.

use async_trait::async_trait;

use crate::domain::{Error, PostPage, PostView, UserId, Username};

/// Request to list posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPostsRequest {
    /// User the `isLiked` flags are computed for.
    pub viewer: Option<UserId>,
    /// Restrict the listing to one owner; `None` lists everyone.
    pub owner: Option<Username>,
    pub page: PostPage,
}

/// Domain use-case port for post listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostQuery: Send + Sync {
    /// Return posts newest first. An empty page is not an error.
    async fn list_posts(&self, request: ListPostsRequest) -> Result<Vec<PostView>, Error>;
}
