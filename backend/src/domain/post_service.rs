//! Post and like domain service.
//!
//! Every mutation follows the same sequence: load the post (absent ⇒
//! `NotFound`), authorise the actor, mutate through the repository, then
//! project the result. Projections embed the owner's icon, fetched live.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use mockable::Clock;

use crate::domain::ports::{
    IconQuery, LikeCommand, ListPostsRequest, PostCommand, PostListQuery, PostQuery,
    PostRepository, PostRepositoryError,
};
use crate::domain::{
    Error, NewPost, Post, PostContent, PostId, PostType, PostView, User, UserId,
};

/// Post service implementing the post and like driving ports.
#[derive(Clone)]
pub struct PostService<P, I> {
    posts: Arc<P>,
    icons: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<P, I> PostService<P, I> {
    /// Create a service over a post repository and an icon lookup.
    pub fn new(posts: Arc<P>, icons: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self {
            posts,
            icons,
            clock,
        }
    }
}

fn map_repository_error(error: PostRepositoryError) -> Error {
    match error {
        PostRepositoryError::Connection { message } => {
            Error::internal(format!("post repository unavailable: {message}"))
        }
        PostRepositoryError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
        // The post vanished between the load and the write.
        PostRepositoryError::NotFound { post_id } => post_not_found(PostId::new(post_id)),
        // Reaching these means a concurrent request won the race; report it
        // the same way as the in-service membership check.
        PostRepositoryError::AlreadyLiked { post_id, user_id } => Error::validation(format!(
            "User:{user_id} has already liked Post:{post_id}."
        )),
        PostRepositoryError::NotLiked { post_id, user_id } => {
            Error::validation(format!("User:{user_id} has not liked Post:{post_id}."))
        }
    }
}

fn post_not_found(id: PostId) -> Error {
    Error::not_found(format!("Post:{id} does not exist."))
}

impl<P, I> PostService<P, I>
where
    P: PostRepository,
    I: IconQuery,
{
    async fn find_post(&self, id: PostId) -> Result<Post, Error> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| post_not_found(id))
    }

    async fn project(&self, post: &Post, viewer: Option<UserId>) -> Result<PostView, Error> {
        let icon_image = self.icons.get_icon(&post.owner.username).await?;
        Ok(PostView::project(post, viewer, icon_image))
    }
}

#[async_trait]
impl<P, I> PostQuery for PostService<P, I>
where
    P: PostRepository,
    I: IconQuery,
{
    async fn list_posts(&self, request: ListPostsRequest) -> Result<Vec<PostView>, Error> {
        let ListPostsRequest {
            viewer,
            owner,
            page,
        } = request;
        let posts = self
            .posts
            .list(&PostListQuery { owner, page })
            .await
            .map_err(map_repository_error)?;
        try_join_all(posts.iter().map(|post| self.project(post, viewer))).await
    }
}

#[async_trait]
impl<P, I> PostCommand for PostService<P, I>
where
    P: PostRepository,
    I: IconQuery,
{
    async fn create_post(&self, content: PostContent, owner: &User) -> Result<PostView, Error> {
        let new_post = NewPost {
            content,
            post_type: PostType::Post,
            posted_at: self.clock.utc(),
            owner: owner.id,
        };
        let id = self
            .posts
            .insert(&new_post)
            .await
            .map_err(map_repository_error)?;
        let post = Post {
            id,
            content: new_post.content,
            post_type: new_post.post_type,
            posted_at: new_post.posted_at,
            owner: owner.clone(),
            likers: Vec::new(),
        };
        self.project(&post, Some(owner.id)).await
    }

    async fn update_post(
        &self,
        id: PostId,
        content: PostContent,
        actor: &User,
    ) -> Result<PostView, Error> {
        let mut post = self.find_post(id).await?;
        if !post.can_be_updated_by(actor) {
            return Err(Error::forbidden(format!(
                "User:{} cannot update Post:{id}.",
                actor.username
            )));
        }
        self.posts
            .update_content(id, &content)
            .await
            .map_err(map_repository_error)?;
        post.content = content;
        self.project(&post, Some(actor.id)).await
    }

    async fn delete_post(&self, id: PostId, actor: &User) -> Result<(), Error> {
        let post = self.find_post(id).await?;
        if !post.can_be_deleted_by(actor) {
            return Err(Error::forbidden(format!(
                "User:{} cannot delete Post:{id}.",
                actor.username
            )));
        }
        self.posts.delete(id).await.map_err(map_repository_error)
    }
}

#[async_trait]
impl<P, I> LikeCommand for PostService<P, I>
where
    P: PostRepository,
    I: IconQuery,
{
    async fn like_post(&self, id: PostId, actor: &User) -> Result<usize, Error> {
        let post = self.find_post(id).await?;
        if post.is_liked_by(actor.id) {
            return Err(Error::validation(format!(
                "User:{} has already liked Post:{id}.",
                actor.username
            )));
        }
        self.posts
            .add_like(id, actor.id)
            .await
            .map_err(map_repository_error)
    }

    async fn unlike_post(&self, id: PostId, actor: &User) -> Result<usize, Error> {
        let post = self.find_post(id).await?;
        if !post.is_liked_by(actor.id) {
            return Err(Error::validation(format!(
                "User:{} has not liked Post:{id}.",
                actor.username
            )));
        }
        self.posts
            .remove_like(id, actor.id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
