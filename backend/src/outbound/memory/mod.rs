//! In-memory adapters for the user and post repositories.
//!
//! Used when no database URL is configured and by handler tests. Both ports
//! are implemented by one [`InMemoryStore`] so posts can resolve their
//! owners; clones share state.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    PostListQuery, PostRepository, PostRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    NewPost, Post, PostContent, PostId, PostType, Profile, User, UserId, Username,
};

#[derive(Debug, Clone)]
struct PostRecord {
    content: PostContent,
    post_type: PostType,
    posted_at: DateTime<Utc>,
    owner: UserId,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<UserId, User>,
    posts: BTreeMap<PostId, PostRecord>,
    likes: BTreeSet<(PostId, UserId)>,
    next_user_id: i32,
    next_post_id: i32,
}

impl State {
    fn assign_user_id(&mut self) -> UserId {
        self.next_user_id += 1;
        UserId::new(self.next_user_id)
    }

    fn assign_post_id(&mut self) -> PostId {
        self.next_post_id += 1;
        PostId::new(self.next_post_id)
    }

    fn like_count(&self, post: PostId) -> usize {
        self.likes.range((post, UserId::new(i32::MIN))..=(post, UserId::new(i32::MAX))).count()
    }

    fn materialise(&self, id: PostId, record: &PostRecord) -> Option<Post> {
        let owner = self.users.get(&record.owner)?.clone();
        let likers = self
            .likes
            .range((id, UserId::new(i32::MIN))..=(id, UserId::new(i32::MAX)))
            .map(|(_, user)| *user)
            .collect();
        Some(Post {
            id,
            content: record.content.clone(),
            post_type: record.post_type,
            posted_at: record.posted_at,
            owner,
            likers,
        })
    }
}

/// Shared in-memory store implementing [`UserRepository`] and
/// [`PostRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::connection)?;
        Ok(state
            .users
            .values()
            .find(|user| &user.username == username)
            .cloned())
    }

    async fn insert_if_absent(
        &self,
        username: &Username,
        registered_at: DateTime<Utc>,
    ) -> Result<User, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::connection)?;
        if let Some(existing) = state.users.values().find(|user| &user.username == username) {
            return Ok(existing.clone());
        }
        let user = User {
            id: state.assign_user_id(),
            username: username.clone(),
            profile: None,
            registered_at,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: UserId,
        profile: &Profile,
    ) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::connection)?;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| UserPersistenceError::query(format!("user {id} not found")))?;
        user.profile = Some(profile.clone());
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn list(&self, query: &PostListQuery) -> Result<Vec<Post>, PostRepositoryError> {
        let state = self.lock().map_err(PostRepositoryError::connection)?;
        let mut posts: Vec<Post> = state
            .posts
            .iter()
            .filter_map(|(id, record)| state.materialise(*id, record))
            .filter(|post| {
                query
                    .owner
                    .as_ref()
                    .is_none_or(|owner| &post.owner.username == owner)
            })
            .collect();
        posts.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then(b.id.cmp(&a.id)));
        let offset = usize::try_from(query.page.offset).unwrap_or(0);
        let limit = usize::try_from(query.page.limit).unwrap_or(0);
        Ok(posts.into_iter().skip(offset).take(limit).collect())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let state = self.lock().map_err(PostRepositoryError::connection)?;
        Ok(state
            .posts
            .get(&id)
            .and_then(|record| state.materialise(id, record)))
    }

    async fn insert(&self, post: &NewPost) -> Result<PostId, PostRepositoryError> {
        let mut state = self.lock().map_err(PostRepositoryError::connection)?;
        if !state.users.contains_key(&post.owner) {
            return Err(PostRepositoryError::query("referenced record does not exist"));
        }
        let id = state.assign_post_id();
        state.posts.insert(
            id,
            PostRecord {
                content: post.content.clone(),
                post_type: post.post_type,
                posted_at: post.posted_at,
                owner: post.owner,
            },
        );
        Ok(id)
    }

    async fn update_content(
        &self,
        id: PostId,
        content: &PostContent,
    ) -> Result<(), PostRepositoryError> {
        let mut state = self.lock().map_err(PostRepositoryError::connection)?;
        let record = state
            .posts
            .get_mut(&id)
            .ok_or_else(|| PostRepositoryError::not_found(id.get()))?;
        record.content = content.clone();
        Ok(())
    }

    async fn delete(&self, id: PostId) -> Result<(), PostRepositoryError> {
        let mut state = self.lock().map_err(PostRepositoryError::connection)?;
        if state.posts.remove(&id).is_none() {
            return Err(PostRepositoryError::not_found(id.get()));
        }
        state.likes.retain(|(post, _)| *post != id);
        Ok(())
    }

    async fn add_like(&self, post: PostId, user: UserId) -> Result<usize, PostRepositoryError> {
        let mut state = self.lock().map_err(PostRepositoryError::connection)?;
        if !state.posts.contains_key(&post) {
            return Err(PostRepositoryError::query("referenced record does not exist"));
        }
        if !state.likes.insert((post, user)) {
            return Err(PostRepositoryError::already_liked(post.get(), user.get()));
        }
        Ok(state.like_count(post))
    }

    async fn remove_like(
        &self,
        post: PostId,
        user: UserId,
    ) -> Result<usize, PostRepositoryError> {
        let mut state = self.lock().map_err(PostRepositoryError::connection)?;
        if !state.likes.remove(&(post, user)) {
            return Err(PostRepositoryError::not_liked(post.get(), user.get()));
        }
        Ok(state.like_count(post))
    }
}
