//! Post aggregate, its value types, and the transport projection.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::{User, UserId};

/// Maximum length of post content, in characters.
pub const CONTENT_MAX: usize = 255;
/// Offset applied when a listing request does not name one.
pub const DEFAULT_LIST_OFFSET: i64 = 0;
/// Page size applied when a listing request does not name one.
pub const DEFAULT_LIST_LIMIT: i64 = 20;
/// Largest page size a client may request.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Validation errors for post value types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    EmptyContent,
    ContentTooLong { max: usize },
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "content must not be empty"),
            Self::ContentTooLong { max } => write!(f, "content must be at most {max} characters"),
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Store-assigned post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i32);

impl PostId {
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Post body text, 1..=255 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostContent(String);

impl PostContent {
    /// Validate and construct [`PostContent`].
    pub fn new(raw: impl Into<String>) -> Result<Self, PostValidationError> {
        Self::from_owned(raw.into())
    }

    fn from_owned(raw: String) -> Result<Self, PostValidationError> {
        if raw.is_empty() {
            return Err(PostValidationError::EmptyContent);
        }
        if raw.chars().count() > CONTENT_MAX {
            return Err(PostValidationError::ContentTooLong { max: CONTENT_MAX });
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PostContent> for String {
    fn from(value: PostContent) -> Self {
        value.0
    }
}

impl TryFrom<String> for PostContent {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Kind of post. Only plain posts exist today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Post,
}

impl PostType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
        }
    }

    /// Parse the stored representation.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "post" => Some(Self::Post),
            _ => None,
        }
    }
}

/// Persisted post together with its owner and likers.
///
/// ## Invariants
/// - `owner` never changes after creation.
/// - `likers` holds each user at most once.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub content: PostContent,
    pub post_type: PostType,
    pub posted_at: DateTime<Utc>,
    pub owner: User,
    pub likers: Vec<UserId>,
}

impl Post {
    /// Only the owner may edit a post.
    pub fn can_be_updated_by(&self, user: &User) -> bool {
        self.owner.id == user.id
    }

    /// Only the owner may delete a post.
    pub fn can_be_deleted_by(&self, user: &User) -> bool {
        self.owner.id == user.id
    }

    pub fn is_liked_by(&self, user_id: UserId) -> bool {
        self.likers.contains(&user_id)
    }

    pub fn like_count(&self) -> usize {
        self.likers.len()
    }
}

/// Data required to persist a new post.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub content: PostContent,
    pub post_type: PostType,
    pub posted_at: DateTime<Utc>,
    pub owner: UserId,
}

/// Listing window. `offset`/`limit` are already defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostPage {
    pub offset: i64,
    pub limit: i64,
}

impl PostPage {
    /// Build a page, applying the listing defaults to absent values.
    pub fn new(offset: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            offset: offset.unwrap_or(DEFAULT_LIST_OFFSET),
            limit: limit.unwrap_or(DEFAULT_LIST_LIMIT),
        }
    }
}

impl Default for PostPage {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Owner summary embedded in a [`PostView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostAuthorView {
    #[schema(example = "alice")]
    pub username: String,
    /// Avatar blob, or the empty string when the owner has none.
    pub icon_image: String,
}

/// Read-only projection of a post returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[schema(example = 7)]
    pub id: i32,
    #[serde(rename = "type")]
    pub post_type: PostType,
    #[schema(example = "hello")]
    pub content: String,
    pub user: PostAuthorView,
    pub posted_at: DateTime<Utc>,
    pub like_count: usize,
    pub is_liked: bool,
}

impl PostView {
    /// Project `post` for `viewer`, embedding the owner's current icon.
    pub fn project(post: &Post, viewer: Option<UserId>, icon_image: String) -> Self {
        Self {
            id: post.id.get(),
            post_type: post.post_type,
            content: post.content.as_str().to_owned(),
            user: PostAuthorView {
                username: post.owner.username.as_str().to_owned(),
                icon_image,
            },
            posted_at: post.posted_at,
            like_count: post.like_count(),
            is_liked: viewer.is_some_and(|id| post.is_liked_by(id)),
        }
    }
}
