//! Domain entities, services, and ports.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failures.
//! - [`User`], [`Post`], [`PostView`]: entities and the client projection.
//! - [`PostService`], [`UserService`], [`IconService`]: implementations of
//!   the driving ports declared in [`ports`].

pub mod error;
pub mod icon;
pub mod icon_service;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::error::{Error, ErrorCode};
pub use self::icon::IconKey;
pub use self::icon_service::IconService;
pub use self::post::{
    CONTENT_MAX, DEFAULT_LIST_LIMIT, DEFAULT_LIST_OFFSET, MAX_LIST_LIMIT, NewPost, Post,
    PostAuthorView, PostContent, PostId, PostPage, PostType, PostValidationError, PostView,
};
pub use self::post_service::PostService;
pub use self::trace_id::TraceId;
pub use self::user::{
    PROFILE_MAX, Profile, USERNAME_MAX, User, UserId, UserValidationError, Username,
};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use sns_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
