//! User data model.
//!
//! A user row is created lazily the first time a verified identity reaches
//! the API; the username comes from the identity provider and is never
//! changed afterwards.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a username, in characters.
pub const USERNAME_MAX: usize = 255;
/// Maximum length of a profile text, in characters.
pub const PROFILE_MAX: usize = 1024;

/// Validation errors for user value types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyUsername,
    UsernameTooLong { max: usize },
    ProfileTooLong { max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::ProfileTooLong { max } => {
                write!(f, "profile must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Store-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw store identifier.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw identifier as stored.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique, provider-issued username.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(raw.into())
    }

    fn from_owned(raw: String) -> Result<Self, UserValidationError> {
        if raw.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if raw.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Free-form profile text. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Profile(String);

impl Profile {
    /// Validate and construct a [`Profile`].
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(raw.into())
    }

    fn from_owned(raw: String) -> Result<Self, UserValidationError> {
        if raw.chars().count() > PROFILE_MAX {
            return Err(UserValidationError::ProfileTooLong { max: PROFILE_MAX });
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Profile> for String {
    fn from(value: Profile) -> Self {
        value.0
    }
}

impl TryFrom<String> for Profile {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Registered user.
///
/// ## Invariants
/// - `username` is unique across users.
/// - `profile` is `None` until the user first writes one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub profile: Option<Profile>,
    pub registered_at: DateTime<Utc>,
}

impl User {
    /// Profile text, or the empty string when none was ever saved.
    pub fn profile_text(&self) -> &str {
        self.profile.as_ref().map_or("", Profile::as_str)
    }
}
