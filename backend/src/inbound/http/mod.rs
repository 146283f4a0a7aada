//! HTTP inbound adapter exposing the REST endpoints under `/api`.

pub mod auth;
pub mod error;
pub mod health;
pub mod icons;
pub mod likes;
pub mod posts;
pub mod profiles;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub(crate) mod validation;

pub use error::ApiResult;
