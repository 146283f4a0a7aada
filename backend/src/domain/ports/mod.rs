//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Query`, `*Command`, [`UserProvisioning`]) are
//! implemented by the domain services and consumed by inbound adapters.
//! Driven ports ([`UserRepository`], [`PostRepository`], [`IconStore`],
//! [`TokenVerifier`]) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod icon_command;
mod icon_query;
mod icon_store;
mod like_command;
mod post_command;
mod post_query;
mod post_repository;
mod profile_command;
mod profile_query;
mod token_verifier;
mod user_provisioning;
mod user_repository;

#[cfg(test)]
pub use icon_command::MockIconCommand;
pub use icon_command::IconCommand;
#[cfg(test)]
pub use icon_query::MockIconQuery;
pub use icon_query::IconQuery;
#[cfg(test)]
pub use icon_store::MockIconStore;
pub use icon_store::{IconStore, IconStoreError};
#[cfg(test)]
pub use like_command::MockLikeCommand;
pub use like_command::LikeCommand;
#[cfg(test)]
pub use post_command::MockPostCommand;
pub use post_command::PostCommand;
#[cfg(test)]
pub use post_query::MockPostQuery;
pub use post_query::{ListPostsRequest, PostQuery};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostListQuery, PostRepository, PostRepositoryError};
#[cfg(test)]
pub use profile_command::MockProfileCommand;
pub use profile_command::ProfileCommand;
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::ProfileQuery;
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
pub use token_verifier::{TokenVerificationError, TokenVerifier, VerifiedIdentity};
#[cfg(test)]
pub use user_provisioning::MockUserProvisioning;
pub use user_provisioning::UserProvisioning;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
