//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel row structs and domain types and
//! map database failures into the port error enums. Row structs and the
//! table definitions never leave this module.
//!
//! ```ignore
//! use sns_backend::outbound::persistence::{DbPool, DieselPostRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/sns")).await?;
//! let posts = DieselPostRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_post_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_post_repository::DieselPostRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::run_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
