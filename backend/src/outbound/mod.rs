//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: in-memory repositories for tests and database-less runs.
//! - **icons**: filesystem and in-memory icon blob stores.
//! - **jwt**: identity token verification.

pub mod icons;
pub mod jwt;
pub mod memory;
pub mod persistence;
