//! # GeoPost Infrastructure
//!
//! Concrete implementations of the ports defined in `geopost-core`:
//! the document store (PostgreSQL and in-memory) and the OpenID token
//! verifier.

pub mod auth;
pub mod store;

pub use auth::{OpenIdConfig, OpenIdVerifier};
pub use store::{DatabaseConfig, MemoryPostStore, PostgresPostStore};
