//! # GeoPost Core
//!
//! The domain layer of the GeoPost post service.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod proximity;

pub use error::DomainError;
