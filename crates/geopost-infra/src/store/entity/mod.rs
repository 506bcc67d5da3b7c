//! SeaORM entities backing the document collections.

pub mod account;
pub mod post;
