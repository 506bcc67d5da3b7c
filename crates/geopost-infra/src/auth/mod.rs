//! Token verification against the external identity issuer.

mod openid;

pub use openid::{OpenIdConfig, OpenIdVerifier};
