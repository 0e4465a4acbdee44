//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated user behind a JWT Bearer token.

pub mod auth;
