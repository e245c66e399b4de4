//! Feature domains, one module per backend surface.
//!
//! Each domain keeps its wire types next to the client functions that use
//! them; everything goes through the shared [`crate::api::ApiClient`] (public
//! endpoints) or the [`auth::AuthGateway`] helper (protected endpoints).

pub mod analyze;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod geo;
pub mod posts;
pub mod profiles;
