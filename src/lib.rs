//! Auth/session core for the calorie tracker web front end.
//!
//! SYSTEM CONTEXT
//! ==============
//! Users sign in against an external auth API and get a signed session token.
//! This crate carries that token everywhere it is needed:
//!
//! - `auth`:   token codec, cookie shape, and the server-side resolver.
//! - `routes`: axum server with the route guard middleware and guarded pages.
//! - `store`:  client-side persisted auth store and its hydration gate.
//! - `net`:    typed client for the external auth/nutrition API.
//!
//! The guard and the resolver each verify the token on their own. Headers the
//! guard stamps for downstream handlers are hints, never proof of identity.

pub mod auth;
pub mod config;
pub mod net;
pub mod routes;
pub mod state;
pub mod store;
