//! Web API module for the balance bot
//!
//! REST endpoints for wallet import and balance queries. Callers are
//! identified by the `X-User-Id` header and authenticated with a shared
//! bearer token.

pub mod routes;
pub mod server;

pub use server::{create_app, AppState};
