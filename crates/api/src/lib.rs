//! SchoolERP ID service library.
//!
//! Exposes config, state, error handling and the router so integration tests
//! and the binary entrypoint share the exact same application.

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod html;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod uploads;
