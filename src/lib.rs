//! Request admission and identity enforcement for HTTP services.
//!
//! Requests pass a per-client rate limiter, then have their bearer credential
//! resolved to a [`Principal`], then run the authorization chain chosen for
//! their route before any handler sees them.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use auth::{AuthorizationChain, Principal};
pub use config::GateConfig;
pub use error::AccessError;
pub use http::{HttpServer, Stores};
pub use lifecycle::Shutdown;
