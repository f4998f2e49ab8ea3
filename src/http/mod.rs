//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → security (rate limit)
//!     → auth (principal resolution, per-route guards)
//!     → handlers.rs
//!     → response.rs (AccessError → status + JSON body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use server::{HttpServer, Stores};
