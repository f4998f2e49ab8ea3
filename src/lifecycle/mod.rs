//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build stores → Start server (spawns sweeper)
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → broadcast → sweeper exits, server drains → Exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
