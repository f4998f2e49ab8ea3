//! Admission control subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → client_ip.rs (effective client address)
//!     → rate_limit.rs (admit or 429)
//!         → registry.rs (lookup-or-create bucket, touch last-seen)
//!         → token_bucket.rs (refill, take one token)
//!     → Pass to principal resolution
//!
//! Background:
//!     registry.rs sweeper evicts clients idle past the timeout
//! ```
//!
//! # Design Decisions
//! - Single process, in-memory state only
//! - Disabled limiter never touches the registry
//! - Bucket updates are never rolled back, even if a later stage rejects

pub mod client_ip;
pub mod rate_limit;
pub mod registry;
pub mod token_bucket;

pub use rate_limit::{rate_limit_middleware, RateLimiter};
pub use registry::{BucketHandle, ClientRegistry};
pub use token_bucket::TokenBucket;
