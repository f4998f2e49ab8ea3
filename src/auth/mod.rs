//! Identity and authorization subsystem.
//!
//! # Data Flow
//! ```text
//! Admitted request:
//!     → resolver.rs (Authorization header → Principal, Vary: Authorization)
//!         → token.rs (scheme split, shape check)
//!         → store.rs TokenStore (authentication scope lookup)
//!     → guard.rs (per-route chain: authenticated ⊂ activated ⊂ permission)
//!         → store.rs PermissionStore (permission tier only)
//!     → Handler reads Extension<Principal>
//! ```

pub mod guard;
pub mod memory;
pub mod principal;
pub mod resolver;
pub mod store;
pub mod token;

pub use guard::{guard_middleware, AuthorizationChain, GuardStage, GuardState};
pub use memory::MemoryStore;
pub use principal::{Permissions, Principal, User, UserId};
pub use resolver::{authenticate_middleware, PrincipalResolver};
pub use store::{PermissionStore, StoreError, TokenScope, TokenStore};
