//! HTTP adapters - REST API implementations.
//!
//! Each endpoint group has its own module with DTOs, handlers, and routes.
//! `router` assembles them behind the shared middleware stack.

pub mod account;
pub mod error;
pub mod health;
pub mod middleware;
pub mod premium;
pub mod router;

pub use error::EntitlementApiError;
pub use router::{build_router, AppServices, HttpSettings};
