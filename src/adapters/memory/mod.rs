//! In-memory adapters for tests and local development.

mod entitlement_store;

pub use entitlement_store::{seed_codes, InMemoryEntitlementStore};
