//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Bearer token validation (HS256 JWT, mock)
//! - `http` - axum REST API
//! - `memory` - In-memory entitlement store (tests, local development)
//! - `postgres` - PostgreSQL ledger, grants, and accounts
//! - `remote` - Device-side client for the entitlement server
//! - `storage` - Device key-value stores

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod remote;
pub mod storage;
