//! Easy Budget - Premium entitlement service
//!
//! Decides whether a user currently has premium access and records how it
//! was granted: admin override, promo codes, the account-creation trial, and
//! store subscriptions. The server evaluates; devices cache what the server
//! said and fall back to it offline.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
