//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `entitlement` - Promo codes, grants, trials, and the premium evaluator

pub mod entitlement;
pub mod foundation;
