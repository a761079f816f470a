//! Ports - Interfaces for external dependencies.
//!
//! Ports define the contracts between the application and infrastructure.
//! Adapters implement these traits for specific technologies.
//!
//! # Server ports
//!
//! - `PromoCodeLedger` - Atomic promo code redemption
//! - `GrantReader` - Premium grants and history
//! - `AccountRepository` - Account facts (creation time, admin flag)
//! - `SessionValidator` - Bearer token validation
//!
//! # Client ports
//!
//! - `KeyValueStore` - Device-local persistence
//! - `EntitlementRemote` - The entitlement server

mod account_repository;
mod entitlement_remote;
mod grant_reader;
mod key_value_store;
mod promo_code_ledger;
mod session_validator;

pub use account_repository::AccountRepository;
pub use entitlement_remote::{EntitlementRemote, RedeemReceipt};
pub use grant_reader::GrantReader;
pub use key_value_store::{KeyValueStore, StoreError};
pub use promo_code_ledger::{CodeUsage, PromoCodeLedger};
pub use session_validator::SessionValidator;
