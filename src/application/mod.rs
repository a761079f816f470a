//! Application layer - Commands, Queries, and Handlers.
//!
//! `handlers` runs on the server and orchestrates the ports. `client`
//! runs on devices and keeps the local entitlement cache current.

pub mod client;
pub mod handlers;

pub use client::{EntitlementRefresher, LocalEntitlementCache};
pub use handlers::{
    DeleteAccountCommand, DeleteAccountHandler, GetPremiumStatusHandler, GetPremiumStatusQuery,
    RedeemPromoCodeCommand, RedeemPromoCodeHandler,
};
