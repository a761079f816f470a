//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod account;
pub mod premium;

pub use account::{DeleteAccountCommand, DeleteAccountHandler, DeleteAccountResult};
pub use premium::{
    GetPremiumStatusHandler, GetPremiumStatusQuery, GetPremiumStatusResult,
    RedeemPromoCodeCommand, RedeemPromoCodeHandler, RedeemPromoCodeResult,
};
