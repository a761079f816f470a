//! Premium handlers.
//!
//! ## Commands
//! - Redeeming a promo code
//!
//! ## Queries
//! - Evaluating a user's premium status

mod get_premium_status;
mod redeem_promo_code;

pub use get_premium_status::{
    GetPremiumStatusHandler, GetPremiumStatusQuery, GetPremiumStatusResult,
};
pub use redeem_promo_code::{
    RedeemPromoCodeCommand, RedeemPromoCodeHandler, RedeemPromoCodeResult,
};
