//! Entitlement domain - premium access decisions.
//!
//! # Components
//!
//! - [`NormalizedCode`] / [`PromoCode`] / [`Redemption`] - the promo code ledger records
//! - [`PremiumGrant`] - any record conferring premium for a period
//! - [`TrialPolicy`] - trial eligibility derived from account age and history
//! - [`evaluate`] - merges all facts into one [`EntitlementStatus`]

mod account;
mod code;
mod errors;
mod evaluator;
mod grant;
mod promo_code;
mod redemption;
mod trial;

pub use account::UserAccount;
pub use code::{NormalizedCode, MAX_CODE_LENGTH};
pub use errors::EntitlementError;
pub use evaluator::{evaluate, EntitlementFacts, EntitlementSource, EntitlementStatus};
pub use grant::{GrantProvider, GrantStatus, GrantType, PremiumGrant};
pub use promo_code::PromoCode;
pub use redemption::Redemption;
pub use trial::{trial_status, TrialPolicy, TrialStatus, DEFAULT_TRIAL_WINDOW_DAYS};
