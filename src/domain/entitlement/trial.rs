//! Trial eligibility.
//!
//! Eligibility is a pure function of account age and grant history. There is
//! no "trial used" flag: any redemption or subscription row disqualifies the
//! account permanently, and once the window has elapsed it never reopens.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Trial window used by the product.
pub const DEFAULT_TRIAL_WINDOW_DAYS: i64 = 14;

/// Derived trial state for one account at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialStatus {
    pub eligible: bool,
    /// Whole days left in the window, rounded up. Zero when not eligible.
    pub days_remaining: i64,
}

impl TrialStatus {
    pub fn ineligible() -> Self {
        Self {
            eligible: false,
            days_remaining: 0,
        }
    }
}

/// Trial window configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialPolicy {
    window_days: i64,
}

impl TrialPolicy {
    pub fn new(window_days: i64) -> Self {
        Self {
            window_days: window_days.max(0),
        }
    }

    pub fn window_days(&self) -> i64 {
        self.window_days
    }

    /// Computes trial state for an account created at `created_at`.
    ///
    /// `has_history` is true when the account has any redemption or grant.
    /// A `created_at` in the future is clamped to `now`.
    pub fn status(&self, created_at: Timestamp, has_history: bool, now: Timestamp) -> TrialStatus {
        if has_history {
            return TrialStatus::ineligible();
        }

        let anchor = if created_at.is_after(&now) { now } else { created_at };
        let window = Duration::days(self.window_days);
        if now.duration_since(&anchor) > window {
            return TrialStatus::ineligible();
        }

        let days_remaining = now.ceil_days_until(&anchor.plus(window));
        if days_remaining == 0 {
            return TrialStatus::ineligible();
        }

        TrialStatus {
            eligible: true,
            days_remaining,
        }
    }
}

impl Default for TrialPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TRIAL_WINDOW_DAYS)
    }
}

/// Trial state under the default 14-day policy.
pub fn trial_status(created_at: Timestamp, has_history: bool, now: Timestamp) -> TrialStatus {
    TrialPolicy::default().status(created_at, has_history, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn created() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000)
    }

    #[test]
    fn ten_day_old_account_has_four_days_left() {
        let status = trial_status(created(), false, created().add_days(10));
        assert_eq!(
            status,
            TrialStatus {
                eligible: true,
                days_remaining: 4
            }
        );
    }

    #[test]
    fn any_history_disqualifies_even_inside_window() {
        let status = trial_status(created(), true, created().add_days(2));
        assert_eq!(status, TrialStatus::ineligible());
    }

    #[test]
    fn history_keeps_disqualifying_at_day_eleven() {
        assert!(!trial_status(created(), true, created().add_days(11)).eligible);
    }

    #[test]
    fn brand_new_account_gets_full_window() {
        let status = trial_status(created(), false, created());
        assert_eq!(status.days_remaining, DEFAULT_TRIAL_WINDOW_DAYS);
        assert!(status.eligible);
    }

    #[test]
    fn partial_day_rounds_up() {
        let now = created().add_days(13).plus(Duration::hours(23));
        assert_eq!(trial_status(created(), false, now).days_remaining, 1);
    }

    #[test]
    fn window_end_is_not_eligible() {
        assert!(!trial_status(created(), false, created().add_days(14)).eligible);
        assert!(!trial_status(created(), false, created().add_days(15)).eligible);
    }

    #[test]
    fn future_created_at_counts_as_age_zero() {
        let now = created();
        let status = trial_status(created().add_days(3), false, now);
        assert_eq!(status.days_remaining, DEFAULT_TRIAL_WINDOW_DAYS);
    }

    #[test]
    fn custom_window_is_respected() {
        let policy = TrialPolicy::new(7);
        assert_eq!(policy.status(created(), false, created().add_days(5)).days_remaining, 2);
        assert!(!policy.status(created(), false, created().add_days(8)).eligible);
    }

    proptest! {
        #[test]
        fn days_remaining_never_exceeds_window(age_secs in 0i64..(30 * 86_400)) {
            let now = created().plus(Duration::seconds(age_secs));
            let status = trial_status(created(), false, now);
            prop_assert!(status.days_remaining <= DEFAULT_TRIAL_WINDOW_DAYS);
            prop_assert!(status.days_remaining >= 0);
            prop_assert_eq!(status.eligible, status.days_remaining > 0);
        }

        #[test]
        fn eligibility_is_monotonic(a in 0i64..(30 * 86_400), b in 0i64..(30 * 86_400)) {
            let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
            let s1 = trial_status(created(), false, created().plus(Duration::seconds(earlier)));
            let s2 = trial_status(created(), false, created().plus(Duration::seconds(later)));
            prop_assert!(s2.days_remaining <= s1.days_remaining);
            if !s1.eligible {
                prop_assert!(!s2.eligible);
            }
        }

        #[test]
        fn history_always_disqualifies(age_secs in -(5 * 86_400i64)..(30 * 86_400)) {
            let now = created().plus(Duration::seconds(age_secs));
            prop_assert_eq!(trial_status(created(), true, now), TrialStatus::ineligible());
        }
    }
}
