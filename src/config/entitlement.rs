//! Entitlement policy configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::entitlement::{TrialPolicy, DEFAULT_TRIAL_WINDOW_DAYS};

/// Trial window and cache staleness settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EntitlementConfig {
    #[serde(default = "default_trial_window_days")]
    pub trial_window_days: i64,

    /// Age after which a cached status is reported stale
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_secs: u64,
}

impl EntitlementConfig {
    pub fn trial_policy(&self) -> TrialPolicy {
        TrialPolicy::new(self.trial_window_days)
    }

    pub fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache_max_age_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0..=365).contains(&self.trial_window_days) {
            return Err(ValidationError::InvalidTrialWindow);
        }
        if self.cache_max_age_secs == 0 {
            return Err(ValidationError::InvalidCacheMaxAge);
        }
        Ok(())
    }
}

impl Default for EntitlementConfig {
    fn default() -> Self {
        Self {
            trial_window_days: default_trial_window_days(),
            cache_max_age_secs: default_cache_max_age(),
        }
    }
}

fn default_trial_window_days() -> i64 {
    DEFAULT_TRIAL_WINDOW_DAYS
}

fn default_cache_max_age() -> u64 {
    24 * 60 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_product_policy() {
        let config = EntitlementConfig::default();
        assert_eq!(config.trial_window_days, 14);
        assert_eq!(config.cache_max_age(), Duration::from_secs(86_400));
        assert_eq!(config.trial_policy().window_days(), 14);
    }

    #[test]
    fn negative_trial_window_is_rejected() {
        let config = EntitlementConfig {
            trial_window_days: -1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTrialWindow));
    }

    #[test]
    fn zero_cache_age_is_rejected() {
        let config = EntitlementConfig {
            cache_max_age_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidCacheMaxAge));
    }
}
