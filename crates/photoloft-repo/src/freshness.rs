//! Freshness policy for cached repository data.

use std::time::{Duration, Instant};

use photoloft_core::config::CacheConfig;

/// Decides how long a successful update keeps a repository fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    max_age: Option<Duration>,
}

impl FreshnessPolicy {
    /// Data stays fresh until [`invalidated`](crate::CollectionRepository::invalidate)
    /// explicitly.
    pub fn until_invalidated() -> Self {
        Self { max_age: None }
    }

    /// Data stops being fresh `max_age` after the update that produced it.
    pub fn max_age(max_age: Duration) -> Self {
        Self {
            max_age: Some(max_age),
        }
    }

    /// Builds the policy from the cache section of the configuration.
    pub fn from_cache_config(config: &CacheConfig) -> Self {
        match config.freshness_max_age {
            Some(seconds) => Self::max_age(Duration::from_secs(seconds)),
            None => Self::until_invalidated(),
        }
    }

    /// Whether data marked fresh at `fresh_at` still counts as fresh.
    pub fn is_fresh(&self, fresh_at: Option<Instant>) -> bool {
        match (fresh_at, self.max_age) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(at), Some(max_age)) => at.elapsed() < max_age,
        }
    }
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::until_invalidated()
    }
}
