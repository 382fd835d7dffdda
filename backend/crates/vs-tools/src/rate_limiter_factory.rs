use crate::CallerRateLimiter;

use vs_config::RequestLimitConfig;

/// Builds the caller request limiter from config
#[derive(Clone)]
pub struct RateLimiterFactory {
    config: RequestLimitConfig,
}

impl RateLimiterFactory {
    pub fn new(config: RequestLimitConfig) -> Self {
        Self { config }
    }

    /// `None` when request limiting is switched off
    pub fn create(&self) -> Option<CallerRateLimiter> {
        self.config
            .enabled
            .then(|| CallerRateLimiter::new(self.config.clone()))
    }
}

impl Default for RateLimiterFactory {
    fn default() -> Self {
        Self::new(RequestLimitConfig::default())
    }
}
