//! Backoff schedule for the transport's supervised reconnect.

use crate::StreamError;

use std::time::Duration;

use log::{debug, info, warn};
use tokio::time::sleep;
use vs_config::ReconnectConfig;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts including the first; 0 retries until a non-retryable error
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Scale each delay by a random factor in 0.5..1.5
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&ReconnectConfig::default())
    }
}

impl From<&ReconnectConfig> for RetryConfig {
    fn from(config: &ReconnectConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_secs(config.max_delay_secs),
            backoff_multiplier: config.backoff_multiplier,
            jitter: config.jitter,
        }
    }
}

impl RetryConfig {
    pub fn backoff(&self) -> Backoff<'_> {
        Backoff {
            config: self,
            attempts: 0,
            next: self.initial_delay,
        }
    }
}

/// Attempt counter plus the un-jittered delay before the next attempt
pub struct Backoff<'a> {
    config: &'a RetryConfig,
    attempts: u32,
    next: Duration,
}

impl Backoff<'_> {
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Record a failed attempt. `None` once the attempt budget is spent,
    /// otherwise the pause before trying again.
    pub fn fail(&mut self) -> Option<Duration> {
        self.attempts += 1;
        if self.config.max_attempts != 0 && self.attempts >= self.config.max_attempts {
            return None;
        }

        let pause = if self.config.jitter {
            self.next.mul_f64(0.5 + rand::random::<f64>())
        } else {
            self.next
        };
        self.next = self
            .next
            .mul_f64(self.config.backoff_multiplier)
            .min(self.config.max_delay);
        Some(pause)
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error or
/// the attempt budget runs out
pub async fn with_retry<F, Fut, T, E>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display + IsRetryable,
{
    let mut backoff = config.backoff();

    loop {
        let error = match operation().await {
            Ok(value) => {
                if backoff.attempts() > 0 {
                    info!(
                        "{}: ok on attempt {}",
                        operation_name,
                        backoff.attempts() + 1
                    );
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        if !error.is_retryable() {
            warn!("{}: not retrying: {}", operation_name, error);
            return Err(error);
        }
        let Some(pause) = backoff.fail() else {
            warn!(
                "{}: giving up after {} attempts: {}",
                operation_name,
                backoff.attempts(),
                error
            );
            return Err(error);
        };

        debug!(
            "{}: attempt {} failed ({}), next try in {:?}",
            operation_name,
            backoff.attempts(),
            error,
            pause
        );
        sleep(pause).await;
    }
}

pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for StreamError {
    fn is_retryable(&self) -> bool {
        StreamError::is_retryable(self)
    }
}
