use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Metrics collector for the broadcaster
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "vs_stream" }
    }

    /// Record a broadcast tick that ran to completion
    pub fn tick_completed(&self, duration: Duration) {
        counter!(format!("{}.ticks.completed", self.prefix)).increment(1);
        histogram!(format!("{}.ticks.duration_ms", self.prefix))
            .record(duration.as_millis() as f64);
    }

    /// Record a tick that did no work
    pub fn tick_skipped(&self, reason: &str) {
        counter!(format!("{}.ticks.skipped", self.prefix)).increment(1);
        counter!(format!("{}.ticks.skipped.{}", self.prefix, reason)).increment(1);
    }

    pub fn moments_generated(&self, count: usize) {
        counter!(format!("{}.moments.generated", self.prefix)).increment(count as u64);
    }

    pub fn generation_failed(&self) {
        counter!(format!("{}.moments.failed", self.prefix)).increment(1);
    }

    pub fn publish_succeeded(&self, latency: Duration) {
        counter!(format!("{}.publish.succeeded", self.prefix)).increment(1);
        histogram!(format!("{}.publish.latency_ms", self.prefix))
            .record(latency.as_secs_f64() * 1000.0);
    }

    pub fn publish_failed(&self, error_code: &str) {
        counter!(format!("{}.publish.failed", self.prefix)).increment(1);
        counter!(format!("{}.publish.failed.{}", self.prefix, error_code)).increment(1);
    }

    pub fn rate_limited(&self) {
        counter!(format!("{}.rate_limited", self.prefix)).increment(1);
    }

    /// Record a broker connection lifecycle event
    pub fn connection_event(&self, event: &str) {
        counter!(format!("{}.connection.{}", self.prefix, event)).increment(1);
    }

    pub fn connected(&self, connected: bool) {
        gauge!(format!("{}.connection.up", self.prefix)).set(if connected { 1.0 } else { 0.0 });
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
