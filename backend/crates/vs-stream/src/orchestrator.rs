//! Streaming orchestrator: the periodic broadcast loop plus the one-shot
//! publish paths, sharing one connection, one rate limiter and one config
//! snapshot.

use crate::{
    BrokerConnectionManager, ConnectionStatus, Metrics, MomentGenerator, PublishReport,
    Result as StreamErrorResult, StopGuard, StopSignal, StreamError, StreamingConfig,
    StreamingConfigUpdate, Subject, TokenBucket, create_tick_span, subjects,
};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::Instrument;
use vs_core::{Moment, Repository, SharingPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickOutcome {
    Completed,
    RateLimited,
    ConnectFailed,
}

/// What one broadcast tick did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub started_at: DateTime<Utc>,
    pub outcome: TickOutcome,
    pub moments: usize,
    /// Messages accepted by the broker across all moments
    pub published: usize,
    /// Worlds that failed to generate or publish completely
    pub failures: usize,
    pub error: Option<String>,
}

impl TickReport {
    fn new(tick: u64) -> Self {
        Self {
            tick,
            started_at: Utc::now(),
            outcome: TickOutcome::Completed,
            moments: 0,
            published: 0,
            failures: 0,
            error: None,
        }
    }
}

/// A moment published through `stream_single_world`
#[derive(Debug, Clone)]
pub struct PublishedMoment {
    pub moment: Moment,
    pub subjects: Vec<Subject>,
    pub report: PublishReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreamingStatus {
    pub active: bool,
    pub connection: ConnectionStatus,
    pub config: StreamingConfig,
    pub tokens_available: u32,
    pub tokens_capacity: u32,
    pub ticks: u64,
    pub last_tick: Option<TickReport>,
}

struct ActiveLoop {
    stop: StopSignal,
    handle: JoinHandle<()>,
}

impl ActiveLoop {
    fn is_running(&self) -> bool {
        !self.stop.is_triggered() && !self.handle.is_finished()
    }
}

struct OrchestratorInner {
    config: RwLock<Arc<StreamingConfig>>,
    connection: Arc<BrokerConnectionManager>,
    generator: MomentGenerator,
    repository: Arc<dyn Repository>,
    rate_limiter: Arc<TokenBucket>,
    active: Mutex<Option<ActiveLoop>>,
    last_tick: RwLock<Option<TickReport>>,
    ticks: AtomicU64,
    metrics: Metrics,
}

#[derive(Clone)]
pub struct StreamingOrchestrator {
    inner: Arc<OrchestratorInner>,
}

impl StreamingOrchestrator {
    /// Build an orchestrator. With `autostart` set and a Tokio runtime
    /// available, the broadcast loop starts immediately.
    pub fn new(
        config: StreamingConfig,
        connection: Arc<BrokerConnectionManager>,
        repository: Arc<dyn Repository>,
        rate_limiter: Arc<TokenBucket>,
    ) -> StreamErrorResult<Self> {
        config.validate()?;
        let autostart = config.autostart;

        let orchestrator = Self {
            inner: Arc::new(OrchestratorInner {
                config: RwLock::new(Arc::new(config)),
                connection,
                generator: MomentGenerator::new(Arc::clone(&repository)),
                repository,
                rate_limiter,
                active: Mutex::new(None),
                last_tick: RwLock::new(None),
                ticks: AtomicU64::new(0),
                metrics: Metrics::new(),
            }),
        };

        if autostart {
            if tokio::runtime::Handle::try_current().is_ok() {
                orchestrator.start_streaming();
            } else {
                warn!("Autostart requested outside a Tokio runtime, streaming stays idle");
            }
        }

        Ok(orchestrator)
    }

    /// Start the broadcast loop. Returns false if it was already running.
    pub fn start_streaming(&self) -> bool {
        let mut active = self.inner.active.lock();
        if active.as_ref().is_some_and(ActiveLoop::is_running) {
            debug!("Streaming already active");
            return false;
        }

        let stop = StopSignal::new();
        let guard = stop.guard();
        let handle = tokio::spawn(run_loop(Arc::clone(&self.inner), guard));
        *active = Some(ActiveLoop { stop, handle });

        info!(
            "Streaming started (interval {}ms)",
            self.inner.current_config().interval_ms
        );
        true
    }

    /// Stop the broadcast loop before its next tick. A tick already running
    /// finishes. Returns false if streaming was not active.
    pub fn stop_streaming(&self) -> bool {
        let Some(active) = self.inner.active.lock().take() else {
            return false;
        };
        let was_running = active.is_running();
        active.stop.trigger();
        info!("Streaming stopped");
        was_running
    }

    pub fn is_active(&self) -> bool {
        self.inner
            .active
            .lock()
            .as_ref()
            .is_some_and(ActiveLoop::is_running)
    }

    /// Run one broadcast tick now, outside the timer
    pub async fn run_tick(&self) -> TickReport {
        self.inner.run_tick().await
    }

    /// Publish one world on demand.
    ///
    /// The moment is stamped with `user_id` as creator and viewer and shared
    /// per `sharing`, or private to the creator when `None`.
    pub async fn stream_single_world(
        &self,
        world_id: &str,
        user_id: &str,
        sharing: Option<SharingPolicy>,
    ) -> StreamErrorResult<PublishedMoment> {
        subjects::validate_token(user_id, "user ID")?;
        let config = self.inner.current_config();

        let moment = self
            .inner
            .generator
            .generate(world_id)
            .map_err(StreamError::generate_failed)?
            .with_creator(user_id)
            .with_viewer(user_id)
            .with_sharing(sharing.unwrap_or_else(SharingPolicy::private));
        let subjects = self
            .inner
            .connection
            .create_moment_subjects(&config.stream_id, &moment)?;

        self.inner
            .connection
            .connect(&config.broker_url())
            .await
            .map_err(StreamError::connect_failed)?;
        self.inner.admit()?;

        let report = self
            .inner
            .connection
            .publish_moment(&moment, &subjects)
            .await
            .map_err(StreamError::publish_failed)?;

        info!(
            "Streamed world {} for {} to {} subjects",
            world_id,
            user_id,
            report.len()
        );
        Ok(PublishedMoment {
            moment,
            subjects,
            report,
        })
    }

    /// Publish a world's current vibe to `user_id` and the world's allowed users
    pub async fn stream_vibe_update(
        &self,
        world_id: &str,
        user_id: &str,
    ) -> StreamErrorResult<PublishReport> {
        subjects::validate_token(user_id, "user ID")?;
        if world_id.trim().is_empty() {
            return Err(StreamError::validation(
                "world ID is required",
                Some("world_id"),
            ));
        }
        let config = self.inner.current_config();

        let world = self.inner.repository.get_world(world_id)?;
        let vibe = self.inner.repository.get_world_vibe(world_id)?;
        let sharing = SharingPolicy {
            is_public: false,
            ..world.sharing
        };

        self.inner
            .connection
            .connect(&config.broker_url())
            .await
            .map_err(StreamError::connect_failed)?;
        self.inner.admit()?;

        let report = self
            .inner
            .connection
            .publish_vibe_update(
                &config.stream_id,
                world_id,
                user_id,
                &sharing,
                &vibe.snapshot(),
            )
            .await?;

        info!(
            "Streamed vibe {} of world {} to {} subjects",
            vibe.id,
            world_id,
            report.len()
        );
        Ok(report)
    }

    /// Replace the supplied fields. Takes effect on the next tick.
    pub fn update_config(
        &self,
        update: &StreamingConfigUpdate,
    ) -> StreamErrorResult<Arc<StreamingConfig>> {
        let mut current = self.inner.config.write();
        let next = Arc::new(current.apply(update)?);

        if next.broker_url() != current.broker_url() {
            info!(
                "Broker URL changed to {}, reconnecting on next use",
                next.broker_url()
            );
        }
        info!(
            "Streaming config updated: stream_id={}, interval={}ms",
            next.stream_id, next.interval_ms
        );

        *current = Arc::clone(&next);
        Ok(next)
    }

    /// Current config snapshot
    pub fn config(&self) -> Arc<StreamingConfig> {
        self.inner.current_config()
    }

    pub fn connection(&self) -> &Arc<BrokerConnectionManager> {
        &self.inner.connection
    }

    pub fn status(&self) -> StreamingStatus {
        StreamingStatus {
            active: self.is_active(),
            connection: self.inner.connection.status(),
            config: StreamingConfig::clone(&self.inner.current_config()),
            tokens_available: self.inner.rate_limiter.available(),
            tokens_capacity: self.inner.rate_limiter.capacity(),
            ticks: self.inner.ticks.load(Ordering::Relaxed),
            last_tick: self.inner.last_tick.read().clone(),
        }
    }

    /// Stop streaming and release the broker connection
    pub async fn shutdown(&self) {
        self.stop_streaming();
        self.inner.connection.close().await;
    }
}

impl OrchestratorInner {
    fn current_config(&self) -> Arc<StreamingConfig> {
        Arc::clone(&self.config.read())
    }

    fn admit(&self) -> StreamErrorResult<()> {
        if self.rate_limiter.try_acquire() {
            Ok(())
        } else {
            self.metrics.rate_limited();
            Err(StreamError::rate_limited(self.rate_limiter.capacity()))
        }
    }

    async fn run_tick(&self) -> TickReport {
        let config = self.current_config();
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        let span = create_tick_span(&config.stream_id, tick);

        let report = self.tick(tick, config).instrument(span).await;
        *self.last_tick.write() = Some(report.clone());
        report
    }

    async fn tick(&self, tick: u64, config: Arc<StreamingConfig>) -> TickReport {
        let started = Instant::now();
        let mut report = TickReport::new(tick);

        if !self.rate_limiter.try_acquire() {
            debug!("Tick skipped: publish rate limit reached");
            self.metrics.rate_limited();
            self.metrics.tick_skipped("rate_limited");
            report.outcome = TickOutcome::RateLimited;
            return report;
        }

        if let Err(e) = self.connection.connect(&config.broker_url()).await {
            warn!("Tick skipped, broker unavailable: {}", e);
            self.metrics.tick_skipped("not_connected");
            report.outcome = TickOutcome::ConnectFailed;
            report.error = Some(e.to_string());
            return report;
        }

        let generated = self.generator.generate_all();
        report.moments = generated.moments.len();
        report.failures = generated.failures.len();

        for moment in &generated.moments {
            let result = match self
                .connection
                .create_moment_subjects(&config.stream_id, moment)
            {
                Ok(subjects) => self.connection.publish_moment(moment, &subjects).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(published) => report.published += published.len(),
                Err(e) => {
                    if let StreamError::PartialPublish { succeeded, .. } = &e {
                        report.published += succeeded;
                    }
                    warn!("World {} not fully broadcast: {}", moment.world_id, e);
                    report.failures += 1;
                }
            }
        }

        self.metrics.tick_completed(started.elapsed());
        info!(
            "Broadcast {} messages for {} moments ({} failures)",
            report.published, report.moments, report.failures
        );
        report
    }
}

async fn run_loop(inner: Arc<OrchestratorInner>, mut stop: StopGuard) {
    info!("Broadcast loop started");
    loop {
        let interval = inner.current_config().interval();
        tokio::select! {
            _ = stop.wait() => break,
            _ = sleep(interval) => {}
        }
        if stop.is_stopped() {
            break;
        }
        inner.run_tick().await;
    }
    info!("Broadcast loop stopped");
}
