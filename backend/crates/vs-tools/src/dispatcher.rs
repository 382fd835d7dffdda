use crate::{
    CallerRateLimiter, RateLimiterFactory, Result as ToolErrorResult, StatusReport,
    StreamVibeParams, StreamWorldParams, ToolError, ToolMethod, ToolRequest, ToolResponse,
};

use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use vs_stream::{StreamingConfigUpdate, StreamingOrchestrator};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Budget key for requests that do not name a caller
pub const DEFAULT_CALLER: &str = "anonymous";

pub struct ToolDispatcher {
    orchestrator: StreamingOrchestrator,
    limiter: Option<CallerRateLimiter>,
    request_timeout: Duration,
}

impl ToolDispatcher {
    pub fn new(orchestrator: StreamingOrchestrator, limiter_factory: RateLimiterFactory) -> Self {
        Self {
            orchestrator,
            limiter: limiter_factory.create(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn orchestrator(&self) -> &StreamingOrchestrator {
        &self.orchestrator
    }

    /// Answer one request. Never fails: errors become error responses.
    pub async fn dispatch(&self, request: ToolRequest) -> ToolResponse {
        let started = Instant::now();
        let caller = request
            .caller
            .clone()
            .unwrap_or_else(|| DEFAULT_CALLER.to_string());
        let id = request.id.clone();
        let method = request.method.clone();

        debug!("[caller={}] -> {}", caller, method);

        let result = match tokio::time::timeout(
            self.request_timeout,
            self.dispatch_inner(&caller, request),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                error!(
                    "[caller={}] {} timed out after {:?}",
                    caller, method, self.request_timeout
                );
                Err(ToolError::timeout(self.request_timeout.as_millis() as u64))
            }
        };

        let elapsed_ms = started.elapsed().as_millis();
        match result {
            Ok(value) => {
                info!(
                    "[caller={}] <- {} completed in {}ms",
                    caller, method, elapsed_ms
                );
                ToolResponse::success(id, value)
            }
            Err(e) => {
                warn!(
                    "[caller={}] <- {} failed in {}ms: {}",
                    caller, method, elapsed_ms, e
                );
                ToolResponse::failure(id, &e)
            }
        }
    }

    async fn dispatch_inner(&self, caller: &str, request: ToolRequest) -> ToolErrorResult<Value> {
        let method: ToolMethod = request.method.parse()?;
        self.check_rate_limit(caller)?;

        match method {
            ToolMethod::Start => {
                let started = self.orchestrator.start_streaming();
                Ok(json!({ "started": started, "status": self.status_report() }))
            }
            ToolMethod::Stop => {
                let stopped = self.orchestrator.stop_streaming();
                Ok(json!({ "stopped": stopped, "status": self.status_report() }))
            }
            ToolMethod::Status => Ok(serde_json::to_value(self.status_report())?),
            ToolMethod::StreamWorld => {
                let params: StreamWorldParams = parse_params(request.params)?;
                let published = self
                    .orchestrator
                    .stream_single_world(&params.world_id, &params.user_id, params.sharing)
                    .await?;
                let subjects: Vec<&str> = published
                    .subjects
                    .iter()
                    .map(|subject| subject.name.as_str())
                    .collect();

                Ok(json!({
                    "world_id": published.moment.world_id,
                    "creator_id": published.moment.creator_id,
                    "timestamp": published.moment.timestamp,
                    "subjects": subjects,
                    "published": published.report.published,
                }))
            }
            ToolMethod::StreamVibe => {
                let params: StreamVibeParams = parse_params(request.params)?;
                let report = self
                    .orchestrator
                    .stream_vibe_update(&params.world_id, &params.user_id)
                    .await?;
                Ok(json!({ "world_id": params.world_id, "published": report.published }))
            }
            ToolMethod::UpdateConfig => {
                let update: StreamingConfigUpdate = if request.params.is_null() {
                    StreamingConfigUpdate::default()
                } else {
                    parse_params(request.params)?
                };
                let config = if update.is_empty() {
                    self.orchestrator.config()
                } else {
                    self.orchestrator.update_config(&update)?
                };
                Ok(json!({ "config": &*config, "changed": !update.is_empty() }))
            }
        }
    }

    fn status_report(&self) -> StatusReport {
        StatusReport::from(self.orchestrator.status())
    }

    fn check_rate_limit(&self, caller: &str) -> ToolErrorResult<()> {
        match &self.limiter {
            Some(limiter) => limiter.check(caller),
            None => Ok(()),
        }
    }

    /// The caller request limiter, if request limiting is enabled
    pub fn rate_limiter(&self) -> Option<&CallerRateLimiter> {
        self.limiter.as_ref()
    }
}

fn parse_params<T: DeserializeOwned>(params: Value) -> ToolErrorResult<T> {
    Ok(serde_json::from_value(params)?)
}
