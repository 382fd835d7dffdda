//! Request/response surface over the streaming orchestrator.
//!
//! Callers send a `ToolRequest` naming one of the `stream.*` methods; the
//! `ToolDispatcher` checks the caller's request budget, runs the matching
//! orchestrator operation and wraps the outcome in a `ToolResponse`.

pub mod caller_rate_limiter;
pub mod dispatcher;
pub mod error;
pub mod rate_limiter_factory;
pub mod status_hint;
pub mod tool_method;
pub mod tool_params;
pub mod tool_request;
pub mod tool_response;

pub use caller_rate_limiter::{CallerRateLimiter, DEFAULT_PRUNE_EVERY};
pub use dispatcher::{DEFAULT_CALLER, DEFAULT_REQUEST_TIMEOUT, ToolDispatcher};
pub use error::{Result, ToolError};
pub use rate_limiter_factory::RateLimiterFactory;
pub use status_hint::{StatusHint, StatusReport};
pub use tool_method::ToolMethod;
pub use tool_params::{StreamVibeParams, StreamWorldParams};
pub use tool_request::ToolRequest;
pub use tool_response::{ErrorBody, ToolResponse};

#[cfg(test)]
mod tests;
