mod config;
mod identity;
mod plan;
mod summary;
mod target;

pub mod runner;

pub use config::{
    ConfigError, DEFAULT_BASE_URL, DEFAULT_CONCURRENCY, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_TOTAL_REQUESTS, PostEndpoint, RunConfig, TargetKind,
    TrafficMode,
};
pub use identity::{Identity, IdentityPools, IdentityRandomizer, UaPolicy, random_ipv4};
pub use plan::{ExecutionPlan, delay_for, delay_secs, split_requests};
pub use summary::{LatencyRecorder, LatencySummary, Outcome, ResultSummary, RunReport};
pub use target::Target;
pub use viewstorm_http::HttpTransportErrorKind;
