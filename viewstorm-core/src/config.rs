use std::time::Duration;

/// Entity type the run hammers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::VariantNames,
)]
#[strum(serialize_all = "lowercase")]
pub enum TargetKind {
    Post,
    Package,
}

/// Which post endpoint to call. Ignored for packages.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::VariantNames,
)]
#[strum(serialize_all = "lowercase")]
pub enum PostEndpoint {
    /// Idempotent fetch.
    #[default]
    Get,
    /// State-mutating view increment.
    View,
}

/// Named traffic shape.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::VariantNames,
)]
#[strum(serialize_all = "lowercase")]
pub enum TrafficMode {
    /// Zero delay, maximum concurrent pressure.
    #[default]
    Burst,
    /// Low and slow, with a 100ms floor between requests.
    Drip,
    /// Large regular spacing, like scheduled polling.
    Bot,
    /// Moderate spacing with blended identities.
    Mixed,
}

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:15201";
pub const DEFAULT_CONCURRENCY: u64 = 20;
pub const DEFAULT_TOTAL_REQUESTS: u64 = 500;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown target type `{0}` (expected `post` or `package`)")]
    UnknownTargetKind(String),

    #[error("unknown mode `{0}` (expected `burst`, `drip`, `bot`, or `mixed`)")]
    UnknownMode(String),

    #[error("unknown endpoint `{0}` (expected `get` or `view`)")]
    UnknownEndpoint(String),

    #[error("invalid base url `{0}` (expected an absolute http:// or https:// URL)")]
    InvalidBaseUrl(String),

    #[error("`id` must be a positive integer")]
    InvalidId,

    #[error("`concurrency` must be a positive integer")]
    InvalidConcurrency,

    #[error("`requests` must be a positive integer")]
    InvalidRequests,

    #[error("`interval` must be a non-negative number of seconds (got {0})")]
    InvalidInterval(f64),

    #[error("`timeout` must be a positive duration")]
    InvalidTimeout,

    #[error("the {0} user-agent pool is empty")]
    EmptyPool(&'static str),
}

impl TargetKind {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        raw.parse()
            .map_err(|_| ConfigError::UnknownTargetKind(raw.to_string()))
    }
}

impl TrafficMode {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        raw.parse()
            .map_err(|_| ConfigError::UnknownMode(raw.to_string()))
    }
}

impl PostEndpoint {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        raw.parse()
            .map_err(|_| ConfigError::UnknownEndpoint(raw.to_string()))
    }
}

/// Everything one run needs. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub base_url: String,
    pub target: TargetKind,
    pub id: u64,
    pub endpoint: PostEndpoint,
    pub mode: TrafficMode,
    pub concurrency: u64,
    pub total_requests: u64,
    /// Seconds between two requests of one worker (mode decides how it is used).
    pub interval: f64,
    /// Send a random `X-Forwarded-For`/`X-Real-IP` per request.
    pub randomize_ip: bool,
    pub suspicious_ua: bool,
    pub token: Option<String>,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Seed for identity sampling; entropy when unset.
    pub seed: Option<u64>,
}

impl RunConfig {
    /// A config with the documented defaults for everything but the target.
    pub fn new(base_url: impl Into<String>, target: TargetKind, id: u64) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            target,
            id,
            endpoint: PostEndpoint::default(),
            mode: TrafficMode::default(),
            concurrency: DEFAULT_CONCURRENCY,
            total_requests: DEFAULT_TOTAL_REQUESTS,
            interval: 0.0,
            randomize_ip: false,
            suspicious_ua: false,
            token: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            seed: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|_| ConfigError::InvalidBaseUrl(self.base_url.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }

        if self.id == 0 {
            return Err(ConfigError::InvalidId);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }
        if self.total_requests == 0 {
            return Err(ConfigError::InvalidRequests);
        }
        if !self.interval.is_finite()
            || self.interval < 0.0
            || Duration::try_from_secs_f64(self.interval).is_err()
        {
            return Err(ConfigError::InvalidInterval(self.interval));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(())
    }
}

fn normalize_base_url(raw: String) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.len() == raw.len() {
        raw
    } else {
        trimmed.to_string()
    }
}
