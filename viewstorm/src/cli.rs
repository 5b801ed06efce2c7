use std::time::Duration;

use clap::Parser;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use strum::VariantNames as _;
use viewstorm_core::{PostEndpoint, RunConfig, TargetKind, TrafficMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Start banner, progress bar and a tabulated summary.
    HumanReadable,
    /// Emit a start line and a summary line (NDJSON) to stdout.
    Json,
}

fn target_kind_parser() -> impl TypedValueParser<Value = TargetKind> {
    PossibleValuesParser::new(TargetKind::VARIANTS).try_map(|s| TargetKind::parse(&s))
}

fn traffic_mode_parser() -> impl TypedValueParser<Value = TrafficMode> {
    PossibleValuesParser::new(TrafficMode::VARIANTS).try_map(|s| TrafficMode::parse(&s))
}

fn post_endpoint_parser() -> impl TypedValueParser<Value = PostEndpoint> {
    PossibleValuesParser::new(PostEndpoint::VARIANTS).try_map(|s| PostEndpoint::parse(&s))
}

#[derive(Debug, Parser)]
#[command(
    name = "viewstorm",
    author,
    version,
    about = "Concurrent HTTP traffic generator for testing anti-abuse defenses",
    long_about = "viewstorm hammers a post or package endpoint with a named traffic pattern and reports how the backend answered.\n\nEvery request carries a randomized user agent, and optionally a spoofed X-Forwarded-For/X-Real-IP address and a bearer token. Responses are classified as success, blocked (403/429), not found, unauthorized, transport error or other.\n\nOnly point it at backends you are allowed to test.",
    after_help = "Examples:\n  viewstorm --type post --id 123 --mode burst --concurrency 50 --requests 1000 --suspicious-ua\n  viewstorm --type package --id 456 --mode drip --interval 1.0 --requests 200 --concurrency 5\n  viewstorm --type post --id 1 --mode mixed --requests 500 --concurrency 20 --xff --suspicious-ua\n  viewstorm --type post --id 1 --endpoint view --token \"$TOKEN\" --output json"
)]
pub struct Cli {
    /// Backend base URL
    #[arg(long, env = "VIEWSTORM_BASE_URL", default_value = viewstorm_core::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Target entity type
    #[arg(long = "type", value_name = "TYPE", value_parser = target_kind_parser())]
    pub target: TargetKind,

    /// Target entity id
    #[arg(long)]
    pub id: u64,

    /// Traffic pattern
    #[arg(long, value_parser = traffic_mode_parser(), default_value_t = TrafficMode::Burst)]
    pub mode: TrafficMode,

    /// Number of concurrent workers
    #[arg(long, default_value_t = viewstorm_core::DEFAULT_CONCURRENCY)]
    pub concurrency: u64,

    /// Total number of requests, split evenly across workers
    #[arg(long = "requests", default_value_t = viewstorm_core::DEFAULT_TOTAL_REQUESTS)]
    pub total_requests: u64,

    /// Seconds between two requests of one worker (used by drip, bot and mixed)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub interval: f64,

    /// Send a random X-Forwarded-For/X-Real-IP address with every request
    #[arg(long)]
    pub xff: bool,

    /// Only use tool and crawler user agents
    #[arg(long)]
    pub suspicious_ua: bool,

    /// Bearer token sent as `Authorization: Bearer <TOKEN>`
    #[arg(long, env = "VIEWSTORM_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Post endpoint: `get` fetches the post, `view` posts a view. Ignored for packages.
    #[arg(long, value_parser = post_endpoint_parser(), default_value_t = PostEndpoint::Get)]
    pub endpoint: PostEndpoint,

    /// Per-request timeout (e.g. 20s, 1500ms)
    #[arg(long, value_parser = humantime::parse_duration, default_value = "20s")]
    pub timeout: Duration,

    /// Seed for user-agent and address sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::HumanReadable)]
    pub output: OutputFormat,

    /// Log verbosity on stderr (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn run_config(&self) -> RunConfig {
        let mut cfg = RunConfig::new(self.base_url.clone(), self.target, self.id);
        cfg.endpoint = self.endpoint;
        cfg.mode = self.mode;
        cfg.concurrency = self.concurrency;
        cfg.total_requests = self.total_requests;
        cfg.interval = self.interval;
        cfg.randomize_ip = self.xff;
        cfg.suspicious_ua = self.suspicious_ua;
        cfg.token = self.token.clone().filter(|t| !t.is_empty());
        cfg.request_timeout = self.timeout;
        cfg.seed = self.seed;
        cfg
    }
}
