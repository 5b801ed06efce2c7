use std::net::Ipv4Addr;
use std::sync::Arc;

use rand::Rng;

use crate::config::{ConfigError, RunConfig, TrafficMode};

const NORMAL_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_5_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Safari/605.1.15",
    "Mozilla/5.0 (Linux; Android 12; Pixel 5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.5993.80 Mobile Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1",
];

const SUSPICIOUS_USER_AGENTS: &[&str] = &[
    "curl/7.88.1",
    "Wget/1.21.3",
    "python-requests/2.31.0",
    "Scrapy/2.8.0 (+https://scrapy.org)",
    "Go-http-client/1.1",
    "Java/1.8.0",
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
];

/// User-agent pools sampled by [`IdentityRandomizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityPools {
    normal: Vec<String>,
    suspicious: Vec<String>,
}

impl Default for IdentityPools {
    fn default() -> Self {
        Self {
            normal: NORMAL_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
            suspicious: SUSPICIOUS_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl IdentityPools {
    pub fn new(normal: Vec<String>, suspicious: Vec<String>) -> Result<Self, ConfigError> {
        if normal.is_empty() {
            return Err(ConfigError::EmptyPool("normal"));
        }
        if suspicious.is_empty() {
            return Err(ConfigError::EmptyPool("suspicious"));
        }
        Ok(Self { normal, suspicious })
    }

    pub fn normal(&self) -> &[String] {
        &self.normal
    }

    pub fn suspicious(&self) -> &[String] {
        &self.suspicious
    }

    pub fn is_suspicious(&self, user_agent: &str) -> bool {
        self.suspicious.iter().any(|ua| ua == user_agent)
    }
}

/// Which pool(s) user agents come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UaPolicy {
    Normal,
    Suspicious,
    /// Union of both pools.
    Blended,
}

impl UaPolicy {
    pub fn for_run(suspicious_ua: bool, mode: TrafficMode) -> Self {
        if suspicious_ua {
            Self::Suspicious
        } else if mode == TrafficMode::Mixed {
            Self::Blended
        } else {
            Self::Normal
        }
    }
}

/// Spoofed identity attached to one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity<'a> {
    pub user_agent: &'a str,
    pub forwarded_ip: Option<Ipv4Addr>,
}

/// Draws per-request identities. Holds no RNG; each worker brings its own.
#[derive(Debug, Clone)]
pub struct IdentityRandomizer {
    pools: Arc<IdentityPools>,
    policy: UaPolicy,
    randomize_ip: bool,
}

impl IdentityRandomizer {
    pub fn new(pools: Arc<IdentityPools>, policy: UaPolicy, randomize_ip: bool) -> Self {
        Self {
            pools,
            policy,
            randomize_ip,
        }
    }

    pub fn for_config(pools: Arc<IdentityPools>, cfg: &RunConfig) -> Self {
        Self::new(
            pools,
            UaPolicy::for_run(cfg.suspicious_ua, cfg.mode),
            cfg.randomize_ip,
        )
    }

    pub fn policy(&self) -> UaPolicy {
        self.policy
    }

    pub fn user_agent<R: Rng>(&self, rng: &mut R) -> &str {
        let normal = &self.pools.normal;
        let suspicious = &self.pools.suspicious;
        match self.policy {
            UaPolicy::Normal => &normal[rng.gen_range(0..normal.len())],
            UaPolicy::Suspicious => &suspicious[rng.gen_range(0..suspicious.len())],
            UaPolicy::Blended => {
                let idx = rng.gen_range(0..normal.len() + suspicious.len());
                match normal.get(idx) {
                    Some(ua) => ua,
                    None => &suspicious[idx - normal.len()],
                }
            }
        }
    }

    pub fn identity<R: Rng>(&self, rng: &mut R) -> Identity<'_> {
        let user_agent = self.user_agent(rng);
        let forwarded_ip = self.randomize_ip.then(|| random_ipv4(rng));
        Identity {
            user_agent,
            forwarded_ip,
        }
    }
}

/// Dotted quad with every octet in `2..=254`.
pub fn random_ipv4<R: Rng>(rng: &mut R) -> Ipv4Addr {
    Ipv4Addr::new(
        rng.gen_range(2..=254),
        rng.gen_range(2..=254),
        rng.gen_range(2..=254),
        rng.gen_range(2..=254),
    )
}
