use std::time::{Duration, Instant};

use viewstorm_http::{HttpClient, HttpRequest, HttpTransportErrorKind};

use crate::identity::Identity;
use crate::summary::Outcome;
use crate::target::Target;

/// Characters of the response body kept for diagnostics.
pub const BODY_PREVIEW_CHARS: usize = 200;

/// What one request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Status {
        status: u16,
        preview: String,
        latency: Duration,
    },
    Transport {
        kind: HttpTransportErrorKind,
        message: String,
    },
}

impl Attempt {
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Status { status, .. } => Outcome::from_status(*status),
            Self::Transport { .. } => Outcome::TransportError,
        }
    }
}

/// Per-run request settings shared by every worker.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    pub target: Target,
    pub bearer: Option<String>,
    pub timeout: Duration,
}

impl RequestTemplate {
    pub fn build(&self, identity: &Identity<'_>) -> HttpRequest {
        let mut req = HttpRequest::new(self.target.method.clone(), self.target.url.clone())
            .header("User-Agent", identity.user_agent)
            .header("Accept", "application/json")
            .timeout(self.timeout);

        if let Some(token) = &self.bearer {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        if let Some(ip) = identity.forwarded_ip {
            let ip = ip.to_string();
            req = req
                .header("X-Forwarded-For", ip.clone())
                .header("X-Real-IP", ip);
        }
        req
    }
}

/// Send one request and fold whatever happens into an [`Attempt`].
pub async fn send_one(
    client: &HttpClient,
    template: &RequestTemplate,
    identity: &Identity<'_>,
) -> Attempt {
    let req = template.build(identity);
    let started = Instant::now();

    match client.request(req).await {
        Ok(res) => {
            let latency = started.elapsed();
            let preview = res.body_preview(BODY_PREVIEW_CHARS);
            tracing::debug!(
                status = res.status,
                latency_ms = latency.as_millis() as u64,
                user_agent = identity.user_agent,
                body = %preview,
                "response"
            );
            Attempt::Status {
                status: res.status,
                preview,
                latency,
            }
        }
        Err(err) => {
            let kind = err.transport_error_kind();
            tracing::debug!(%kind, error = %err, "request failed");
            Attempt::Transport {
                kind,
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn template(method: http::Method, bearer: Option<&str>) -> RequestTemplate {
        RequestTemplate {
            target: Target {
                method,
                url: "http://127.0.0.1:1/api/v1/posts/1".to_string(),
            },
            bearer: bearer.map(str::to_string),
            timeout: Duration::from_secs(5),
        }
    }

    fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
        req.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn build_sets_identity_and_accept_headers() {
        let identity = Identity {
            user_agent: "curl/7.88.1",
            forwarded_ip: None,
        };
        let req = template(http::Method::GET, None).build(&identity);

        assert_eq!(header(&req, "user-agent"), Some("curl/7.88.1"));
        assert_eq!(header(&req, "accept"), Some("application/json"));
        assert_eq!(header(&req, "authorization"), None);
        assert_eq!(header(&req, "x-forwarded-for"), None);
        assert_eq!(req.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn build_adds_bearer_and_forwarded_ip() {
        let identity = Identity {
            user_agent: "ua",
            forwarded_ip: Some(Ipv4Addr::new(10, 2, 3, 4)),
        };
        let req = template(http::Method::POST, Some("s3cr3t")).build(&identity);

        assert_eq!(req.method, http::Method::POST);
        assert_eq!(header(&req, "authorization"), Some("Bearer s3cr3t"));
        assert_eq!(header(&req, "x-forwarded-for"), Some("10.2.3.4"));
        assert_eq!(header(&req, "x-real-ip"), Some("10.2.3.4"));
    }

    #[test]
    fn outcome_of_attempts() {
        let ok = Attempt::Status {
            status: 429,
            preview: String::new(),
            latency: Duration::ZERO,
        };
        assert_eq!(ok.outcome(), Outcome::Blocked);

        let failed = Attempt::Transport {
            kind: HttpTransportErrorKind::Timeout,
            message: "timed out".to_string(),
        };
        assert_eq!(failed.outcome(), Outcome::TransportError);
    }
}
