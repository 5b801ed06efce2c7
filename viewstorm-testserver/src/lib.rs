use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use rand::seq::SliceRandom as _;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::time::Duration;

pub const PATH_POST: &str = "/api/v1/posts/{id}";
pub const PATH_POST_VIEW: &str = "/api/v1/posts/{id}/view";
pub const PATH_PACKAGE: &str = "/api/v1/packages/{id}";

/// How the test backend answers every API request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Always answer with this status.
    Fixed(u16),
    /// Pick a status uniformly at random per request.
    Random(Vec<u16>),
    /// Answer 200 for the first `allow` requests, then 429.
    Limit { allow: u64 },
    /// Never answer.
    Hang,
}

impl StatusPolicy {
    fn status_for(&self, request_index: u64) -> Option<u16> {
        match self {
            Self::Fixed(status) => Some(*status),
            Self::Random(statuses) => statuses
                .choose(&mut rand::thread_rng())
                .copied()
                .or(Some(200)),
            Self::Limit { allow } => Some(if request_index < *allow { 200 } else { 429 }),
            Self::Hang => None,
        }
    }
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self::Fixed(200)
    }
}

impl FromStr for StatusPolicy {
    type Err = String;

    /// Parses `fixed:429`, `random:200,403,429`, `limit:100` or `hang`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "hang" {
            return Ok(Self::Hang);
        }

        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid policy '{s}' (expected e.g. fixed:200)"))?;

        let parse_status = |raw: &str| -> Result<u16, String> {
            let status: u16 = raw
                .trim()
                .parse()
                .map_err(|_| format!("invalid status '{raw}'"))?;
            StatusCode::from_u16(status).map_err(|_| format!("invalid status '{raw}'"))?;
            Ok(status)
        };

        match kind {
            "fixed" => Ok(Self::Fixed(parse_status(value)?)),
            "random" => {
                let statuses = value
                    .split(',')
                    .map(parse_status)
                    .collect::<Result<Vec<_>, _>>()?;
                if statuses.is_empty() {
                    return Err("random policy needs at least one status".to_string());
                }
                Ok(Self::Random(statuses))
            }
            "limit" => {
                let allow = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid limit '{value}'"))?;
                Ok(Self::Limit { allow })
            }
            other => Err(format!("unknown policy kind '{other}'")),
        }
    }
}

/// Identity headers as the backend saw them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub user_agent: Option<String>,
    pub accept: Option<String>,
    pub authorization: Option<String>,
    pub forwarded_for: Option<String>,
    pub real_ip: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TestServerStats {
    requests_total: Arc<AtomicU64>,
    post_gets: Arc<AtomicU64>,
    post_views: Arc<AtomicU64>,
    package_gets: Arc<AtomicU64>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl TestServerStats {
    fn inc_requests_total(&self) -> u64 {
        self.requests_total.fetch_add(1, Ordering::Relaxed)
    }

    fn record(&self, seen: SeenRequest) {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(seen);
    }

    pub fn requests_total(&self) -> u64 {
        self.requests_total.load(Ordering::Relaxed)
    }

    pub fn post_gets(&self) -> u64 {
        self.post_gets.load(Ordering::Relaxed)
    }

    pub fn post_views(&self) -> u64 {
        self.post_views.load(Ordering::Relaxed)
    }

    pub fn package_gets(&self) -> u64 {
        self.package_gets.load(Ordering::Relaxed)
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[derive(Debug, Clone)]
struct AppState {
    stats: TestServerStats,
    policy: Arc<StatusPolicy>,
}

#[derive(Debug, Serialize)]
struct ApiBody {
    code: u16,
    message: &'static str,
    id: u64,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn respond(
    state: &AppState,
    method: &str,
    path: String,
    id: u64,
    headers: &HeaderMap,
) -> (StatusCode, Json<ApiBody>) {
    let index = state.stats.inc_requests_total();
    state.stats.record(SeenRequest {
        method: method.to_string(),
        path,
        user_agent: header(headers, "user-agent"),
        accept: header(headers, "accept"),
        authorization: header(headers, "authorization"),
        forwarded_for: header(headers, "x-forwarded-for"),
        real_ip: header(headers, "x-real-ip"),
    });

    let Some(status) = state.policy.status_for(index) else {
        return std::future::pending().await;
    };

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = status.canonical_reason().unwrap_or("unknown");
    (
        status,
        Json(ApiBody {
            code: status.as_u16(),
            message,
            id,
        }),
    )
}

async fn handle_post(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> (StatusCode, Json<ApiBody>) {
    state.stats.post_gets.fetch_add(1, Ordering::Relaxed);
    respond(&state, "GET", format!("/api/v1/posts/{id}"), id, &headers).await
}

async fn handle_post_view(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> (StatusCode, Json<ApiBody>) {
    state.stats.post_views.fetch_add(1, Ordering::Relaxed);
    respond(
        &state,
        "POST",
        format!("/api/v1/posts/{id}/view"),
        id,
        &headers,
    )
    .await
}

async fn handle_package(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> (StatusCode, Json<ApiBody>) {
    state.stats.package_gets.fetch_add(1, Ordering::Relaxed);
    respond(&state, "GET", format!("/api/v1/packages/{id}"), id, &headers).await
}

pub fn router(stats: TestServerStats, policy: StatusPolicy) -> Router {
    Router::new()
        .route(PATH_POST, get(handle_post))
        .route(PATH_POST_VIEW, post(handle_post_view))
        .route(PATH_PACKAGE, get(handle_package))
        .with_state(AppState {
            stats,
            policy: Arc::new(policy),
        })
}

pub struct TestServer {
    addr: SocketAddr,
    base_url: String,
    stats: TestServerStats,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    pub async fn start(policy: StatusPolicy) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let stats = TestServerStats::default();

        let app = router(stats.clone(), policy);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = serve.await;
        });

        Ok(Self {
            addr,
            base_url: format!("http://{addr}"),
            stats,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn stats(&self) -> &TestServerStats {
        &self.stats
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        // Hanging handlers keep graceful shutdown waiting forever.
        if let Some(mut task) = self.task.take()
            && tokio::time::timeout(Duration::from_millis(500), &mut task)
                .await
                .is_err()
        {
            task.abort();
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
