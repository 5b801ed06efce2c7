use crate::config::{PostEndpoint, RunConfig, TargetKind};

/// Concrete request line for a run. Identical for every attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub method: http::Method,
    pub url: String,
}

impl Target {
    pub fn resolve(base_url: &str, kind: TargetKind, id: u64, endpoint: PostEndpoint) -> Self {
        match (kind, endpoint) {
            (TargetKind::Package, _) => Self {
                method: http::Method::GET,
                url: format!("{base_url}/api/v1/packages/{id}"),
            },
            (TargetKind::Post, PostEndpoint::Get) => Self {
                method: http::Method::GET,
                url: format!("{base_url}/api/v1/posts/{id}"),
            },
            (TargetKind::Post, PostEndpoint::View) => Self {
                method: http::Method::POST,
                url: format!("{base_url}/api/v1/posts/{id}/view"),
            },
        }
    }

    pub fn for_config(cfg: &RunConfig) -> Self {
        Self::resolve(&cfg.base_url, cfg.target, cfg.id, cfg.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://127.0.0.1:15201";

    #[test]
    fn post_get_fetches_the_post() {
        let t = Target::resolve(BASE, TargetKind::Post, 42, PostEndpoint::Get);
        assert_eq!(t.method, http::Method::GET);
        assert_eq!(t.url, "http://127.0.0.1:15201/api/v1/posts/42");
    }

    #[test]
    fn post_view_posts_to_the_view_counter() {
        let t = Target::resolve(BASE, TargetKind::Post, 42, PostEndpoint::View);
        assert_eq!(t.method, http::Method::POST);
        assert_eq!(t.url, "http://127.0.0.1:15201/api/v1/posts/42/view");
    }

    #[test]
    fn package_ignores_the_endpoint_variant() {
        for endpoint in [PostEndpoint::Get, PostEndpoint::View] {
            let t = Target::resolve(BASE, TargetKind::Package, 7, endpoint);
            assert_eq!(t.method, http::Method::GET);
            assert_eq!(t.url, "http://127.0.0.1:15201/api/v1/packages/7");
        }
    }

    #[test]
    fn for_config_uses_the_normalized_base_url() {
        let mut cfg = RunConfig::new("https://api.example.com/", TargetKind::Post, 3);
        cfg.endpoint = PostEndpoint::View;
        let t = Target::for_config(&cfg);
        assert_eq!(t.url, "https://api.example.com/api/v1/posts/3/view");
    }
}
