//! Per-route request throttling. A window counter keyed by client address and
//! route path: each (ip, route) pair gets an independent window that resets
//! once its duration elapses. Rejections never reach the handlers.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<(IpAddr, String), Window>>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    /// Counts one request for `(ip, route)`. Returns `Ok(())` when admitted,
    /// or the seconds until the window resets when over the limit.
    pub async fn check(&self, ip: IpAddr, route: &str) -> Result<(), u64> {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();

        match windows.get_mut(&(ip, route.to_string())) {
            Some(win) if now.duration_since(win.started) < self.window => {
                if win.count >= self.max_requests {
                    let remaining = self.window - now.duration_since(win.started);
                    return Err(remaining.as_secs().max(1));
                }
                win.count += 1;
            }
            _ => {
                windows.insert(
                    (ip, route.to_string()),
                    Window {
                        count: 1,
                        started: now,
                    },
                );
            }
        }
        Ok(())
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(ip) = client_ip(&req) else {
        return next.run(req).await;
    };

    match limiter.check(ip, req.uri().path()).await {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            warn!(ip = %ip, path = %req.uri().path(), "Rate limit exceeded");
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after.to_string())],
                Json(json!({
                    "error": { "code": "RATE_LIMITED", "message": "Too many requests" }
                })),
            )
                .into_response()
        }
    }
}

/// Try ConnectInfo first, then X-Forwarded-For, then X-Real-IP.
fn client_ip(req: &Request<Body>) -> Option<IpAddr> {
    if let Some(connect_info) = req.extensions().get::<ConnectInfo<std::net::SocketAddr>>() {
        return Some(connect_info.0.ip());
    }

    if let Some(forwarded) = req.headers().get("x-forwarded-for") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(first) = value.split(',').next() {
                if let Ok(ip) = first.trim().parse::<IpAddr>() {
                    return Some(ip);
                }
            }
        }
    }

    if let Some(real_ip) = req.headers().get("x-real-ip") {
        if let Ok(value) = real_ip.to_str() {
            if let Ok(ip) = value.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limiter_admits_up_to_max_then_rejects() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let ip: IpAddr = "127.0.0.1".parse().unwrap();

        for _ in 0..3 {
            assert!(limiter.check(ip, "/api/auth/login").await.is_ok());
        }

        let retry_after = limiter.check(ip, "/api/auth/login").await.unwrap_err();
        assert!(retry_after >= 1);
    }

    #[tokio::test]
    async fn test_routes_are_counted_independently() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let ip: IpAddr = "10.0.0.1".parse().unwrap();

        assert!(limiter.check(ip, "/api/auth/login").await.is_ok());
        assert!(limiter.check(ip, "/api/auth/login").await.is_err());
        assert!(limiter.check(ip, "/api/auth/register").await.is_ok());
    }

    #[tokio::test]
    async fn test_clients_are_counted_independently() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let first: IpAddr = "10.0.0.1".parse().unwrap();
        let second: IpAddr = "10.0.0.2".parse().unwrap();

        assert!(limiter.check(first, "/api/insights/job").await.is_ok());
        assert!(limiter.check(first, "/api/insights/job").await.is_err());
        assert!(limiter.check(second, "/api/insights/job").await.is_ok());
    }

    #[tokio::test]
    async fn test_window_resets_after_elapse() {
        let limiter = RateLimiter::new(1, Duration::from_millis(10));
        let ip: IpAddr = "192.168.1.1".parse().unwrap();

        assert!(limiter.check(ip, "/api/insights/job").await.is_ok());
        assert!(limiter.check(ip, "/api/insights/job").await.is_err());

        std::thread::sleep(Duration::from_millis(20));
        assert!(limiter.check(ip, "/api/insights/job").await.is_ok());
    }
}
