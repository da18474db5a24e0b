//! Per-client limiter for `/chat` (GCRA).
//!
//! Each client IP keeps a single timestamp, the theoretical arrival time of
//! its next request. A request is admitted while that time is no further
//! ahead than the burst tolerance, and admitting it pushes the time one
//! emission interval later.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::config::ProxyConfig;
use crate::error::ProxyError;

#[derive(Clone)]
pub struct RateLimiter {
    arrivals: Arc<Mutex<HashMap<IpAddr, Instant>>>,
    interval: Duration,
    tolerance: Duration,
}

impl RateLimiter {
    /// `per_sec` sustained requests, `burst` of them back to back.
    pub fn new(per_sec: f64, burst: f64) -> Self {
        let interval = Duration::from_secs_f64(1.0 / per_sec.max(1e-6));
        Self {
            arrivals: Arc::default(),
            interval,
            tolerance: interval.mul_f64(burst.max(1.0) - 1.0),
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        Self::new(config.rate_per_sec, config.rate_burst)
    }

    /// Admit one request from `ip`, or say how long it has to wait.
    pub fn admit(&self, ip: IpAddr) -> Result<(), Duration> {
        self.admit_at(ip, Instant::now())
    }

    fn admit_at(&self, ip: IpAddr, now: Instant) -> Result<(), Duration> {
        let mut arrivals = self.arrivals();
        let tat = arrivals.get(&ip).map_or(now, |&t| t.max(now));
        let ahead = tat - now;
        if ahead > self.tolerance {
            return Err(ahead - self.tolerance);
        }
        arrivals.insert(ip, tat + self.interval);
        Ok(())
    }

    /// Forget clients whose allowance has fully come back.
    pub fn purge_recovered(&self) -> usize {
        let now = Instant::now();
        let mut arrivals = self.arrivals();
        let before = arrivals.len();
        arrivals.retain(|_, tat| *tat > now);
        before - arrivals.len()
    }

    fn arrivals(&self) -> MutexGuard<'_, HashMap<IpAddr, Instant>> {
        self.arrivals.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Route layer for `/chat`; answers 429 with `Retry-After` once a client
/// runs out of allowance.
pub async fn limit_chat(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Result<Response, ProxyError> {
    let ip = client_ip(&req);
    if let Err(wait) = limiter.admit(ip) {
        warn!(ip = %ip, wait_ms = wait.as_millis() as u64, "Chat rate limit exceeded");
        return Err(ProxyError::RateLimited {
            retry_after_secs: whole_secs(wait),
        });
    }
    Ok(next.run(req).await)
}

fn whole_secs(wait: Duration) -> u64 {
    (wait.as_secs() + u64::from(wait.subsec_nanos() > 0)).max(1)
}

/// Socket peer, else the first `X-Forwarded-For` hop, else `X-Real-IP`.
/// Requests with no usable address share one allowance.
fn client_ip<B>(req: &axum::http::Request<B>) -> IpAddr {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .or_else(|| forwarded_ip(req.headers()))
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let value = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    value("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .or_else(|| value("x-real-ip"))
        .and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn burst_then_wait() {
        let limiter = RateLimiter::new(1.0, 3.0);
        let t0 = Instant::now();
        let a = ip("127.0.0.1");

        for _ in 0..3 {
            assert!(limiter.admit_at(a, t0).is_ok());
        }
        assert_eq!(limiter.admit_at(a, t0), Err(Duration::from_secs(1)));
        // one interval later exactly one more request fits
        let t1 = t0 + Duration::from_secs(1);
        assert!(limiter.admit_at(a, t1).is_ok());
        assert!(limiter.admit_at(a, t1).is_err());
    }

    #[test]
    fn clients_are_independent() {
        let limiter = RateLimiter::new(0.001, 1.0);
        let t0 = Instant::now();

        assert!(limiter.admit_at(ip("10.0.0.1"), t0).is_ok());
        assert!(limiter.admit_at(ip("10.0.0.1"), t0).is_err());
        assert!(limiter.admit_at(ip("10.0.0.2"), t0).is_ok());
    }

    #[test]
    fn config_sets_rate_and_burst() {
        let limiter = RateLimiter::from_config(&ProxyConfig {
            rate_per_sec: 4.0,
            rate_burst: 2.0,
            ..ProxyConfig::default()
        });
        assert_eq!(limiter.interval, Duration::from_millis(250));
        assert_eq!(limiter.tolerance, Duration::from_millis(250));
    }

    #[test]
    fn purge_drops_recovered_clients_only() {
        let limiter = RateLimiter::new(0.001, 1.0);
        let now = Instant::now();
        limiter.admit_at(ip("192.168.1.1"), now).unwrap();
        limiter
            .arrivals()
            .insert(ip("192.168.1.2"), now - Duration::from_secs(1));

        assert_eq!(limiter.purge_recovered(), 1);
        assert!(limiter.arrivals().contains_key(&ip("192.168.1.1")));
    }

    #[test]
    fn retry_after_rounds_up() {
        assert_eq!(whole_secs(Duration::from_millis(1)), 1);
        assert_eq!(whole_secs(Duration::from_millis(2500)), 3);
        assert_eq!(whole_secs(Duration::from_secs(4)), 4);
    }

    #[test]
    fn client_ip_from_headers() {
        let req = axum::http::Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(())
            .unwrap();
        assert_eq!(client_ip(&req), ip("203.0.113.7"));

        let req = axum::http::Request::builder()
            .header("x-real-ip", "198.51.100.2")
            .body(())
            .unwrap();
        assert_eq!(client_ip(&req), ip("198.51.100.2"));

        let req = axum::http::Request::builder().body(()).unwrap();
        assert_eq!(client_ip(&req), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
}
