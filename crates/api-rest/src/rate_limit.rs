//! Per-client request throttling for the `/api/` routes.

use crate::{ApiError, AppState};
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::time::Duration;

/// Requests a client may make per window.
pub const MAX_REQUESTS_PER_WINDOW: u32 = 100;
/// Length of the rate-limit window.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(15 * 60);

const API_PREFIX: &str = "/api/";

/// Token-bucket limiter keyed by client IP: a full bucket allows `max_requests` at once and
/// refills evenly over `window`.
pub struct ApiRateLimiter {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
}

impl ApiRateLimiter {
    pub fn new(max_requests: NonZeroU32, window: Duration) -> Self {
        let quota = Quota::with_period(window / max_requests.get())
            .unwrap_or_else(|| Quota::per_second(max_requests))
            .allow_burst(max_requests);
        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    /// Records a request from `client`; false once its allowance is spent.
    pub fn check(&self, client: IpAddr) -> bool {
        self.limiter.check_key(&client).is_ok()
    }
}

impl Default for ApiRateLimiter {
    fn default() -> Self {
        Self::new(
            NonZeroU32::new(MAX_REQUESTS_PER_WINDOW).unwrap_or(NonZeroU32::MIN),
            RATE_LIMIT_WINDOW,
        )
    }
}

impl std::fmt::Debug for ApiRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRateLimiter").finish_non_exhaustive()
    }
}

/// Middleware rejecting `/api/` requests with 429 once the client's allowance is spent.
///
/// Clients are told apart by peer address; without connection info (in-process calls) all
/// requests share one allowance.
pub async fn limit_api_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !request.uri().path().starts_with(API_PREFIX) {
        return next.run(request).await;
    }

    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if state.rate_limiter.check(client) {
        next.run(request).await
    } else {
        tracing::warn!(%client, path = %request.uri().path(), "rate limit exceeded");
        ApiError::TooManyRequests.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowance_is_per_client() {
        let limiter = ApiRateLimiter::new(
            NonZeroU32::new(3).expect("non-zero"),
            Duration::from_secs(60),
        );
        let a = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let b = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        assert!((0..3).all(|_| limiter.check(a)));
        assert!(!limiter.check(a));
        assert!(limiter.check(b));
    }
}
