use std::{
    env,
    net::{IpAddr, Ipv4Addr},
    time::{Duration, Instant},
};

use dashmap::DashMap;
use rocket::request::{self, FromRequest, Request};

use crate::error::ApiError;

#[derive(Debug)]
pub struct TokenBucket {
    last_refill: Instant,
    tokens: u32,
    capacity: u32,
    refill_rate: u32,
    refill_interval: Duration,
}

impl TokenBucket {
    fn new(capacity: u32, refill_rate: u32, refill_interval: Duration) -> Self {
        Self {
            last_refill: Instant::now(),
            tokens: capacity,
            capacity,
            refill_rate,
            refill_interval,
        }
    }

    fn try_consume(&mut self) -> bool {
        self.refill();
        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill);
        let intervals = elapsed.as_millis() / self.refill_interval.as_millis().max(1);

        if intervals > 0 {
            let intervals = u32::try_from(intervals).unwrap_or(u32::MAX);
            let tokens_to_add = intervals.saturating_mul(self.refill_rate);
            self.tokens = self.tokens.saturating_add(tokens_to_add).min(self.capacity);
            self.last_refill = now;
        }
    }
}

pub type RateLimiter = DashMap<IpAddr, TokenBucket>;

pub fn create_rate_limiter() -> RateLimiter {
    DashMap::new()
}

/// Whether `X-Forwarded-For` / `X-Real-IP` come from a proxy we control.
/// Off unless `TRUST_PROXY_HEADERS` is set, so clients cannot pick their own address.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustProxyHeaders(pub bool);

impl TrustProxyHeaders {
    pub fn from_env() -> Self {
        let trusted = env::var("TRUST_PROXY_HEADERS")
            .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self(trusted)
    }
}

#[derive(Debug)]
pub struct ClientIp(pub IpAddr);

fn forwarded_ip(req: &Request<'_>) -> Option<IpAddr> {
    req.headers()
        .get_one("X-Forwarded-For")
        .and_then(|header| header.split(',').next())
        .and_then(|ip| ip.trim().parse().ok())
        .or_else(|| {
            req.headers()
                .get_one("X-Real-IP")
                .and_then(|ip| ip.trim().parse().ok())
        })
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientIp {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let trusted = req
            .rocket()
            .state::<TrustProxyHeaders>()
            .is_some_and(|trust| trust.0);

        let ip = trusted
            .then(|| forwarded_ip(req))
            .flatten()
            .or_else(|| req.remote().map(|remote| remote.ip()))
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

        request::Outcome::Success(ClientIp(ip))
    }
}

pub fn check_rate_limit(rate_limiter: &RateLimiter, client_ip: &ClientIp) -> Result<(), ApiError> {
    let capacity: u32 = env::var("RATE_LIMIT_GAMES_PER_MINUTE")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .unwrap_or(10);

    let refill_interval = Duration::from_secs(60);
    let refill_rate = capacity; // Refill to full capacity every minute

    let mut entry = rate_limiter
        .entry(client_ip.0)
        .or_insert_with(|| TokenBucket::new(capacity, refill_rate, refill_interval));

    if entry.try_consume() {
        Ok(())
    } else {
        Err(ApiError::RateLimited)
    }
}
