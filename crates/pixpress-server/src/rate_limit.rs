//! Per-client request limiting for uploads.
//!
//! The [`RateLimit`] middleware counts `POST` requests per client key in a
//! [`CounterStore`] and answers `429 Too Many Requests` with a `Retry-After`
//! header once a client exceeds its allowance for the current window. Other
//! methods pass through uncounted.
//!
//! Clients are keyed by peer IP. `X-Forwarded-For` is client-controlled, so it
//! is only consulted when the limiter is told the server sits behind a proxy
//! that sets it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use poem::http::{Method, StatusCode};
use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};
use tracing::warn;

/// Entries are swept for expired windows once the map grows past this.
const PURGE_THRESHOLD: usize = 1024;

/// Count for a key after an increment, and when its window resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterHit {
    pub count: u32,
    pub reset_at: Instant,
}

/// Keyed counter backing the rate limiter.
pub trait CounterStore: Send + Sync {
    fn increment(&self, key: &str) -> CounterHit;
}

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window counters held in process memory.
///
/// Each key gets a window starting at its first hit. A hit after the window
/// has ended starts a fresh one. Counts are not shared between processes.
#[derive(Debug)]
pub struct InMemoryCounterStore {
    window: Duration,
    entries: Mutex<HashMap<String, WindowEntry>>,
}

impl InMemoryCounterStore {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Increment `key` as if the request arrived at `now`.
    pub fn increment_at(&self, key: &str, now: Instant) -> CounterHit {
        let mut entries = self.entries.lock();

        if entries.len() >= PURGE_THRESHOLD {
            entries.retain(|_, entry| entry.reset_at > now);
        }

        let window = self.window;
        let entry = entries.entry(key.to_string()).or_insert(WindowEntry {
            count: 0,
            reset_at: now + window,
        });

        if entry.reset_at <= now {
            *entry = WindowEntry {
                count: 0,
                reset_at: now + window,
            };
        }

        entry.count = entry.count.saturating_add(1);
        CounterHit {
            count: entry.count,
            reset_at: entry.reset_at,
        }
    }

    /// Number of tracked keys, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CounterStore for InMemoryCounterStore {
    fn increment(&self, key: &str) -> CounterHit {
        self.increment_at(key, Instant::now())
    }
}

/// Middleware that rejects clients over `max_requests` per window.
pub struct RateLimit<S> {
    store: Arc<S>,
    max_requests: u32,
    trust_forwarded_for: bool,
}

impl<S: CounterStore> RateLimit<S> {
    pub fn new(store: Arc<S>, max_requests: u32) -> Self {
        Self {
            store,
            max_requests,
            trust_forwarded_for: false,
        }
    }

    /// Key clients by the first `X-Forwarded-For` entry when present.
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }
}

impl<E: Endpoint, S: CounterStore + 'static> Middleware<E> for RateLimit<S> {
    type Output = RateLimitEndpoint<E, S>;

    fn transform(&self, ep: E) -> Self::Output {
        RateLimitEndpoint {
            inner: ep,
            store: self.store.clone(),
            max_requests: self.max_requests,
            trust_forwarded_for: self.trust_forwarded_for,
        }
    }
}

pub struct RateLimitEndpoint<E, S> {
    inner: E,
    store: Arc<S>,
    max_requests: u32,
    trust_forwarded_for: bool,
}

impl<E: Endpoint, S: CounterStore + 'static> Endpoint for RateLimitEndpoint<E, S> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        if req.method() != Method::POST {
            return self.inner.call(req).await.map(IntoResponse::into_response);
        }

        let key = client_key(&req, self.trust_forwarded_for);
        let hit = self.store.increment(&key);

        if hit.count > self.max_requests {
            let retry_after = hit
                .reset_at
                .saturating_duration_since(Instant::now())
                .as_secs()
                .max(1);
            warn!(client = %key, count = hit.count, retry_after, "rate limit exceeded");
            return Ok(too_many_requests(retry_after));
        }

        self.inner.call(req).await.map(IntoResponse::into_response)
    }
}

/// Peer IP, or the first `X-Forwarded-For` entry when `trust_forwarded_for`
/// is set and the header is present. `unknown` without either.
pub fn client_key(req: &Request, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    req.remote_addr()
        .as_socket_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn too_many_requests(retry_after: u64) -> Response {
    let body = serde_json::json!({
        "error": "Too many requests, please try again later",
    });

    Response::builder()
        .status(StatusCode::TOO_MANY_REQUESTS)
        .header("Retry-After", retry_after)
        .content_type("application/json")
        .body(body.to_string())
}
