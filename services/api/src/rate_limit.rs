use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

const MAX_TRACKED_CLIENTS: usize = 10_000;

/// Fixed-window request ceiling per client IP.
#[derive(Clone)]
pub struct RateLimiter {
    max: u32,
    period: Duration,
    max_clients: usize,
    state: Arc<Mutex<Windows>>,
}

struct Windows {
    by_client: HashMap<Option<IpAddr>, Window>,
    last_sweep: Instant,
}

struct Window {
    started: Instant,
    count: u32,
}

impl RateLimiter {
    pub fn new(max: u32, period: Duration) -> Self {
        Self::with_max_clients(max, period, MAX_TRACKED_CLIENTS)
    }

    pub fn per_minute(max: u32) -> Self {
        Self::new(max, Duration::from_secs(60))
    }

    fn with_max_clients(max: u32, period: Duration, max_clients: usize) -> Self {
        Self {
            max,
            period,
            max_clients: max_clients.max(1),
            state: Arc::new(Mutex::new(Windows {
                by_client: HashMap::new(),
                last_sweep: Instant::now(),
            })),
        }
    }

    /// Count one request from `client`; false once its window is full.
    pub fn try_acquire(&self, client: Option<IpAddr>) -> bool {
        let now = Instant::now();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        // Expired windows go at most once per period
        if now.duration_since(state.last_sweep) >= self.period {
            state
                .by_client
                .retain(|_, w| now.duration_since(w.started) < self.period);
            state.last_sweep = now;
        }

        if !state.by_client.contains_key(&client) && state.by_client.len() >= self.max_clients {
            let oldest = state
                .by_client
                .iter()
                .min_by_key(|(_, w)| w.started)
                .map(|(key, _)| *key);
            if let Some(key) = oldest {
                state.by_client.remove(&key);
            }
        }

        let window = state.by_client.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(window.started) >= self.period {
            window.started = now;
            window.count = 0;
        }
        if window.count >= self.max {
            return false;
        }
        window.count += 1;
        true
    }
}

pub async fn enforce(State(limiter): State<RateLimiter>, request: Request, next: Next) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    if !limiter.try_acquire(client) {
        tracing::warn!(?client, "rate limit exceeded");
        let body = serde_json::json!({ "error": "Too many requests" });
        return (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    }

    next.run(request).await
}
