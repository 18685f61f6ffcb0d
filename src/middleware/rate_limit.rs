use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

#[derive(Debug)]
struct Window {
    start: Instant,
    count: u32,
}

/// Fixed one-second window shared by every route it wraps.
#[derive(Clone, Debug)]
pub struct RequestBudget {
    per_second: u32,
    window: Arc<Mutex<Window>>,
}

impl RequestBudget {
    pub fn new(per_second: u32) -> Self {
        Self {
            per_second: per_second.max(1),
            window: Arc::new(Mutex::new(Window {
                start: Instant::now(),
                count: 0,
            })),
        }
    }

    fn try_acquire(&self) -> bool {
        let mut window = self
            .window
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Instant::now();
        if now.duration_since(window.start) >= Duration::from_secs(1) {
            window.start = now;
            window.count = 0;
        }
        if window.count < self.per_second {
            window.count += 1;
            true
        } else {
            false
        }
    }
}

pub async fn limit_requests(
    State(budget): State<RequestBudget>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !budget.try_acquire() {
        warn!(path = %req.uri().path(), "Request budget exhausted");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, "1")],
            Json(json!({ "error": "Too many requests" })),
        )
            .into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_refuses_once_spent() {
        let budget = RequestBudget::new(2);
        assert!(budget.try_acquire());
        assert!(budget.try_acquire());
        assert!(!budget.try_acquire());
    }

    #[test]
    fn zero_budget_still_admits_one_request() {
        let budget = RequestBudget::new(0);
        assert!(budget.try_acquire());
        assert!(!budget.try_acquire());
    }
}
