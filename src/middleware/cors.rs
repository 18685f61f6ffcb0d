use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// The console is a single-user API; any local client may call it.
pub fn console_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(Any)
}
