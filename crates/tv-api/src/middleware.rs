//! twinview/crates/tv-api/src/middleware.rs Middleware
//!
//! Request logging, CORS and response headers for the TwinView API.

use actix_cors::Cors;
use actix_web::http::header::HeaderValue;
use actix_web::middleware::{DefaultHeaders, Logger};

/// Access log in the form:
/// remote-ip "request-line" status-code response-size duration
pub fn standard_middleware() -> Logger {
    Logger::new("%a \"%r\" %s %b %Dms")
}

/// The UI is served from the same process, so only loopback origins are allowed.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allowed_origin_fn(|origin, _head| is_loopback_origin(origin))
        .allowed_methods(vec!["GET", "POST"])
        .max_age(3600)
}

pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("Referrer-Policy", "same-origin"))
}

fn is_loopback_origin(origin: &HeaderValue) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    let host = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
        .unwrap_or_default();
    let host = match host.rsplit_once(':') {
        Some((h, port)) if port.bytes().all(|b| b.is_ascii_digit()) => h,
        _ => host,
    };
    matches!(host, "localhost" | "127.0.0.1" | "[::1]")
}
