//! Panic recovery middleware.
//

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::body::Body;
use axum::http::{header, HeaderValue, Response};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

/// Global panic counter.
static PANICS_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Gets the current panic counter value.
pub fn panics_counter() -> u64 {
    PANICS_COUNTER.load(Ordering::Relaxed)
}

/// PanicRecoverMiddleware converts a panicking handler into the uniform
/// exception envelope instead of tearing down the connection, keeping the
/// serving loop alive. Outermost layer of the stack.
pub struct PanicRecoverMiddleware;

impl PanicRecoverMiddleware {
    /// Creates a new panic recovery middleware.
    pub fn new() -> Self {
        Self
    }
}

impl Default for PanicRecoverMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the 200 + ERROR envelope for a caught panic payload.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    PANICS_COUNTER.fetch_add(1, Ordering::Relaxed);

    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "panic".to_string()
    };

    error!(
        component = "middleware",
        event = "panic_recovered",
        detail = %detail,
        "handler panicked"
    );

    let mut body = serde_json::json!({
        "result": "ERROR",
        "reason": "Exception thrown",
        "exception": detail,
    })
    .to_string();
    body.push('\n');

    let mut response = Response::new(Body::from(body));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

impl crate::middleware::middleware::Middleware for PanicRecoverMiddleware {
    fn apply(&self, router: axum::Router) -> axum::Router {
        router.layer(CatchPanicLayer::custom(handle_panic))
    }
}
