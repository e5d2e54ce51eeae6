// Middleware interface for HTTP request/response processing.

use axum::Router;

/// Middleware trait: wraps the router with a processing layer.
pub trait Middleware: Send + Sync {
    /// Applies the middleware to the router.
    fn apply(&self, router: Router) -> Router;
}
