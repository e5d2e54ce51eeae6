// HTTP controller trait for route registration.

use axum::Router;

/// Trait for adding routes to the HTTP server. Implementors register
/// their handlers on the router and return it.
pub trait Controller: Send + Sync {
    /// Adds routes to the router.
    fn add_route(&self, router: Router) -> Router;
}
