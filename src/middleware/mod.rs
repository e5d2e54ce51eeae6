// HTTP middlewares: panic recovery.

pub mod middleware;
pub mod recover_middleware;


pub use middleware::Middleware;
pub use recover_middleware::{panics_counter, PanicRecoverMiddleware};
