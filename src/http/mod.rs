// HTTP module: server plus re-exported controller/middleware seams.

pub mod server;

pub use crate::controller::Controller;
pub use crate::middleware::Middleware;
pub use server::server::{HttpServer, Server};
