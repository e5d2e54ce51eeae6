// Supervisor application wiring.

use anyhow::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::controller::{CommandController, Controller};
use crate::dispatch::CommandDispatcher;
use crate::http::{HttpServer, Middleware, Server};
use crate::manager::ProcessManager;
use crate::middleware::PanicRecoverMiddleware;
use crate::registry::ServiceRegistry;
use crate::shutdown::GracefulShutdown;

/// Encapsulates the whole supervisor: registry, manager, dispatcher and
/// the HTTP front-end. The manager is an explicitly constructed instance
/// handed to the transport by reference, never a module-level global.
pub struct App {
    shutdown_token: CancellationToken,
    manager: Arc<ProcessManager>,
    server: Arc<dyn Server>,
}

impl App {
    /// Creates a new supervisor application instance. Loads the service
    /// catalog (a missing or malformed file leaves it empty) and wires the
    /// command pipeline into the HTTP server.
    pub fn new(shutdown_token: CancellationToken, cfg: &Config) -> Result<Self> {
        let mut registry = ServiceRegistry::new();
        registry.load(&cfg.services_path);
        if registry.is_empty() {
            info!(
                component = "app",
                event = "no_services",
                path = %cfg.services_path.display(),
                "running with zero services"
            );
        }

        let manager = Arc::new(ProcessManager::new(registry));
        let dispatcher = Arc::new(CommandDispatcher::new(manager.clone()));

        let controllers: Vec<Box<dyn Controller>> =
            vec![Box::new(CommandController::new(dispatcher))];
        let middlewares: Vec<Box<dyn Middleware>> =
            vec![Box::new(PanicRecoverMiddleware::new())];

        let server = HttpServer::new(shutdown_token.clone(), cfg.port, controllers, middlewares)?;

        Ok(Self {
            shutdown_token,
            manager,
            server: Arc::new(server) as Arc<dyn Server>,
        })
    }

    /// Serves the HTTP front-end in the background and performs teardown
    /// once it returns.
    pub async fn serve(&self, gsh: Arc<GracefulShutdown>) -> Result<()> {
        let server = self.server.clone();
        let app_for_close = self.clone();

        tokio::task::spawn(async move {
            if let Err(e) = server.listen_and_serve().await {
                error!(
                    component = "app",
                    scope = "server",
                    event = "serve_failed",
                    error = %e,
                    "server failed to serve"
                );
            }

            app_for_close.close().await;
            gsh.done();
        });

        info!(component = "app", event = "started", "application lifecycle");

        Ok(())
    }

    /// Best-effort teardown: signal every tracked running process, then
    /// cancel the shutdown token.
    pub async fn close(&self) {
        self.manager.shutdown().await;
        self.shutdown_token.cancel();

        info!(component = "app", event = "stopped", "application lifecycle");
    }
}

impl Clone for App {
    fn clone(&self) -> Self {
        Self {
            shutdown_token: self.shutdown_token.clone(),
            manager: self.manager.clone(),
            server: self.server.clone(),
        }
    }
}
