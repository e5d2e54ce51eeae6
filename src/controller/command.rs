// Command controller: maps GET paths onto dispatcher commands.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::controller::Controller;
use crate::dispatch::CommandDispatcher;

/// The single transport-facing controller. The GET path is split into
/// segments: segment 1 is the command name, the remaining segments are
/// positional string arguments. Every response is HTTP 200 with a JSON
/// object body terminated by a newline; domain and protocol errors live
/// in the body's `result` field, never in the HTTP status.
pub struct CommandController {
    dispatcher: Arc<CommandDispatcher>,
}

impl CommandController {
    /// Creates a new command controller.
    pub fn new(dispatcher: Arc<CommandDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Handles one request path.
    async fn handle(State(controller): State<Arc<Self>>, path: String) -> Response {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let command = segments.next().unwrap_or_default().to_string();
        let args: Vec<String> = segments.map(str::to_string).collect();

        let reply = controller.dispatcher.dispatch(&command, &args).await;

        let mut body = serde_json::to_string(&reply).unwrap_or_default();
        body.push('\n');

        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

impl Controller for CommandController {
    fn add_route(&self, router: Router) -> Router {
        let controller = Arc::new(self.clone());
        let root = controller.clone();
        router
            .route(
                "/",
                get(move || {
                    let controller = root.clone();
                    async move { Self::handle(State(controller), String::new()).await }
                }),
            )
            .route(
                "/*path",
                get(move |Path(path): Path<String>| {
                    let controller = controller.clone();
                    async move { Self::handle(State(controller), path).await }
                }),
            )
    }
}

impl Clone for CommandController {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}
