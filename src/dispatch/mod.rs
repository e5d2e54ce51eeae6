// Package dispatch routes (command, args) pairs to manager operations.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::error;

use crate::manager::{ProcessManager, Reply};

#[cfg(test)]
mod dispatch_test;

/// Name-keyed router over the manager's command surface, and the only
/// blanket failure firewall in the system: any fault escaping an
/// operation (malformed arguments included) is reduced to the uniform
/// `{result: ERROR, reason: "Exception thrown", exception: ...}` record
/// instead of reaching the transport.
pub struct CommandDispatcher {
    manager: Arc<ProcessManager>,
}

impl CommandDispatcher {
    pub fn new(manager: Arc<ProcessManager>) -> Self {
        Self { manager }
    }

    /// Dispatches one command. Always produces a reply record; never
    /// returns an error and never panics past this boundary.
    pub async fn dispatch(&self, command: &str, args: &[String]) -> Reply {
        match self.invoke(command, args).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(
                    component = "dispatch",
                    event = "command_fault",
                    command = %command,
                    error = %e,
                    "command raised an unexpected fault"
                );
                Reply::exception(e.to_string())
            }
        }
    }

    async fn invoke(&self, command: &str, args: &[String]) -> Result<Reply> {
        match command {
            "start" => self.manager.start(Self::arg(args, 0, "name")?).await,
            "stop" => self.manager.stop(Self::arg(args, 0, "name")?).await,
            "status" => self.manager.status(Self::arg(args, 0, "name")?).await,
            "list" => self.manager.list().await,
            "services" => self.manager.services(),
            other => Ok(Reply::error(format!("Unknown command '{other}'"))),
        }
    }

    fn arg<'a>(args: &'a [String], index: usize, what: &str) -> Result<&'a str> {
        args.get(index)
            .map(String::as_str)
            .with_context(|| format!("missing '{what}' argument"))
    }
}
