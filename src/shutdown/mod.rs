// Package shutdown provides graceful shutdown functionality.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
#[error("graceful shutdown timeout exceeded")]
pub struct TimeoutError;

/// Waitgroup-style graceful shutdown: tasks register with `add`, report
/// completion with `done`, and `await_shutdown` blocks until an OS
/// interrupt or cancellation, then waits (bounded) for the registered
/// tasks to drain.
#[derive(Clone)]
pub struct GracefulShutdown {
    shutdown_token: CancellationToken,
    timeout: Duration,
    expected: Arc<std::sync::atomic::AtomicUsize>,
    counter: Arc<tokio::sync::Semaphore>,
}

impl GracefulShutdown {
    /// Creates a new handler with the given drain timeout.
    pub fn new(shutdown_token: CancellationToken, timeout: Duration) -> Self {
        Self {
            shutdown_token,
            timeout,
            expected: Arc::new(std::sync::atomic::AtomicUsize::new(0)),
            counter: Arc::new(tokio::sync::Semaphore::new(0)),
        }
    }

    /// Registers `n` tasks to wait for.
    pub fn add(&self, n: usize) {
        self.expected
            .fetch_add(n, std::sync::atomic::Ordering::SeqCst);
    }

    /// Marks one registered task as done.
    pub fn done(&self) {
        self.counter.add_permits(1);
    }

    /// Blocks until SIGINT or token cancellation, then drains.
    pub async fn await_shutdown(&self) -> Result<()> {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!(
                    component = "graceful-shutdown",
                    event = "os_signal",
                    signal = "SIGINT",
                    "cancellation started"
                );
            }
            _ = self.shutdown_token.cancelled() => {
                info!(
                    component = "graceful-shutdown",
                    event = "ctx_done",
                    "cancellation started"
                );
            }
        }

        self.cancel_and_await_with_timeout().await
    }

    async fn cancel_and_await_with_timeout(&self) -> Result<()> {
        self.shutdown_token.cancel();

        match timeout(self.timeout, self.wait_for_completion()).await {
            Ok(()) => {
                info!(
                    component = "graceful-shutdown",
                    event = "shutdown_success",
                    "service was gracefully shut down"
                );
                Ok(())
            }
            Err(_) => {
                warn!(
                    component = "graceful-shutdown",
                    event = "shutdown_timeout",
                    timeout_secs = self.timeout.as_secs(),
                    "not all tasks were closed within timeout"
                );
                Err(TimeoutError.into())
            }
        }
    }

    async fn wait_for_completion(&self) {
        // Each done() releases one permit; shutdown completes once every
        // registered task has released its own.
        let expected = self.expected.load(std::sync::atomic::Ordering::SeqCst) as u32;
        let _permits = self.counter.acquire_many(expected).await;
    }
}
