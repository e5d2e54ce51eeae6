// Package manager orchestrates named processes over the service catalog.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::process::ManagedProcess;
use crate::registry::ServiceRegistry;

pub mod reply;

pub use reply::{ProcessInfo, Reply};


/// How long a stop waits for the signaled group to disappear before
/// reporting the entry as still alive. Bounded, so no command blocks
/// indefinitely.
const STOP_GRACE: Duration = Duration::from_millis(250);
const STOP_POLL: Duration = Duration::from_millis(25);

/// Maps each service name to at most one live ManagedProcess and turns
/// commands into structured replies. Expected domain failures (unknown
/// service, already running, not running) come back as ERROR replies;
/// only unexpected OS-level faults surface as `Err` for the dispatch
/// boundary to envelope.
///
/// The table mutex is held across the whole check-then-spawn sequence of
/// `start`, so two concurrent starts for one name cannot double-spawn.
pub struct ProcessManager {
    registry: ServiceRegistry,
    table: Mutex<HashMap<String, ManagedProcess>>,
}

impl ProcessManager {
    pub fn new(registry: ServiceRegistry) -> Self {
        Self {
            registry,
            table: Mutex::new(HashMap::new()),
        }
    }

    /// Starts the named service. Rejects unknown names before any spawn,
    /// and names that already have a running entry. A dead prior entry
    /// (crashed child) is overwritten by the fresh instance.
    pub async fn start(&self, name: &str) -> Result<Reply> {
        let Some(def) = self.registry.get(name) else {
            return Ok(Reply::error(format!("Unknown service '{name}'")));
        };

        let mut table = self.table.lock().await;

        if let Some(existing) = table.get_mut(name) {
            if existing.is_running() {
                return Ok(Reply::error(format!(
                    "Process '{name}' is already running"
                )));
            }
        }

        let mut proc = ManagedProcess::new(def);
        proc.start()?;

        // The spawn call succeeded but the child may already be gone
        // (e.g. the shell rejected the command line outright). Do not
        // install a dead handle.
        if !proc.is_running() {
            warn!(
                component = "manager",
                event = "launch_not_stuck",
                name = %name,
                "process exited immediately after spawn"
            );
            return Ok(Reply::error(format!("Process '{name}' failed to launch")));
        }

        let pid = proc.pid();
        table.insert(name.to_string(), proc);

        info!(
            component = "manager",
            event = "started",
            name = %name,
            pid = pid,
            "process started"
        );

        Ok(Reply::ok().with_name(name).with_pid(pid))
    }

    /// Stops the named process: signals its group, then polls liveness
    /// over a short grace window. Confirmed exit removes the table entry;
    /// a child that outlives the window stays tracked for a retry.
    pub async fn stop(&self, name: &str) -> Result<Reply> {
        let mut table = self.table.lock().await;

        let Some(proc) = table.get_mut(name) else {
            return Ok(Reply::error(format!("Unknown process '{name}'")));
        };

        if !proc.is_running() {
            return Ok(Reply::error(format!("Process '{name}' is not running")));
        }

        proc.stop()?;

        let mut waited = Duration::ZERO;
        while !proc.has_exited() && waited < STOP_GRACE {
            tokio::time::sleep(STOP_POLL).await;
            waited += STOP_POLL;
        }

        if !proc.has_exited() {
            warn!(
                component = "manager",
                event = "stop_unconfirmed",
                name = %name,
                "process still alive after stop signal"
            );
            return Ok(Reply::error(format!("Process '{name}' did not terminate")));
        }

        table.remove(name);

        info!(
            component = "manager",
            event = "stopped",
            name = %name,
            "process stopped and removed"
        );

        Ok(Reply::ok().with_name(name))
    }

    /// Reports name, pid and liveness for a tracked process. Pure read.
    pub async fn status(&self, name: &str) -> Result<Reply> {
        let mut table = self.table.lock().await;

        let Some(proc) = table.get_mut(name) else {
            return Ok(Reply::error(format!("Unknown process '{name}'")));
        };

        let pid = proc.pid();
        let running = proc.is_running();
        Ok(Reply::ok()
            .with_name(name)
            .with_pid(pid)
            .with_running(running))
    }

    /// Snapshot of every tracked entry with its current liveness.
    pub async fn list(&self) -> Result<Reply> {
        let mut table = self.table.lock().await;

        let mut processes = BTreeMap::new();
        for (name, proc) in table.iter_mut() {
            processes.insert(
                name.clone(),
                ProcessInfo {
                    pid: proc.pid(),
                    is_running: proc.is_running(),
                },
            );
        }

        Ok(Reply::ok().with_processes(processes))
    }

    /// The full registry catalog, independent of run state.
    pub fn services(&self) -> Result<Reply> {
        let services = self.registry.list().into_iter().cloned().collect();
        Ok(Reply::ok().with_services(services))
    }

    /// Best-effort teardown: signal every entry still marked running. No
    /// verification, no error surfaced; used on supervisor shutdown.
    pub async fn shutdown(&self) {
        let mut table = self.table.lock().await;

        for (name, proc) in table.iter_mut() {
            if !proc.is_running() {
                continue;
            }
            match proc.stop() {
                Ok(()) => {
                    info!(
                        component = "manager",
                        event = "shutdown_signal",
                        name = %name,
                        "stop signal sent during shutdown"
                    );
                }
                Err(e) => {
                    warn!(
                        component = "manager",
                        event = "shutdown_signal_failed",
                        name = %name,
                        error = %e,
                        "could not signal process during shutdown"
                    );
                }
            }
        }
    }
}
