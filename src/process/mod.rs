// Package process wraps a single supervised OS process instance.

use std::collections::HashMap;
use std::io;

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::registry::ServiceDefinition;

#[cfg(test)]
mod process_test;

/// Typed failures of process-level operations. The manager maps the
/// expected ones to ordinary ERROR replies; spawn and signal faults
/// propagate to the dispatch boundary.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("process '{0}' is already running")]
    AlreadyRunning(String),

    #[error("process '{0}' is not running")]
    NotRunning(String),

    #[error("failed to spawn '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to signal process group {pgid}: {source}")]
    Signal {
        pgid: i32,
        #[source]
        source: nix::errno::Errno,
    },
}

/// One supervised OS process. The child handle is set once at spawn and
/// exclusively owned here; it is never shared between two instances.
pub struct ManagedProcess {
    name: String,
    command: String,
    env: HashMap<String, String>,
    child: Option<Child>,
    launched: bool,
}

impl ManagedProcess {
    /// Creates an unlaunched process from its service definition.
    pub fn new(def: &ServiceDefinition) -> Self {
        Self {
            name: def.name.clone(),
            command: def.command.clone(),
            env: def.env.clone(),
            child: None,
            launched: false,
        }
    }

    /// Spawns the command through the host shell as a new process-group
    /// leader, so a later group signal reaches any children the command
    /// itself forks. The child inherits the supervisor's environment with
    /// the definition's overrides layered on top.
    ///
    /// `launched` is set once the spawn call returns; liveness is not
    /// confirmed here.
    pub fn start(&mut self) -> Result<(), ProcessError> {
        if self.is_running() {
            return Err(ProcessError::AlreadyRunning(self.name.clone()));
        }

        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(&self.command).envs(&self.env);
        unsafe {
            cmd.pre_exec(|| {
                if libc::setsid() == -1 {
                    return Err(io::Error::last_os_error());
                }
                Ok(())
            });
        }

        let child = cmd.spawn().map_err(|source| ProcessError::Spawn {
            name: self.name.clone(),
            source,
        })?;

        info!(
            component = "process",
            event = "spawned",
            name = %self.name,
            pid = child.id(),
            "process spawned"
        );

        self.child = Some(child);
        self.launched = true;
        Ok(())
    }

    /// Sends SIGTERM to the child's whole process group and marks the
    /// instance stopped immediately. The call does not wait for the child
    /// to exit; callers confirm via `has_exited`.
    pub fn stop(&mut self) -> Result<(), ProcessError> {
        if !self.is_running() {
            return Err(ProcessError::NotRunning(self.name.clone()));
        }

        self.launched = false;

        if let Some(pid) = self.child.as_ref().and_then(Child::id) {
            let pgid = pid as i32;
            match killpg(Pid::from_raw(pgid), Signal::SIGTERM) {
                Ok(()) => {
                    info!(
                        component = "process",
                        event = "signaled",
                        name = %self.name,
                        pgid = pgid,
                        "SIGTERM sent to process group"
                    );
                }
                // The group vanished between the liveness check and the
                // signal; treat it as already stopped.
                Err(nix::errno::Errno::ESRCH) => {
                    debug!(
                        component = "process",
                        event = "signal_skipped",
                        name = %self.name,
                        pgid = pgid,
                        "process group already gone"
                    );
                }
                Err(source) => return Err(ProcessError::Signal { pgid, source }),
            }
        }

        Ok(())
    }

    /// True iff a start was issued, no stop was issued since, and a
    /// non-blocking poll of the child reports no exit yet.
    pub fn is_running(&mut self) -> bool {
        self.launched && !self.has_exited()
    }

    /// Non-blocking poll of the underlying OS process, independent of the
    /// `launched` flag. Used to confirm exit after a stop signal.
    pub fn has_exited(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => !matches!(child.try_wait(), Ok(None)),
            None => true,
        }
    }

    /// OS process id while running, absent otherwise.
    pub fn pid(&mut self) -> Option<u32> {
        if self.is_running() {
            self.child.as_ref().and_then(Child::id)
        } else {
            None
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn env(&self) -> &HashMap<String, String> {
        &self.env
    }
}
