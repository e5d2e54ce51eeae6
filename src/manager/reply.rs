// Structured reply records for manager commands.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::registry::ServiceDefinition;

/// Outcome marker carried by every reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Ok,
    Error,
}

/// Liveness snapshot of one tracked process, as reported by `list`.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    pub is_running: bool,
}

/// The uniform command reply record. Every command produces one of these;
/// absent fields are omitted from the serialized JSON object.
#[derive(Debug, Serialize)]
pub struct Reply {
    pub result: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_running: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processes: Option<BTreeMap<String, ProcessInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceDefinition>>,
}

impl Reply {
    /// A bare OK reply.
    pub fn ok() -> Self {
        Self {
            result: Status::Ok,
            reason: None,
            exception: None,
            name: None,
            pid: None,
            is_running: None,
            processes: None,
            services: None,
        }
    }

    /// An expected domain error with a human-readable reason.
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            result: Status::Error,
            reason: Some(reason.into()),
            ..Self::ok()
        }
    }

    /// The blanket envelope for unexpected faults caught at the dispatch
    /// boundary.
    pub fn exception(message: impl Into<String>) -> Self {
        Self {
            result: Status::Error,
            reason: Some("Exception thrown".to_string()),
            exception: Some(message.into()),
            ..Self::ok()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_pid(mut self, pid: Option<u32>) -> Self {
        self.pid = pid;
        self
    }

    pub fn with_running(mut self, running: bool) -> Self {
        self.is_running = Some(running);
        self
    }

    pub fn with_processes(mut self, processes: BTreeMap<String, ProcessInfo>) -> Self {
        self.processes = Some(processes);
        self
    }

    pub fn with_services(mut self, services: Vec<ServiceDefinition>) -> Self {
        self.services = Some(services);
        self
    }

    /// True when the reply carries the OK marker.
    pub fn is_ok(&self) -> bool {
        self.result == Status::Ok
    }
}
