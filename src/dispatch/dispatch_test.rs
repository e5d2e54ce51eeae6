#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use crate::dispatch::CommandDispatcher;
    use crate::manager::ProcessManager;
    use crate::registry::{ServiceDefinition, ServiceRegistry};

    fn dispatcher_with(defs: &[(&str, &str)]) -> CommandDispatcher {
        let mut registry = ServiceRegistry::new();
        for (name, command) in defs {
            registry.insert(ServiceDefinition {
                name: name.to_string(),
                command: command.to_string(),
                env: HashMap::new(),
            });
        }
        CommandDispatcher::new(Arc::new(ProcessManager::new(registry)))
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    /// An unrecognized command comes back as a plain ERROR reply with the
    /// command name in the reason.
    #[tokio::test]
    async fn test_unknown_command() {
        let dispatcher = dispatcher_with(&[]);

        let reply = dispatcher.dispatch("reboot", &args(&["now"])).await;
        assert!(!reply.is_ok());
        assert_eq!(reply.reason.as_deref(), Some("Unknown command 'reboot'"));
        assert!(reply.exception.is_none());
    }

    /// A missing positional argument is an internal fault and is reduced
    /// to the uniform exception envelope.
    #[tokio::test]
    async fn test_missing_argument_envelope() {
        let dispatcher = dispatcher_with(&[]);

        let reply = dispatcher.dispatch("start", &[]).await;
        assert!(!reply.is_ok());
        assert_eq!(reply.reason.as_deref(), Some("Exception thrown"));
        assert_eq!(reply.exception.as_deref(), Some("missing 'name' argument"));
    }

    /// Domain errors from the manager pass through untouched.
    #[tokio::test]
    async fn test_domain_error_passthrough() {
        let dispatcher = dispatcher_with(&[]);

        let reply = dispatcher.dispatch("start", &args(&["ghost"])).await;
        assert!(!reply.is_ok());
        assert_eq!(reply.reason.as_deref(), Some("Unknown service 'ghost'"));
        assert!(reply.exception.is_none());
    }

    /// The happy path routes to the manager and back.
    #[tokio::test]
    async fn test_start_status_stop_roundtrip() {
        let dispatcher = dispatcher_with(&[("sleeper", "sleep 30")]);

        let started = dispatcher.dispatch("start", &args(&["sleeper"])).await;
        assert!(started.is_ok());
        let pid = started.pid.expect("pid");

        let status = dispatcher.dispatch("status", &args(&["sleeper"])).await;
        assert!(status.is_ok());
        assert_eq!(status.pid, Some(pid));
        assert_eq!(status.is_running, Some(true));

        let stopped = dispatcher.dispatch("stop", &args(&["sleeper"])).await;
        assert!(stopped.is_ok());
    }

    /// list and services take no arguments and work on an empty table.
    #[tokio::test]
    async fn test_list_and_services() {
        let dispatcher = dispatcher_with(&[("sleeper", "sleep 30")]);

        let list = dispatcher.dispatch("list", &[]).await;
        assert!(list.is_ok());
        assert!(list.processes.expect("processes").is_empty());

        let services = dispatcher.dispatch("services", &[]).await;
        assert!(services.is_ok());
        assert_eq!(services.services.expect("catalog").len(), 1);
    }
}
