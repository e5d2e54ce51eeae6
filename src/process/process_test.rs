#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use crate::process::{ManagedProcess, ProcessError};
    use crate::registry::ServiceDefinition;

    fn definition(name: &str, command: &str) -> ServiceDefinition {
        ServiceDefinition {
            name: name.to_string(),
            command: command.to_string(),
            env: HashMap::new(),
        }
    }

    async fn await_exit(proc: &mut ManagedProcess) {
        for _ in 0..100 {
            if proc.has_exited() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("process did not exit within the grace window");
    }

    /// A fresh instance is not running and has no pid.
    #[tokio::test]
    async fn test_unlaunched_not_running() {
        let mut proc = ManagedProcess::new(&definition("idle", "sleep 30"));
        assert!(!proc.is_running());
        assert_eq!(proc.pid(), None);
    }

    /// start() spawns the command and reports a positive pid.
    #[tokio::test]
    async fn test_start_and_stop() {
        let mut proc = ManagedProcess::new(&definition("sleeper", "sleep 30"));
        proc.start().expect("start");
        assert!(proc.is_running());
        assert!(proc.pid().expect("pid") > 0);

        proc.stop().expect("stop");
        assert!(!proc.is_running());
        await_exit(&mut proc).await;
    }

    /// Starting a running instance fails with AlreadyRunning.
    #[tokio::test]
    async fn test_double_start_rejected() {
        let mut proc = ManagedProcess::new(&definition("sleeper", "sleep 30"));
        proc.start().expect("start");

        match proc.start() {
            Err(ProcessError::AlreadyRunning(name)) => assert_eq!(name, "sleeper"),
            other => panic!("expected AlreadyRunning, got {other:?}"),
        }

        proc.stop().expect("stop");
        await_exit(&mut proc).await;
    }

    /// Stopping an unlaunched instance fails with NotRunning.
    #[tokio::test]
    async fn test_stop_unlaunched_rejected() {
        let mut proc = ManagedProcess::new(&definition("idle", "sleep 30"));
        match proc.stop() {
            Err(ProcessError::NotRunning(name)) => assert_eq!(name, "idle"),
            other => panic!("expected NotRunning, got {other:?}"),
        }
    }

    /// A child that exits on its own is reported as not running while the
    /// launched flag alone would claim otherwise.
    #[tokio::test]
    async fn test_self_exit_detected() {
        let mut proc = ManagedProcess::new(&definition("oneshot", "true"));
        proc.start().expect("start");
        await_exit(&mut proc).await;
        assert!(!proc.is_running());
        assert_eq!(proc.pid(), None);
    }

    /// SIGTERM to the group also reaches children the shell command forks.
    #[tokio::test]
    async fn test_group_signal_reaches_children() {
        let mut proc = ManagedProcess::new(&definition("forker", "sleep 30 & sleep 30"));
        proc.start().expect("start");
        assert!(proc.is_running());

        proc.stop().expect("stop");
        await_exit(&mut proc).await;
    }

    /// Definition env overrides are visible to the child command.
    #[tokio::test]
    async fn test_env_overrides_applied() {
        let out = tempfile::NamedTempFile::new().expect("temp file");
        let mut def = definition(
            "env-check",
            &format!("printf '%s' \"$PROCMAN_TEST_VALUE\" > {}", out.path().display()),
        );
        def.env.insert("PROCMAN_TEST_VALUE".to_string(), "override".to_string());

        let mut proc = ManagedProcess::new(&def);
        proc.start().expect("start");
        await_exit(&mut proc).await;

        let written = std::fs::read_to_string(out.path()).expect("read output");
        assert_eq!(written, "override");
    }
}
