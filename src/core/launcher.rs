use crate::domain::ports::{ProcessSpawner, SpawnRequest};
use crate::utils::error::{LauncherError, Result};
use std::process::{Command, Stdio};

pub fn default_interpreter() -> String {
    if cfg!(windows) {
        "python".to_string()
    } else {
        "python3".to_string()
    }
}

/// Runs a generated server with a Python interpreter as an unsupervised child.
///
/// stdout and stderr are inherited so the servers log to the same console.
/// The `Child` handle is dropped right after spawning: the launcher never
/// waits on, signals or restarts the process.
#[derive(Debug, Clone)]
pub struct InterpreterSpawner {
    interpreter: String,
}

impl InterpreterSpawner {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    fn command(&self, request: &SpawnRequest) -> Command {
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(&request.script)
            .current_dir(&request.working_dir)
            .envs(request.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null());
        cmd
    }
}

impl ProcessSpawner for InterpreterSpawner {
    fn spawn(&self, request: &SpawnRequest) -> Result<u32> {
        let child = self
            .command(request)
            .spawn()
            .map_err(|source| LauncherError::SpawnError {
                service: request.service.clone(),
                interpreter: self.interpreter.clone(),
                source,
            })?;

        let pid = child.id();
        tracing::debug!(
            "Spawned {} {} (pid {}) in {}",
            self.interpreter,
            request.script.display(),
            pid,
            request.working_dir.display()
        );

        // 不等待子行程，丟棄 handle 後子行程繼續獨立執行
        drop(child);
        Ok(pid)
    }
}
