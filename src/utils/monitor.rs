#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessStatus, ProcessesToUpdate, System};
#[cfg(feature = "cli")]
use std::sync::Mutex;

/// What the process table says about a launched service's pid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Alive,
    Exited,
    Unknown,
}

/// Read-only view of spawned children, used only to enrich log lines when a
/// service never became healthy. Nothing here waits on or signals a process.
#[cfg(feature = "cli")]
pub struct ProcessMonitor {
    system: Mutex<System>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl ProcessMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            system: Mutex::new(System::new()),
            enabled,
        }
    }

    pub fn process_state(&self, pid: u32) -> ProcessState {
        if !self.enabled {
            return ProcessState::Unknown;
        }

        let Ok(mut system) = self.system.lock() else {
            return ProcessState::Unknown;
        };

        let pid = Pid::from_u32(pid);
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        match system.process(pid) {
            // 已結束但未被回收的子行程會停留在 zombie 狀態
            Some(process) if matches!(process.status(), ProcessStatus::Zombie) => ProcessState::Exited,
            Some(_) => ProcessState::Alive,
            None => ProcessState::Exited,
        }
    }

    pub fn log_process_state(&self, service: &str, pid: u32) {
        match self.process_state(pid) {
            ProcessState::Alive => tracing::warn!(
                "🔍 {} (pid {}) is still running but not answering health checks",
                service,
                pid
            ),
            ProcessState::Exited => tracing::warn!(
                "🔍 {} (pid {}) has already exited, check its console output",
                service,
                pid
            ),
            ProcessState::Unknown => {}
        }
    }
}

// 為非CLI環境提供空實現
#[cfg(not(feature = "cli"))]
pub struct ProcessMonitor;

#[cfg(not(feature = "cli"))]
impl ProcessMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn process_state(&self, _pid: u32) -> ProcessState {
        ProcessState::Unknown
    }

    pub fn log_process_state(&self, _service: &str, _pid: u32) {}
}
