use crate::domain::model::{
    Deployment, LaunchOutcome, RunSummary, ServiceDescriptor, ServiceStatus, FRONTEND_PORT,
};
use std::fmt::Write;

pub fn status_line(status: &ServiceStatus) -> String {
    let mut line = format!("{} service: ", status.name);

    if status.running {
        line.push_str("✅ running");
        if let Some(version) = &status.version {
            let _ = write!(line, " (v{})", version);
        }
        if status.launch == LaunchOutcome::AlreadyRunning {
            line.push_str(" [already running, not relaunched]");
        }
    } else {
        line.push_str("❌ not started");
        if let LaunchOutcome::Failed { reason } = &status.launch {
            let _ = write!(line, " ({})", reason);
        }
    }

    line
}

/// Human-readable summary printed at the end of a run.
pub fn render_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    for status in &summary.statuses {
        out.push_str(&status_line(status));
        out.push('\n');
    }

    if summary.all_running() {
        out.push_str("\n🎉 All services started successfully!\n");
        match summary.deployment {
            Deployment::Local => out.push_str("The image enhancement app can now be used.\n"),
            Deployment::Network => out.push_str(&render_access_guide(summary)),
        }
    } else {
        out.push_str("\n⚠️ Some services failed to start, check the messages above.\n");
    }

    out
}

/// How other devices on the LAN reach the frontend and both services.
pub fn render_access_guide(summary: &RunSummary) -> String {
    let host = &summary.host;
    let mut out = String::new();

    let _ = writeln!(out, "\n📱 Access from other devices:");
    let _ = writeln!(out, "1. Make sure all devices are on the same network");
    let _ = writeln!(out, "2. Open http://{}:{} in their browser", host, FRONTEND_PORT);
    let _ = writeln!(out, "3. AI service endpoints:");
    for status in &summary.statuses {
        let _ = writeln!(out, "   - {}: {}", status.name, status.base_url);
    }

    let _ = writeln!(out, "\n🔧 For access from outside the LAN, forward these router ports:");
    let _ = writeln!(out, "   - frontend: {} -> {}:{}", FRONTEND_PORT, host, FRONTEND_PORT);
    for status in &summary.statuses {
        if let Some(port) = port_of(&status.base_url) {
            let _ = writeln!(out, "   - {}: {} -> {}:{}", status.name, port, host, port);
        }
    }

    out
}

/// Banner printed before launching.
pub fn render_plan(deployment: Deployment, host: &str, services: &[ServiceDescriptor]) -> String {
    let mut out = String::new();
    match deployment {
        Deployment::Local => {
            let _ = writeln!(out, "Starting local AI services...");
        }
        Deployment::Network => {
            let _ = writeln!(out, "Starting network AI services...");
            let _ = writeln!(out, "Local IP address: {}", host);
        }
    }
    for service in services {
        let _ = writeln!(
            out,
            "  - {} on port {} ({})",
            service.name, service.port, service.file_name
        );
    }
    out
}

fn port_of(base_url: &str) -> Option<u16> {
    url::Url::parse(base_url).ok()?.port()
}
