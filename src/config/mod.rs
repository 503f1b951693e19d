pub mod cli;
pub mod toml_config;

use crate::core::health::DEFAULT_REQUEST_TIMEOUT;
use crate::core::launcher::default_interpreter;
use crate::core::readiness::ReadinessPolicy;
use crate::domain::model::{Deployment, ServiceDescriptor, ServiceKind};
use crate::utils::error::Result;
use crate::utils::network;
use crate::utils::validation::{self, Validate};
use std::path::PathBuf;
use std::time::Duration;
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(about = "Start the local OCR and image-enhancement services and report their health")]
pub struct CliConfig {
    /// Directory the server files are written to and started from
    #[arg(long)]
    pub working_dir: Option<PathBuf>,

    /// Python interpreter used to run the generated servers
    #[arg(long, env = "LAUNCHER_PYTHON")]
    pub interpreter: Option<String>,

    /// Host used for health checks (network mode defaults to the LAN address)
    #[arg(long)]
    pub host: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Per-request health check timeout in seconds
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Maximum number of health checks per service
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Do not launch services whose health endpoint already answers
    #[arg(long)]
    pub skip_running: bool,

    /// Log whether a service's process is still alive when it never became healthy
    #[arg(long)]
    pub monitor: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit JSON log lines instead of the compact console format
    #[arg(long)]
    pub json_logs: bool,
}

/// Fully resolved launcher configuration for one run.
#[derive(Debug, Clone)]
pub struct LauncherSettings {
    pub deployment: Deployment,
    pub working_dir: PathBuf,
    pub interpreter: String,
    pub host: String,
    pub request_timeout: Duration,
    pub readiness: ReadinessPolicy,
    pub skip_running: bool,
    pub monitor: bool,
    pub services: Vec<ServiceDescriptor>,
}

impl LauncherSettings {
    pub fn new(deployment: Deployment) -> Self {
        Self {
            deployment,
            working_dir: PathBuf::from("."),
            interpreter: default_interpreter(),
            host: Self::default_host(deployment),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            readiness: ReadinessPolicy::default(),
            skip_running: false,
            monitor: false,
            services: ServiceDescriptor::defaults(deployment),
        }
    }

    fn default_host(deployment: Deployment) -> String {
        match deployment {
            Deployment::Local => "localhost".to_string(),
            Deployment::Network => network::local_ip(),
        }
    }

    pub fn apply_file(&mut self, file: &TomlConfig) {
        let launcher = &file.launcher;
        if let Some(dir) = &launcher.working_dir {
            self.working_dir = PathBuf::from(dir);
        }
        if let Some(interpreter) = &launcher.interpreter {
            self.interpreter = interpreter.clone();
        }
        if let Some(host) = &launcher.host {
            self.host = host.clone();
        }
        if let Some(skip) = launcher.skip_running {
            self.skip_running = skip;
        }

        if let Some(secs) = file.health.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }

        let readiness = &file.readiness;
        if let Some(ms) = readiness.initial_delay_ms {
            self.readiness.initial_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = readiness.base_delay_ms {
            self.readiness.base_delay = Duration::from_millis(ms);
        }
        if let Some(multiplier) = readiness.multiplier {
            self.readiness.multiplier = multiplier;
        }
        if let Some(ms) = readiness.max_delay_ms {
            self.readiness.max_delay = Duration::from_millis(ms);
        }
        if let Some(attempts) = readiness.max_attempts {
            self.readiness.max_attempts = attempts;
        }

        for service in &mut self.services {
            let overrides = match service.kind {
                ServiceKind::Ocr => file.services.ocr.as_ref(),
                ServiceKind::Enhance => file.services.enhance.as_ref(),
            };
            let Some(overrides) = overrides else { continue };

            if let Some(port) = overrides.port {
                service.port = port;
            }
            if let Some(path) = &overrides.health_path {
                service.health_path = path.clone();
            }
        }
    }

    /// Defaults, then the TOML file (if any), then command line flags.
    #[cfg(feature = "cli")]
    pub fn from_cli(deployment: Deployment, cli: &CliConfig) -> Result<Self> {
        let mut settings = Self::new(deployment);

        if let Some(path) = &cli.config {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            settings.apply_file(&file);
        }

        if let Some(dir) = &cli.working_dir {
            settings.working_dir = dir.clone();
        }
        if let Some(interpreter) = &cli.interpreter {
            settings.interpreter = interpreter.clone();
        }
        if let Some(host) = &cli.host {
            settings.host = host.clone();
        }
        if let Some(secs) = cli.request_timeout_secs {
            settings.request_timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = cli.max_attempts {
            settings.readiness.max_attempts = attempts;
        }
        settings.skip_running |= cli.skip_running;
        settings.monitor = cli.monitor;

        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for LauncherSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path(
            "working_dir",
            &self.working_dir.to_string_lossy(),
        )?;
        validation::validate_non_empty_string("interpreter", &self.interpreter)?;
        validation::validate_non_empty_string("host", &self.host)?;
        validation::validate_positive_number(
            "request_timeout",
            self.request_timeout.as_millis() as u64,
            1,
        )?;
        self.readiness.validate()?;

        for service in &self.services {
            validation::validate_non_empty_string("services.name", &service.name)?;
            validation::validate_port(&format!("{}.port", service.name), service.port)?;
            validation::validate_file_name(&format!("{}.file_name", service.name), &service.file_name)?;
            validation::validate_url(
                &format!("{}.base_url", service.name),
                &service.base_url(&self.host),
            )?;
        }

        // 每個服務在一次執行中最多啟動一個行程
        validation::validate_unique("services.name", self.services.iter().map(|s| s.name.as_str()))?;
        validation::validate_unique("services.port", self.services.iter().map(|s| s.port))?;
        validation::validate_unique(
            "services.file_name",
            self.services.iter().map(|s| s.file_name.as_str()),
        )?;

        Ok(())
    }
}
