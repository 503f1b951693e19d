use crate::config::LauncherSettings;
use crate::core::materializer::Materializer;
use crate::core::readiness::{wait_until_ready, Readiness, ReadinessPolicy};
use crate::core::Storage;
use crate::domain::model::{LaunchOutcome, RunSummary, ServiceDescriptor, ServiceStatus};
use crate::domain::ports::{HealthProbe, ProcessSpawner, SpawnRequest};
use crate::domain::templates::PORT_ENV_VAR;
use crate::utils::error::Result;
use crate::utils::monitor::ProcessMonitor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// Launches every configured service concurrently, waits for each health
/// endpoint with backoff, and collects one status per service.
///
/// Failures never escape `run`: each one is logged and reduced to that
/// service's status, independently of the other services.
pub struct Coordinator<S, P, H>
where
    S: Storage + 'static,
    P: ProcessSpawner + 'static,
    H: HealthProbe + 'static,
{
    storage: Arc<S>,
    spawner: Arc<P>,
    probe: Arc<H>,
    settings: LauncherSettings,
    monitor: ProcessMonitor,
}

impl<S, P, H> Coordinator<S, P, H>
where
    S: Storage + 'static,
    P: ProcessSpawner + 'static,
    H: HealthProbe + 'static,
{
    pub fn new(storage: S, spawner: P, probe: H, settings: LauncherSettings) -> Self {
        let monitor = ProcessMonitor::new(settings.monitor);
        Self {
            storage: Arc::new(storage),
            spawner: Arc::new(spawner),
            probe: Arc::new(probe),
            settings,
            monitor,
        }
    }

    pub async fn run(&self) -> RunSummary {
        let launches = self.launch_all().await;
        tracing::info!("⏳ Waiting for services to become ready...");
        let statuses = self.await_readiness(launches).await;

        RunSummary {
            deployment: self.settings.deployment,
            host: self.settings.host.clone(),
            statuses,
        }
    }

    /// One task per service; the tasks share nothing but read-only handles.
    async fn launch_all(&self) -> Vec<(ServiceDescriptor, LaunchOutcome)> {
        let mut handles = Vec::with_capacity(self.settings.services.len());

        for descriptor in &self.settings.services {
            let descriptor = descriptor.clone();
            let storage = Arc::clone(&self.storage);
            let spawner = Arc::clone(&self.spawner);
            let probe = Arc::clone(&self.probe);
            let base_url = descriptor.base_url(&self.settings.host);
            let working_dir = self.settings.working_dir.clone();
            let skip_running = self.settings.skip_running;
            let span = tracing::info_span!("service", name = %descriptor.name);

            let handle = tokio::spawn(async move {
                if skip_running && probe.is_running(&base_url, &descriptor.health_path).await {
                    tracing::info!("♻️ {} already answers at {}, not relaunching", descriptor.name, base_url);
                    return LaunchOutcome::AlreadyRunning;
                }

                tracing::info!("🚀 Starting {} service...", descriptor.name);
                match launch_service(storage, spawner.as_ref(), &descriptor, working_dir).await {
                    Ok(pid) => LaunchOutcome::Launched { pid },
                    Err(e) => {
                        tracing::error!("❌ Failed to start {}: {}", descriptor.name, e);
                        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                        LaunchOutcome::Failed {
                            reason: e.user_friendly_message(),
                        }
                    }
                }
            }
            .instrument(span));
            handles.push(handle);
        }

        let mut launches = Vec::with_capacity(handles.len());
        for (descriptor, handle) in self.settings.services.iter().zip(handles) {
            let outcome = handle.await.unwrap_or_else(|e| {
                tracing::error!("❌ Launch task for {} aborted: {}", descriptor.name, e);
                LaunchOutcome::Failed {
                    reason: format!("launch task aborted: {}", e),
                }
            });
            launches.push((descriptor.clone(), outcome));
        }

        launches
    }

    async fn await_readiness(
        &self,
        launches: Vec<(ServiceDescriptor, LaunchOutcome)>,
    ) -> Vec<ServiceStatus> {
        let mut handles = Vec::with_capacity(launches.len());

        for (descriptor, outcome) in &launches {
            let probe = Arc::clone(&self.probe);
            let base_url = descriptor.base_url(&self.settings.host);
            let health_path = descriptor.health_path.clone();
            // 啟動失敗時只檢查一次，不做退避等待
            let policy = match outcome {
                LaunchOutcome::Launched { .. } => self.settings.readiness.clone(),
                LaunchOutcome::AlreadyRunning | LaunchOutcome::Failed { .. } => {
                    ReadinessPolicy::fixed(Duration::ZERO)
                }
            };

            let span = tracing::info_span!("service", name = %descriptor.name);

            handles.push(tokio::spawn(
                async move { wait_until_ready(probe.as_ref(), &base_url, &health_path, &policy).await }
                    .instrument(span),
            ));
        }

        let mut statuses = Vec::with_capacity(launches.len());
        for ((descriptor, outcome), handle) in launches.into_iter().zip(handles) {
            let readiness = handle.await.unwrap_or_else(|e| {
                tracing::error!("❌ Health polling for {} aborted: {}", descriptor.name, e);
                Readiness {
                    report: Default::default(),
                    attempts: 0,
                }
            });

            if readiness.report.running {
                tracing::info!(
                    "✅ {} is running after {} check(s)",
                    descriptor.name,
                    readiness.attempts
                );
            } else {
                tracing::warn!(
                    "❌ {} did not answer {} after {} check(s)",
                    descriptor.name,
                    descriptor.health_path,
                    readiness.attempts
                );
                if let LaunchOutcome::Launched { pid } = outcome {
                    self.monitor.log_process_state(&descriptor.name, pid);
                }
            }

            statuses.push(ServiceStatus {
                base_url: descriptor.base_url(&self.settings.host),
                version: readiness.report.version().map(str::to_string),
                running: readiness.report.running,
                attempts: readiness.attempts,
                name: descriptor.name,
                launch: outcome,
            });
        }

        statuses
    }
}

/// Materialize then spawn a single service.
pub async fn launch_service<S, P>(
    storage: Arc<S>,
    spawner: &P,
    descriptor: &ServiceDescriptor,
    working_dir: PathBuf,
) -> Result<u32>
where
    S: Storage,
    P: ProcessSpawner + ?Sized,
{
    Materializer::new(storage).materialize(descriptor).await?;

    let request = SpawnRequest {
        service: descriptor.name.clone(),
        script: descriptor.file_name.clone().into(),
        working_dir,
        env: vec![(PORT_ENV_VAR.to_string(), descriptor.port.to_string())],
    };
    spawner.spawn(&request)
}
