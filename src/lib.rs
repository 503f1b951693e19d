pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, LauncherSettings};

pub use crate::core::{
    client::ServiceClient, coordinator::Coordinator, health::HttpHealthChecker,
    launcher::InterpreterSpawner,
};
pub use domain::model::{Deployment, RunSummary};
pub use utils::error::{LauncherError, Result};

/// Launch every configured service with the real filesystem, interpreter and
/// HTTP health checker, and return the collected statuses.
pub async fn launch(settings: LauncherSettings) -> Result<RunSummary> {
    let storage = LocalStorage::new(settings.working_dir.clone());
    let spawner = InterpreterSpawner::new(settings.interpreter.clone());
    let checker = HttpHealthChecker::new(settings.request_timeout)?;

    let coordinator = Coordinator::new(storage, spawner, checker, settings);
    Ok(coordinator.run().await)
}
