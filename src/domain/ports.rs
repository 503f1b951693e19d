use crate::domain::model::HealthReport;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Destination for generated server files. Writes overwrite existing files and
/// return the full path written.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<PathBuf>> + Send;
}

/// Everything needed to start one generated server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    pub service: String,
    pub script: PathBuf,
    pub working_dir: PathBuf,
    pub env: Vec<(String, String)>,
}

/// Starts a detached child and returns its pid. Implementations must not wait
/// on the child.
pub trait ProcessSpawner: Send + Sync {
    fn spawn(&self, request: &SpawnRequest) -> Result<u32>;
}

#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// One bounded GET against `<base_url><health_path>`. Never retries.
    async fn probe(&self, base_url: &str, health_path: &str) -> HealthReport;

    async fn is_running(&self, base_url: &str, health_path: &str) -> bool {
        self.probe(base_url, health_path).await.running
    }
}
