use crate::core::Storage;
use crate::domain::model::ServiceDescriptor;
use crate::utils::error::{LauncherError, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Writes a descriptor's server template, verbatim, to its file name.
/// An existing file is overwritten.
pub struct Materializer<S: Storage> {
    storage: Arc<S>,
}

impl<S: Storage> Materializer<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub async fn materialize(&self, descriptor: &ServiceDescriptor) -> Result<PathBuf> {
        tracing::debug!(
            "Writing {} ({} bytes) for {}",
            descriptor.file_name,
            descriptor.template.len(),
            descriptor.name
        );

        self.storage
            .write_file(&descriptor.file_name, descriptor.template.as_bytes())
            .await
            .map_err(|e| match e {
                LauncherError::IoError(source) => LauncherError::MaterializeError {
                    service: descriptor.name.clone(),
                    path: descriptor.file_name.clone(),
                    source,
                },
                other => other,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::LocalStorage;
    use crate::domain::model::Deployment;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_materialize_writes_template_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(LocalStorage::new(temp_dir.path()));
        let materializer = Materializer::new(storage);
        let descriptor = ServiceDescriptor::ocr(Deployment::Local);

        let path = materializer.materialize(&descriptor).await.unwrap();

        assert_eq!(path, temp_dir.path().join("paddle_server.py"));
        assert_eq!(std::fs::read(&path).unwrap(), descriptor.template.as_bytes());
    }

    #[tokio::test]
    async fn test_repeated_runs_are_byte_identical() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(LocalStorage::new(temp_dir.path()));
        let materializer = Materializer::new(storage);
        let descriptor = ServiceDescriptor::enhance(Deployment::Network);

        std::fs::write(temp_dir.path().join(&descriptor.file_name), "stale edits\n".repeat(500)).unwrap();

        let first = materializer.materialize(&descriptor).await.unwrap();
        let first_bytes = std::fs::read(&first).unwrap();
        let second = materializer.materialize(&descriptor).await.unwrap();
        let second_bytes = std::fs::read(&second).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_bytes, second_bytes);
        assert_eq!(second_bytes, descriptor.template.as_bytes());
    }

    #[tokio::test]
    async fn test_write_failure_names_the_service() {
        let temp_dir = TempDir::new().unwrap();
        // 以檔案佔用工作目錄路徑，使建立目錄失敗
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();

        let materializer = Materializer::new(Arc::new(LocalStorage::new(&blocker)));
        let err = materializer
            .materialize(&ServiceDescriptor::ocr(Deployment::Local))
            .await
            .unwrap_err();

        match err {
            LauncherError::MaterializeError { service, path, .. } => {
                assert_eq!(service, "PaddleOCR");
                assert_eq!(path, "paddle_server.py");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
