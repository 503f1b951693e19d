use crate::domain::model::{HealthInfo, HealthReport, DEFAULT_HEALTH_PATH};
use crate::domain::ports::HealthProbe;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// Health poller backed by reqwest.
///
/// A service counts as running only when `GET <base_url>/health` answers
/// exactly `200 OK` within the timeout. Other statuses, timeouts, refused
/// connections and DNS failures all collapse into "not running".
#[derive(Debug, Clone)]
pub struct HttpHealthChecker {
    client: Client,
}

impl HttpHealthChecker {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Single check against the default `/health` path.
    pub async fn check(&self, base_url: &str) -> bool {
        self.is_running(base_url, DEFAULT_HEALTH_PATH).await
    }
}

#[async_trait]
impl HealthProbe for HttpHealthChecker {
    async fn probe(&self, base_url: &str, health_path: &str) -> HealthReport {
        let url = format!("{}{}", base_url.trim_end_matches('/'), health_path);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Health check {} failed: {}", url, e);
                return HealthReport::down();
            }
        };

        if response.status() != StatusCode::OK {
            tracing::debug!("Health check {} returned {}", url, response.status());
            return HealthReport::down();
        }

        // 200 但內容無法解析時仍視為運行中
        let info = response.json::<HealthInfo>().await.ok();
        HealthReport {
            running: true,
            info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn checker() -> HttpHealthChecker {
        HttpHealthChecker::new(Duration::from_secs(1)).unwrap()
    }

    #[tokio::test]
    async fn test_200_is_running_with_info() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"status": "ok", "version": "2.7.0"}));
        });

        let report = checker().probe(&server.base_url(), "/health").await;

        mock.assert();
        assert!(report.running);
        assert_eq!(report.version(), Some("2.7.0"));
    }

    #[tokio::test]
    async fn test_200_with_plain_body_is_running() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200).body("ok");
        });

        let report = checker().probe(&server.base_url(), "/health").await;

        assert!(report.running);
        assert!(report.info.is_none());
    }

    #[tokio::test]
    async fn test_non_200_statuses_are_not_running() {
        for status in [201, 204, 301, 404, 500, 503] {
            let server = MockServer::start();
            server.mock(|when, then| {
                when.method(GET).path("/health");
                then.status(status);
            });

            assert!(
                !checker().check(&server.base_url()).await,
                "status {} must not count as running",
                status
            );
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_not_running() {
        // 先取得一個空閒埠再釋放，確保無人監聽
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        assert!(!checker().check(&format!("http://127.0.0.1:{}", port)).await);
    }

    #[tokio::test]
    async fn test_timeout_is_not_running() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200).delay(Duration::from_millis(500));
        });

        let checker = HttpHealthChecker::new(Duration::from_millis(100)).unwrap();
        assert!(!checker.check(&server.base_url()).await);
    }

    #[tokio::test]
    async fn test_custom_health_path_and_trailing_slash() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/healthz");
            then.status(200);
        });

        let base = format!("{}/", server.base_url());
        assert!(checker().is_running(&base, "/healthz").await);
        mock.assert();
    }
}
