use crate::core::health::HttpHealthChecker;
use crate::domain::model::{
    EnhanceRequest, EnhanceResponse, HealthReport, OcrRequest, OcrResponse, ServiceErrorBody,
    DEFAULT_HEALTH_PATH,
};
use crate::domain::ports::HealthProbe;
use crate::utils::error::{LauncherError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Inference calls take far longer than health checks.
pub const DEFAULT_INFERENCE_TIMEOUT: Duration = Duration::from_secs(120);

/// Typed client for the `/health`, `/ocr` and `/enhance` endpoints of the
/// launched services.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
    health: HttpHealthChecker,
}

impl ServiceClient {
    pub fn new(health_timeout: Duration, inference_timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(inference_timeout).build()?,
            health: HttpHealthChecker::new(health_timeout)?,
        })
    }

    pub async fn health(&self, base_url: &str) -> HealthReport {
        self.health.probe(base_url, DEFAULT_HEALTH_PATH).await
    }

    /// Run OCR on raw image bytes (any format the service can decode).
    pub async fn ocr(&self, base_url: &str, image: &[u8]) -> Result<OcrResponse> {
        let request = OcrRequest {
            image: STANDARD.encode(image),
        };
        self.post_json("PaddleOCR", &endpoint(base_url, "/ocr"), &request)
            .await
    }

    /// Enhance an image and return the decoded result bytes.
    pub async fn enhance(
        &self,
        base_url: &str,
        image: &[u8],
        prompt: Option<&str>,
    ) -> Result<Vec<u8>> {
        let request = EnhanceRequest {
            image: STANDARD.encode(image),
            prompt: prompt.map(str::to_string),
        };
        let response: EnhanceResponse = self
            .post_json("Qwen", &endpoint(base_url, "/enhance"), &request)
            .await?;

        tracing::debug!("Enhance status: {}", response.status);
        STANDARD
            .decode(response.enhanced_image.as_bytes())
            .map_err(|e| LauncherError::ServiceError {
                service: "Qwen".to_string(),
                status: 200,
                message: format!("enhanced_image is not valid base64: {}", e),
            })
    }

    async fn post_json<B, T>(&self, service: &str, url: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ServiceErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(LauncherError::ServiceError {
                service: service.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
