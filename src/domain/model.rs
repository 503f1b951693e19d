use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::templates;

pub const DEFAULT_HEALTH_PATH: &str = "/health";
pub const OCR_PORT: u16 = 8001;
pub const ENHANCE_PORT: u16 = 8000;
/// Port of the web frontend that talks to both services.
pub const FRONTEND_PORT: u16 = 5173;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Ocr,
    Enhance,
}

/// Where the launched services are reachable from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deployment {
    /// Health checked through `localhost`.
    Local,
    /// CORS-enabled templates, health checked through the LAN address.
    Network,
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deployment::Local => write!(f, "local"),
            Deployment::Network => write!(f, "network"),
        }
    }
}

/// One service to materialize, launch and check. Built once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub name: String,
    pub kind: ServiceKind,
    pub port: u16,
    pub health_path: String,
    pub file_name: String,
    pub template: &'static str,
}

impl ServiceDescriptor {
    pub fn ocr(deployment: Deployment) -> Self {
        let (file_name, template) = match deployment {
            Deployment::Local => ("paddle_server.py", templates::PADDLE_OCR_SERVER),
            Deployment::Network => (
                "paddle_server_network.py",
                templates::PADDLE_OCR_SERVER_NETWORK,
            ),
        };

        Self {
            name: "PaddleOCR".to_string(),
            kind: ServiceKind::Ocr,
            port: OCR_PORT,
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            file_name: file_name.to_string(),
            template,
        }
    }

    pub fn enhance(deployment: Deployment) -> Self {
        let (file_name, template) = match deployment {
            Deployment::Local => ("qwen_server.py", templates::QWEN_ENHANCE_SERVER),
            Deployment::Network => (
                "qwen_server_network.py",
                templates::QWEN_ENHANCE_SERVER_NETWORK,
            ),
        };

        Self {
            name: "Qwen".to_string(),
            kind: ServiceKind::Enhance,
            port: ENHANCE_PORT,
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            file_name: file_name.to_string(),
            template,
        }
    }

    /// The OCR and enhancement services, in reporting order.
    pub fn defaults(deployment: Deployment) -> Vec<Self> {
        vec![Self::ocr(deployment), Self::enhance(deployment)]
    }

    pub fn base_url(&self, host: &str) -> String {
        format!("http://{}:{}", host, self.port)
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthInfo {
    pub status: String,
    pub version: Option<String>,
    #[serde(default)]
    pub network: bool,
}

/// Result of one health request. `running` is true only for HTTP 200.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthReport {
    pub running: bool,
    pub info: Option<HealthInfo>,
}

impl HealthReport {
    pub fn down() -> Self {
        Self::default()
    }

    pub fn version(&self) -> Option<&str> {
        self.info.as_ref().and_then(|info| info.version.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Launched { pid: u32 },
    /// The health endpoint already answered before launch, nothing was spawned.
    AlreadyRunning,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceStatus {
    pub name: String,
    pub base_url: String,
    pub launch: LaunchOutcome,
    pub running: bool,
    pub attempts: u32,
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub deployment: Deployment,
    pub host: String,
    pub statuses: Vec<ServiceStatus>,
}

impl RunSummary {
    pub fn all_running(&self) -> bool {
        !self.statuses.is_empty() && self.statuses.iter().all(|s| s.running)
    }

    pub fn status(&self, name: &str) -> Option<&ServiceStatus> {
        self.statuses.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OcrRequest {
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OcrItem {
    pub text: String,
    /// Quadrilateral corners in pixels: `[[x1,y1],[x2,y2],[x3,y3],[x4,y4]]`.
    pub bbox: Vec<[f64; 2]>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OcrResponse {
    pub results: Vec<OcrItem>,
    pub image_width: u32,
    pub image_height: u32,
}

/// OCR hit with its bounding box as `[x1, y1, x2, y2]` relative to the image (0..1).
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub content: String,
    pub position: [f64; 4],
    pub score: f64,
}

impl OcrResponse {
    pub fn text_blocks(&self) -> Vec<TextBlock> {
        // 寬高為 0 時以 1 代替，避免除以零
        let width = f64::from(self.image_width.max(1));
        let height = f64::from(self.image_height.max(1));

        self.results
            .iter()
            // 空文字、空框與信心度為 0 的結果都略過
            .filter(|item| !item.text.is_empty() && !item.bbox.is_empty() && item.confidence != 0.0)
            .map(|item| {
                let xs = item.bbox.iter().map(|p| p[0]);
                let ys = item.bbox.iter().map(|p| p[1]);
                let x1 = xs.clone().fold(f64::INFINITY, f64::min);
                let x2 = xs.fold(f64::NEG_INFINITY, f64::max);
                let y1 = ys.clone().fold(f64::INFINITY, f64::min);
                let y2 = ys.fold(f64::NEG_INFINITY, f64::max);

                TextBlock {
                    content: item.text.clone(),
                    position: [x1 / width, y1 / height, x2 / width, y2 / height],
                    score: item.confidence,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnhanceRequest {
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnhanceResponse {
    pub enhanced_image: String,
    pub status: String,
}

/// Body the generated services return with a 500.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}
