use crate::core::readiness::{MAX_CONFIGURED_ATTEMPTS, MAX_CONFIGURED_DELAY};
use crate::utils::error::{LauncherError, Result};
use crate::utils::validation::{self, Validate};
use serde::Deserialize;
use std::path::Path;

/// Optional `launcher.toml`. Every section and key may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub launcher: LauncherSection,
    pub health: HealthSection,
    pub readiness: ReadinessSection,
    pub services: ServicesSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LauncherSection {
    pub working_dir: Option<String>,
    pub interpreter: Option<String>,
    pub host: Option<String>,
    pub skip_running: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HealthSection {
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReadinessSection {
    pub initial_delay_ms: Option<u64>,
    pub base_delay_ms: Option<u64>,
    pub multiplier: Option<f64>,
    pub max_delay_ms: Option<u64>,
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServicesSection {
    pub ocr: Option<ServiceOverride>,
    pub enhance: Option<ServiceOverride>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceOverride {
    pub port: Option<u16>,
    pub health_path: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LauncherError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${LAUNCHER_PYTHON})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LauncherError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.launcher.working_dir {
            validation::validate_path("launcher.working_dir", dir)?;
        }
        if let Some(interpreter) = &self.launcher.interpreter {
            validation::validate_non_empty_string("launcher.interpreter", interpreter)?;
        }
        if let Some(timeout) = self.health.request_timeout_secs {
            validation::validate_positive_number("health.request_timeout_secs", timeout, 1)?;
        }
        let limit_ms = u64::try_from(MAX_CONFIGURED_DELAY.as_millis()).unwrap_or(u64::MAX);
        for (field, value) in [
            ("readiness.initial_delay_ms", self.readiness.initial_delay_ms),
            ("readiness.base_delay_ms", self.readiness.base_delay_ms),
            ("readiness.max_delay_ms", self.readiness.max_delay_ms),
        ] {
            if let Some(ms) = value {
                validation::validate_range(field, ms, 0, limit_ms)?;
            }
        }
        if let (Some(base), Some(max)) = (self.readiness.base_delay_ms, self.readiness.max_delay_ms) {
            if max < base {
                return Err(LauncherError::InvalidConfigValueError {
                    field: "readiness.max_delay_ms".to_string(),
                    value: max.to_string(),
                    reason: format!("Must not be below readiness.base_delay_ms ({})", base),
                });
            }
        }
        if let Some(attempts) = self.readiness.max_attempts {
            validation::validate_range("readiness.max_attempts", attempts, 1, MAX_CONFIGURED_ATTEMPTS)?;
        }
        if let Some(multiplier) = self.readiness.multiplier {
            validation::validate_range("readiness.multiplier", multiplier, 1.0, 10.0)?;
        }

        for (field, service) in [
            ("services.ocr", &self.services.ocr),
            ("services.enhance", &self.services.enhance),
        ] {
            let Some(service) = service else { continue };
            if let Some(port) = service.port {
                validation::validate_port(&format!("{}.port", field), port)?;
            }
            if let Some(path) = &service.health_path {
                if !path.starts_with('/') {
                    return Err(LauncherError::InvalidConfigValueError {
                        field: format!("{}.health_path", field),
                        value: path.clone(),
                        reason: "Health path must start with '/'".to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}
