use thiserror::Error;

#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to write template for '{service}' to {path}: {source}")]
    MaterializeError {
        service: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to spawn '{service}' with {interpreter}: {source}")]
    SpawnError {
        service: String,
        interpreter: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Service '{service}' responded with status {status}")]
    ServiceError { service: String, status: u16, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Filesystem,
    Process,
    Network,
    Data,
}

impl LauncherError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } | Self::TomlError(_) => {
                ErrorCategory::Configuration
            }
            Self::IoError(_) | Self::MaterializeError { .. } => ErrorCategory::Filesystem,
            Self::SpawnError { .. } => ErrorCategory::Process,
            Self::HttpError(_) | Self::ServiceError { .. } => ErrorCategory::Network,
            Self::SerializationError(_) => ErrorCategory::Data,
        }
    }

    /// One-line message for stdout and the run summary, including the
    /// underlying cause.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MaterializeError {
                service,
                path,
                source,
            } => format!("cannot write {} server file {}: {}", service, path, source),
            Self::SpawnError {
                service,
                interpreter,
                source,
            } => format!("cannot start {} with '{}': {}", service, interpreter, source),
            Self::ServiceError {
                service,
                status,
                message,
            } => format!("{} answered {}: {}", service, status, message),
            Self::InvalidConfigValueError { field, value, reason } => {
                format!("invalid value '{}' for {}: {}", value, field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the command line flags and the TOML config file",
            ErrorCategory::Filesystem => "Make sure the working directory exists and is writable",
            ErrorCategory::Process => {
                "Make sure the Python interpreter is installed or pass --interpreter"
            }
            ErrorCategory::Network => "Check that the service is running and the port is free",
            ErrorCategory::Data => "The service returned an unexpected payload",
        }
    }
}

pub type Result<T> = std::result::Result<T, LauncherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let err = LauncherError::ConfigError {
            message: "bad".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);

        let err = LauncherError::SpawnError {
            service: "ocr".to_string(),
            interpreter: "python3".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.category(), ErrorCategory::Process);
        assert!(err.user_friendly_message().contains("python3"));
    }

    #[test]
    fn test_user_friendly_message_keeps_cause() {
        let err = LauncherError::MaterializeError {
            service: "Qwen".to_string(),
            path: "qwen_server.py".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only filesystem"),
        };

        assert_eq!(
            err.user_friendly_message(),
            "cannot write Qwen server file qwen_server.py: read-only filesystem"
        );

        let err = LauncherError::SpawnError {
            service: "PaddleOCR".to_string(),
            interpreter: "python3".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert_eq!(
            err.user_friendly_message(),
            "cannot start PaddleOCR with 'python3': No such file or directory"
        );
    }
}
