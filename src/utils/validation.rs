use crate::utils::error::{LauncherError, Result};
use std::collections::HashSet;
use std::hash::Hash;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(LauncherError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(LauncherError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(LauncherError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(LauncherError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(LauncherError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Generated files must stay inside the working directory.
pub fn validate_file_name(field_name: &str, file_name: &str) -> Result<()> {
    validate_path(field_name, file_name)?;

    let path = std::path::Path::new(file_name);
    if path.components().count() != 1 || path.is_absolute() || file_name == ".." {
        return Err(LauncherError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file_name.to_string(),
            reason: "Must be a bare file name without directories".to_string(),
        });
    }

    Ok(())
}

pub fn validate_port(field_name: &str, port: u16) -> Result<()> {
    if port == 0 {
        return Err(LauncherError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: port.to_string(),
            reason: "Port 0 is not a fixed listen port".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(LauncherError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LauncherError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(LauncherError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_unique<T, I>(field_name: &str, values: I) -> Result<()>
where
    T: Eq + Hash + std::fmt::Display,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    for value in values {
        let rendered = value.to_string();
        if !seen.insert(value) {
            return Err(LauncherError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: rendered,
                reason: "Duplicate value".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("base_url", "https://example.com").is_ok());
        assert!(validate_url("base_url", "http://localhost:8001").is_ok());
        assert!(validate_url("base_url", "").is_err());
        assert!(validate_url("base_url", "invalid-url").is_err());
        assert!(validate_url("base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("file_name", "paddle_server.py").is_ok());
        assert!(validate_file_name("file_name", "").is_err());
        assert!(validate_file_name("file_name", "../paddle_server.py").is_err());
        assert!(validate_file_name("file_name", "/tmp/paddle_server.py").is_err());
        assert!(validate_file_name("file_name", "..").is_err());
    }

    #[test]
    fn test_validate_port_and_numbers() {
        assert!(validate_port("port", 8001).is_ok());
        assert!(validate_port("port", 0).is_err());
        assert!(validate_positive_number("max_attempts", 3, 1).is_ok());
        assert!(validate_positive_number("max_attempts", 0, 1).is_err());
        assert!(validate_range("multiplier", 2.0, 1.0, 10.0).is_ok());
        assert!(validate_range("multiplier", 0.5, 1.0, 10.0).is_err());
    }

    #[test]
    fn test_validate_unique() {
        assert!(validate_unique("services.port", [8000u16, 8001]).is_ok());
        assert!(validate_unique("services.port", [8000u16, 8000]).is_err());
        assert!(validate_unique("services.name", ["ocr", "enhance", "ocr"]).is_err());
    }
}
