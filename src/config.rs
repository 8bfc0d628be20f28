//! Configuration for the extraction service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocintelConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Export configuration
    #[serde(default)]
    pub export: ExportConfig,
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

impl DocintelConfig {
    /// Load configuration from the file named by `DOCINTEL_CONFIG`,
    /// falling back to defaults when the variable is unset.
    pub fn load() -> Result<Self> {
        match std::env::var("DOCINTEL_CONFIG") {
            Ok(path) => Self::from_file(path),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&text)
            .map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// CSV snapshot export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for timestamped batch snapshots
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: data_dir().join("output"),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite batch database
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: data_dir().join("docintel.db"),
        }
    }
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docintel")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DocintelConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.max_upload_size, 100 * 1024 * 1024);
        assert!(config.storage.database_path.ends_with("docintel.db"));
    }

    #[test]
    fn test_partial_toml() {
        let config: DocintelConfig = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000
            enable_cors = false
            max_upload_size = 1024
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        // Unspecified sections fall back to defaults
        assert!(config.export.output_dir.ends_with("output"));
    }
}
