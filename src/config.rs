//! File-based configuration.
//!
//! The service reads one JSON file at startup; its path comes from the first
//! CLI argument and defaults to `config.json`. Everything except the Firebase
//! service-account file has a default, so a minimal deployment config is just:
//!
//! ```json
//! { "firebase": { "serviceAccountFile": "service-account.json" } }
//! ```

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Firebase project credentials. Only `project_id` is consumed; the file is
/// the standard service-account JSON so deployments can reuse the one they
/// already have.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseConfig {
    pub service_account_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory where multipart uploads are staged before being handed to
    /// the compute backend (which reads them from the shared filesystem).
    #[serde(default = "default_uploads_folder")]
    pub uploads_folder: PathBuf,

    /// Base URL of the R plumber compute backend.
    #[serde(default = "default_compute_backend_url")]
    pub compute_backend_url: String,

    /// Exact-match CORS allowlist for browser clients.
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,

    pub firebase: FirebaseConfig,
}

fn default_port() -> u16 {
    3001
}

fn default_uploads_folder() -> PathBuf {
    PathBuf::from("/tmp/seamless/uploads")
}

fn default_compute_backend_url() -> String {
    "http://localhost:5555".to_string()
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec![
        "https://celvox.co".to_string(),
        "http://localhost:3000".to_string(),
    ]
}

impl AppConfig {
    /// Load configuration from the path given as the first CLI argument,
    /// falling back to `config.json` in the working directory.
    pub fn load_from_args() -> Result<Self, ConfigError> {
        let path = env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
        Self::load(Path::new(&path))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: AppConfig = serde_json::from_str(&raw)?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.compute_backend_url)
            .map_err(|_| ConfigError::Invalid("computeBackendUrl"))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid("computeBackendUrl"));
        }

        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
