//! Process configuration: a JSON file, overridden by flags and environment.

use crate::error::{CoreError, Result};

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the photo and album collections.
    pub database_path: PathBuf,
    /// Worker registry snapshot file.
    pub registry_path: PathBuf,
    pub bind: String,
    /// Concurrent scan requests per dispatch.
    pub scan_workers: usize,
    pub request_timeout_secs: u64,
    pub liveness_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::new(),
            registry_path: PathBuf::from("slaves_configuration.json"),
            bind: "0.0.0.0:3001".to_string(),
            scan_workers: 5,
            request_timeout_secs: 60,
            liveness_interval_secs: 30,
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&raw)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(CoreError::Config("database_path must be set".to_string()));
        }
        if self.scan_workers == 0 {
            return Err(CoreError::Config("scan_workers must be at least 1".to_string()));
        }
        if self.liveness_interval_secs == 0 {
            return Err(CoreError::Config(
                "liveness_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn liveness_interval(&self) -> Duration {
        Duration::from_secs(self.liveness_interval_secs)
    }
}

/// Photo cluster master: indexes photos scanned by worker nodes
#[derive(Parser, Debug, Clone)]
#[command(name = "photo-cluster")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// JSON configuration file
    #[arg(short, long, env = "PHOTO_CLUSTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Document store directory (overrides the file)
    #[arg(long, env = "PHOTO_CLUSTER_DATABASE_PATH")]
    pub database_path: Option<PathBuf>,

    /// Worker registry snapshot file
    #[arg(long, env = "PHOTO_CLUSTER_REGISTRY_PATH")]
    pub registry_path: Option<PathBuf>,

    /// HTTP listen address
    #[arg(long, env = "PHOTO_CLUSTER_BIND")]
    pub bind: Option<String>,

    #[arg(long)]
    pub scan_workers: Option<usize>,

    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    #[arg(long)]
    pub liveness_interval_secs: Option<u64>,

    /// trace, debug, info, warn or error
    #[arg(long, default_value = "info", env = "PHOTO_CLUSTER_LOG_LEVEL")]
    pub log_level: String,
}

impl Cli {
    /// Loads the file (if any), applies the overrides and validates.
    pub fn into_config(self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(path) = self.database_path {
            config.database_path = path;
        }
        if let Some(path) = self.registry_path {
            config.registry_path = path;
        }
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(workers) = self.scan_workers {
            config.scan_workers = workers;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
        if let Some(secs) = self.liveness_interval_secs {
            config.liveness_interval_secs = secs;
        }

        config.validate()?;
        Ok(config)
    }
}
